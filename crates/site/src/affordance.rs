//! Long-press edit affordance, without any rendering.
//!
//! ```text
//! Idle --press held >= 500ms / context menu--> HintShown --hint clicked--> Editing
//!   ^                                              |                          |
//!   +-------------- dismiss / early release -------+------- save / cancel ----+
//! ```
//!
//! Without edit permission every event is ignored and the view is always
//! [`View::Children`].

use std::time::{Duration, Instant};

use carlton_core::bilingual::{Locale, LocalizedField};

use crate::session::Permission;

/// How long a press must be held before the hint appears.
pub const LONG_PRESS: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PressStart(Instant),
    /// Clock tick while a press may still be held.
    Tick(Instant),
    PressEnd(Instant),
    ContextMenu,
    HintClicked,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pressing { since: Instant },
    HintShown,
    Editing,
}

/// What to draw around the wrapped content.
#[derive(Debug, PartialEq)]
pub enum View<'a, F> {
    Children,
    ChildrenWithHint,
    ChildrenWithForm(&'a F),
}

/// The form shown while editing.
pub trait EditForm {
    type Value;

    fn can_save(&self) -> bool;

    /// The value to hand to the save callback, `None` while saving is disabled.
    fn value(&self) -> Option<Self::Value>;
}

/// Edits both translations of a text leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct TextForm {
    pub value: LocalizedField,
}

impl TextForm {
    pub fn new(value: LocalizedField) -> Self {
        Self { value }
    }

    pub fn set(&mut self, locale: Locale, text: impl Into<String>) {
        self.value.set(locale, text);
    }
}

impl EditForm for TextForm {
    type Value = LocalizedField;

    fn can_save(&self) -> bool {
        true
    }

    fn value(&self) -> Option<LocalizedField> {
        Some(self.value.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    #[default]
    Url,
    File,
}

/// A replacement image chosen in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File { name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageForm {
    pub mode: ImageMode,
    pub url: String,
    pub file: Option<(String, Vec<u8>)>,
}

impl ImageForm {
    pub fn set_mode(&mut self, mode: ImageMode) {
        self.mode = mode;
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn choose_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.file = Some((name.into(), bytes));
    }
}

impl EditForm for ImageForm {
    type Value = ImageSource;

    fn can_save(&self) -> bool {
        match self.mode {
            ImageMode::Url => !self.url.trim().is_empty(),
            ImageMode::File => self.file.is_some(),
        }
    }

    fn value(&self) -> Option<ImageSource> {
        match self.mode {
            ImageMode::Url if self.can_save() => {
                Some(ImageSource::Url(self.url.trim().to_string()))
            }
            ImageMode::File => self.file.as_ref().map(|(name, bytes)| ImageSource::File {
                name: name.clone(),
                bytes: bytes.clone(),
            }),
            ImageMode::Url => None,
        }
    }
}

/// Gesture state for one editable value.
#[derive(Debug, Clone)]
pub struct EditAffordance<F> {
    enabled: bool,
    phase: Phase,
    initial: F,
    form: Option<F>,
}

impl<F: EditForm + Clone> EditAffordance<F> {
    /// `initial` is the form as it opens: the current value.
    pub fn new(permission: &Permission, initial: F) -> Self {
        Self {
            enabled: permission.can_edit(),
            phase: Phase::Idle,
            initial,
            form: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn handle(&mut self, event: Event) {
        if !self.enabled {
            return;
        }
        self.phase = match (self.phase, event) {
            (Phase::Idle, Event::PressStart(at)) => Phase::Pressing { since: at },
            (Phase::Idle | Phase::Pressing { .. }, Event::ContextMenu) => Phase::HintShown,
            (Phase::Pressing { since }, Event::Tick(now)) if held(since, now) => Phase::HintShown,
            (Phase::Pressing { since }, Event::PressEnd(now)) => {
                if held(since, now) {
                    Phase::HintShown
                } else {
                    Phase::Idle
                }
            }
            (Phase::HintShown, Event::HintClicked) => {
                self.form = Some(self.initial.clone());
                Phase::Editing
            }
            (Phase::HintShown, Event::Dismiss) => Phase::Idle,
            (phase, _) => phase,
        };
    }

    pub fn form(&self) -> Option<&F> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.form.as_mut()
    }

    /// Hand the form's value to `on_save` and close the form. Does nothing
    /// (and returns `false`) unless editing with a savable form.
    pub fn save(&mut self, on_save: impl FnOnce(F::Value)) -> bool {
        if self.phase != Phase::Editing {
            return false;
        }
        let Some(value) = self.form.as_ref().and_then(EditForm::value) else {
            return false;
        };
        on_save(value);
        self.form = None;
        self.phase = Phase::Idle;
        true
    }

    pub fn cancel(&mut self) {
        if self.phase == Phase::Editing {
            self.form = None;
            self.phase = Phase::Idle;
        }
    }

    pub fn view(&self) -> View<'_, F> {
        match (self.phase, &self.form) {
            (Phase::HintShown, _) => View::ChildrenWithHint,
            (Phase::Editing, Some(form)) => View::ChildrenWithForm(form),
            _ => View::Children,
        }
    }
}

fn held(since: Instant, now: Instant) -> bool {
    now.saturating_duration_since(since) >= LONG_PRESS
}
