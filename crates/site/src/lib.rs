//! Client side of the Carlton site.
//!
//! Pages own a compiled-in default document per section. At render time a
//! [`PageSection`] fetches the stored copy, seeds it from the default when
//! the key has never been stored, and falls back to the default when the
//! API cannot be reached. Editing is gated by a [`Permission`] obtained from
//! the server and driven through an [`EditAffordance`].

pub mod affordance;
pub mod api;
pub mod defaults;
pub mod error;
pub mod section;
pub mod session;

pub use affordance::{
    EditAffordance, EditForm, Event, ImageForm, ImageMode, ImageSource, Phase, TextForm, View,
};
pub use api::{HttpSectionApi, SectionApi};
pub use error::ClientError;
pub use section::{LoadedSection, Origin, PageSection};
pub use session::{resolve_permission, Permission, SessionInfo, SessionProbe};
