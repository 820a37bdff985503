use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const FR_KEY: &str = "fr";
const EN_KEY: &str = "en";

/// Site locales. French is authoritative; English falls back to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::Fr => FR_KEY,
            Locale::En => EN_KEY,
        }
    }

    /// Parse a locale tag, ignoring case and region (`fr-FR`, `EN_us`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next() {
            Some(FR_KEY) => Some(Locale::Fr),
            Some(EN_KEY) => Some(Locale::En),
            _ => None,
        }
    }
}

/// A leaf of a mixed section document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedField {
    pub fr: String,
    pub en: String,
}

impl LocalizedField {
    pub fn new(fr: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            fr: fr.into(),
            en: en.into(),
        }
    }

    /// Build a field whose English side is back-filled from French when absent.
    pub fn with_fallback(fr: impl Into<String>, en: Option<&str>) -> Self {
        let fr = fr.into();
        let en = en.map(str::to_string).unwrap_or_else(|| fr.clone());
        Self { fr, en }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.fr,
            Locale::En => &self.en,
        }
    }

    pub fn set(&mut self, locale: Locale, value: impl Into<String>) {
        match locale {
            Locale::Fr => self.fr = value.into(),
            Locale::En => self.en = value.into(),
        }
    }

    /// Recognise a localized leaf inside a mixed document.
    ///
    /// A leaf is an object whose only keys are `fr` (string, required) and
    /// `en` (string, optional; `null` counts as absent). Anything else is
    /// ordinary structure.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        if map.keys().any(|k| k != FR_KEY && k != EN_KEY) {
            return None;
        }
        let fr = map.get(FR_KEY)?.as_str()?;
        let en = match map.get(EN_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(en)) => Some(en.as_str()),
            Some(_) => return None,
        };
        Some(Self::with_fallback(fr, en))
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(2);
        map.insert(FR_KEY.to_string(), Value::String(self.fr.clone()));
        map.insert(EN_KEY.to_string(), Value::String(self.en.clone()));
        Value::Object(map)
    }
}

impl From<LocalizedField> for Value {
    fn from(field: LocalizedField) -> Self {
        field.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_locale_tags() {
        assert_eq!(Locale::parse("fr"), Some(Locale::Fr));
        assert_eq!(Locale::parse("EN-us"), Some(Locale::En));
        assert_eq!(Locale::parse(" fr_MG "), Some(Locale::Fr));
        assert_eq!(Locale::parse("mg"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn detects_localized_leaves() {
        let field = LocalizedField::from_value(&json!({"fr": "Bonjour", "en": "Hello"}));
        assert_eq!(field, Some(LocalizedField::new("Bonjour", "Hello")));

        let french_only = LocalizedField::from_value(&json!({"fr": "Bonjour"}));
        assert_eq!(french_only, Some(LocalizedField::new("Bonjour", "Bonjour")));

        let null_english = LocalizedField::from_value(&json!({"fr": "Bonjour", "en": null}));
        assert_eq!(null_english, Some(LocalizedField::new("Bonjour", "Bonjour")));
    }

    #[test]
    fn rejects_structural_objects() {
        assert!(LocalizedField::from_value(&json!({"fr": "a", "image": "x.jpg"})).is_none());
        assert!(LocalizedField::from_value(&json!({"en": "only english"})).is_none());
        assert!(LocalizedField::from_value(&json!({"fr": 3})).is_none());
        assert!(LocalizedField::from_value(&json!({"fr": "a", "en": ["b"]})).is_none());
        assert!(LocalizedField::from_value(&json!("plain")).is_none());
    }

    #[test]
    fn set_and_get_by_locale() {
        let mut field = LocalizedField::new("Chambre", "Room");
        field.set(Locale::En, "Suite");
        assert_eq!(field.get(Locale::Fr), "Chambre");
        assert_eq!(field.get(Locale::En), "Suite");
    }
}
