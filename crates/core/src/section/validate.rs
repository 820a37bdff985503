//! Checks applied to section bodies before they reach the store.
use serde_json::Value;

use super::model::{NewGlobalSection, SectionUpdate};
use crate::validation::ValidationErrors;

pub const MAX_SECTION_KEY_LEN: usize = 100;

/// Keys are short slugs such as `hero`, `home.about` or `rooms-intro`.
pub fn validate_section_key(key: &str, errors: &mut ValidationErrors) {
    if key.trim().is_empty() {
        errors.push("sectionKey", "is required");
    } else if key.len() > MAX_SECTION_KEY_LEN {
        errors.push(
            "sectionKey",
            format!("must be at most {MAX_SECTION_KEY_LEN} characters"),
        );
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        errors.push(
            "sectionKey",
            "may only contain letters, digits, '-', '_' and '.'",
        );
    }
}

fn validate_locale_document(field: &str, value: &Value, errors: &mut ValidationErrors) {
    if !value.is_object() {
        errors.push(field, "must be a JSON object");
    }
}

pub fn validate_new_section(section: &NewGlobalSection) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_section_key(&section.section_key, &mut errors);
    validate_locale_document("dataFr", &section.data_fr, &mut errors);
    if let Some(data_en) = &section.data_en {
        validate_locale_document("dataEn", data_en, &mut errors);
    }
    errors.into_result(())
}

pub fn validate_section_update(update: &SectionUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(key) = &update.section_key {
        validate_section_key(key, &mut errors);
    }
    if let Some(data_fr) = &update.data_fr {
        validate_locale_document("dataFr", data_fr, &mut errors);
    }
    if let Some(data_en) = &update.data_en {
        validate_locale_document("dataEn", data_en, &mut errors);
    }
    if let Some(version) = update.version {
        if version < 1 {
            errors.push("version", "must be a positive integer");
        }
    }
    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_sections() {
        let new = NewGlobalSection {
            section_key: "home.hero".to_string(),
            data_fr: json!({"title": "Bienvenue"}),
            data_en: None,
            is_active: true,
        };
        assert!(validate_new_section(&new).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let new = NewGlobalSection {
            section_key: "hero section!".to_string(),
            data_fr: json!(["not", "an", "object"]),
            data_en: Some(json!("nope")),
            is_active: true,
        };
        let errors = validate_new_section(&new).unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["sectionKey", "dataFr", "dataEn"]);
    }

    #[test]
    fn empty_and_long_keys_are_rejected() {
        let mut errors = ValidationErrors::new();
        validate_section_key("  ", &mut errors);
        validate_section_key(&"k".repeat(MAX_SECTION_KEY_LEN + 1), &mut errors);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_section_update(&SectionUpdate::default()).is_ok());

        let update = SectionUpdate {
            version: Some(0),
            data_en: Some(json!(42)),
            ..SectionUpdate::default()
        };
        assert_eq!(validate_section_update(&update).unwrap_err().len(), 2);
    }
}
