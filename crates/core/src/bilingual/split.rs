use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::{Locale, LocalizedField};

/// The storage shape of a section: one document per locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleDocuments {
    pub data_fr: Value,
    pub data_en: Value,
}

/// Split a mixed document into its French and English documents.
///
/// Localized leaves send `fr` and `en` to the matching path of each output.
/// Arrays keep their order, and every other leaf (image URLs, numbers,
/// element ids) is copied into both.
pub fn split(mixed: &Value) -> LocaleDocuments {
    let (data_fr, data_en) = split_value(mixed);
    LocaleDocuments { data_fr, data_en }
}

fn split_value(value: &Value) -> (Value, Value) {
    match value {
        Value::Object(map) => {
            if let Some(field) = LocalizedField::from_value(value) {
                return (Value::String(field.fr), Value::String(field.en));
            }
            let mut fr = Map::with_capacity(map.len());
            let mut en = Map::with_capacity(map.len());
            for (key, child) in map {
                let (child_fr, child_en) = split_value(child);
                fr.insert(key.clone(), child_fr);
                en.insert(key.clone(), child_en);
            }
            (Value::Object(fr), Value::Object(en))
        }
        Value::Array(items) => {
            let (fr, en): (Vec<_>, Vec<_>) = items.iter().map(split_value).unzip();
            (Value::Array(fr), Value::Array(en))
        }
        other => (other.clone(), other.clone()),
    }
}

/// Project a mixed document onto a single locale for rendering.
pub fn localize(mixed: &Value, locale: Locale) -> Value {
    match mixed {
        Value::Object(map) => match LocalizedField::from_value(mixed) {
            Some(field) => Value::String(field.get(locale).to_string()),
            None => Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), localize(child, locale)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.iter().map(|v| localize(v, locale)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hero() -> Value {
        json!({
            "slides": [
                {
                    "title": {"fr": "Bienvenue", "en": "Welcome"},
                    "image": "/uploads/hero-1.jpg",
                },
                {
                    "title": {"fr": "Détente", "en": "Relax"},
                    "image": "/uploads/hero-2.jpg",
                }
            ],
            "stats": {"rooms": 171, "label": {"fr": "chambres", "en": "rooms"}},
        })
    }

    #[test]
    fn split_routes_each_locale_to_its_document() {
        let docs = split(&hero());
        assert_eq!(docs.data_fr["slides"][0]["title"], "Bienvenue");
        assert_eq!(docs.data_en["slides"][0]["title"], "Welcome");
        assert_eq!(docs.data_fr["slides"][1]["title"], "Détente");
        assert_eq!(docs.data_en["stats"]["label"], "rooms");
    }

    #[test]
    fn split_copies_plain_leaves_to_both() {
        let docs = split(&hero());
        for doc in [&docs.data_fr, &docs.data_en] {
            assert_eq!(doc["slides"][0]["image"], "/uploads/hero-1.jpg");
            assert_eq!(doc["stats"]["rooms"], 171);
        }
    }

    #[test]
    fn split_back_fills_missing_english() {
        let docs = split(&json!({"title": {"fr": "Piscine"}}));
        assert_eq!(docs.data_en["title"], "Piscine");

        let docs = split(&json!({"title": {"fr": "Spa", "en": null}}));
        assert_eq!(docs.data_fr, json!({"title": "Spa"}));
        assert_eq!(docs.data_en, json!({"title": "Spa"}));
    }

    #[test]
    fn localize_picks_one_side() {
        let english = localize(&hero(), Locale::En);
        assert_eq!(english["slides"][1]["title"], "Relax");
        assert_eq!(english["slides"][1]["image"], "/uploads/hero-2.jpg");
        assert_eq!(english["stats"]["rooms"], 171);

        let french = localize(&hero(), Locale::Fr);
        assert_eq!(french, split(&hero()).data_fr);
    }
}
