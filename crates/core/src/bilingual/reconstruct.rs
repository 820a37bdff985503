use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::field::LocalizedField;

/// Object key that identifies array elements across locales.
/// Always copied verbatim, never localized.
pub const ELEMENT_ID_KEY: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    #[error("French document must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("expected an array at `{0}`")]
    MissingArray(String),
}

/// Rebuild the mixed document from the stored locale documents.
///
/// `data_fr` is the skeleton. Every string leaf becomes `{fr, en}` where
/// `en` comes from the same path of `data_en` and falls back to French when
/// that path is missing or not a string. Numbers, booleans and `null` are
/// kept as they are.
pub fn reconstruct(data_fr: &Value, data_en: Option<&Value>) -> Result<Value, ReconstructError> {
    ensure_object(data_fr)?;
    walk(data_fr, data_en, None, "")
}

/// Like [`reconstruct`], guided by the page's default mixed document.
///
/// Where the template holds a plain string (an image URL, an icon name) the
/// French string is copied verbatim instead of being localized. Where the
/// template holds an array and `data_fr` does not, the document is treated
/// as corrupt.
pub fn reconstruct_with_template(
    data_fr: &Value,
    data_en: Option<&Value>,
    template: &Value,
) -> Result<Value, ReconstructError> {
    ensure_object(data_fr)?;
    walk(data_fr, data_en, Some(template), "")
}

fn ensure_object(value: &Value) -> Result<(), ReconstructError> {
    match value {
        Value::Object(_) => Ok(()),
        other => Err(ReconstructError::NotAnObject(kind_name(other))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn walk(
    fr: &Value,
    en: Option<&Value>,
    template: Option<&Value>,
    path: &str,
) -> Result<Value, ReconstructError> {
    if let Some(Value::Array(_)) = template {
        if !fr.is_array() {
            return Err(ReconstructError::MissingArray(path.to_string()));
        }
    }

    match fr {
        Value::String(text) => {
            let verbatim = matches!(template, Some(Value::String(_)));
            if verbatim {
                return Ok(fr.clone());
            }
            let en = en.and_then(Value::as_str);
            Ok(LocalizedField::with_fallback(text.as_str(), en).to_value())
        }
        Value::Object(map) => walk_object(map, en, template, path),
        Value::Array(items) => walk_array(items, en, template, path),
        other => Ok(other.clone()),
    }
}

fn walk_object(
    fr: &Map<String, Value>,
    en: Option<&Value>,
    template: Option<&Value>,
    path: &str,
) -> Result<Value, ReconstructError> {
    // A localized template leaf means the stored value is structure the
    // template does not describe; keep walking without guidance.
    let template = template
        .filter(|t| LocalizedField::from_value(t).is_none())
        .and_then(Value::as_object);

    if let Some(expected) = template {
        for (key, shape) in expected {
            if shape.is_array() && !fr.contains_key(key) {
                return Err(ReconstructError::MissingArray(child_path(path, key)));
            }
        }
    }

    let mut out = Map::with_capacity(fr.len());
    for (key, child) in fr {
        let value = if key == ELEMENT_ID_KEY {
            child.clone()
        } else {
            walk(
                child,
                en.and_then(|e| e.get(key)),
                template.and_then(|t| t.get(key)),
                &child_path(path, key),
            )?
        };
        out.insert(key.clone(), value);
    }
    Ok(Value::Object(out))
}

fn walk_array(
    fr: &[Value],
    en: Option<&Value>,
    template: Option<&Value>,
    path: &str,
) -> Result<Value, ReconstructError> {
    let aligned = align(fr, en.and_then(Value::as_array), path);
    let shapes = template.and_then(Value::as_array);

    let mut out = Vec::with_capacity(fr.len());
    for (index, (item, en_item)) in fr.iter().zip(aligned).enumerate() {
        let shape = shapes.and_then(|s| s.get(index).or_else(|| s.first()));
        out.push(walk(item, en_item, shape, &format!("{path}[{index}]"))?);
    }
    Ok(Value::Array(out))
}

/// Pair every French element with its English counterpart.
///
/// Elements carrying an `id` are matched by id, so reordering one locale
/// does not swap translations. Without ids the match is positional.
/// Unmatched French elements get `None` and fall back to French.
fn align<'a>(fr: &[Value], en: Option<&'a Vec<Value>>, path: &str) -> Vec<Option<&'a Value>> {
    let Some(en) = en else {
        return vec![None; fr.len()];
    };

    if let Some(ids) = element_ids(fr) {
        let by_id: HashMap<String, &Value> = en
            .iter()
            .filter_map(|item| element_id(item).map(|id| (id, item)))
            .collect();
        let aligned: Vec<_> = ids.iter().map(|id| by_id.get(id).copied()).collect();
        let unmatched = aligned.iter().filter(|item| item.is_none()).count();
        if unmatched > 0 || en.len() != fr.len() {
            tracing::warn!(
                path,
                unmatched,
                fr_len = fr.len(),
                en_len = en.len(),
                "English array drifted from French; unmatched elements fall back to French"
            );
        }
        return aligned;
    }

    if en.len() != fr.len() {
        tracing::warn!(
            path,
            fr_len = fr.len(),
            en_len = en.len(),
            "array length differs between locales; unmatched elements fall back to French"
        );
    }
    (0..fr.len()).map(|index| en.get(index)).collect()
}

fn element_id(item: &Value) -> Option<String> {
    match item.get(ELEMENT_ID_KEY)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn element_ids(items: &[Value]) -> Option<Vec<String>> {
    if items.is_empty() {
        return None;
    }
    items.iter().map(element_id).collect()
}
