use anyhow::{Context, Result};
use serde_json::Value;

use super::{Extractor, is_meaningful};

/// Field holding the record list in the "following" export.
const FOLLOWING_FIELD: &str = "relationships_following";

/// The JSON layouts a relationship export is known to use.
///
/// "following" wraps its records in an object, "followers" is a bare
/// array. Anything else is left alone rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportShape<'a> {
    Following(&'a [Value]),
    Followers(&'a [Value]),
    Unrecognized,
}

impl<'a> ExportShape<'a> {
    pub fn classify(document: &'a Value) -> Self {
        match document {
            Value::Object(map) => match map.get(FOLLOWING_FIELD) {
                Some(Value::Array(records)) => ExportShape::Following(records),
                _ => ExportShape::Unrecognized,
            },
            Value::Array(records) => ExportShape::Followers(records),
            _ => ExportShape::Unrecognized,
        }
    }

    pub fn records(&self) -> &'a [Value] {
        match *self {
            ExportShape::Following(records) | ExportShape::Followers(records) => records,
            ExportShape::Unrecognized => &[],
        }
    }
}

/// Every non-empty string `value` in the record's `string_list_data`.
fn record_usernames(record: &Value) -> Vec<String> {
    record
        .get("string_list_data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("value").and_then(Value::as_str))
        .filter(|value| is_meaningful(value))
        .map(str::to_string)
        .collect()
}

/// Usernames from either relationship export layout.
pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        let document: Value = serde_json::from_str(content).context("malformed JSON")?;
        let shape = ExportShape::classify(&document);
        if shape == ExportShape::Unrecognized {
            tracing::debug!("JSON document matches no known export layout");
        }
        Ok(shape.records().iter().flat_map(record_usernames).collect())
    }
}
