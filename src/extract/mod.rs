//! Per-format username extractors.
//!
//! Each extractor turns the text of one archive entry into the usernames it
//! contains, in document order, with empty and whitespace-only values
//! removed. Extractors never touch the archive themselves.

mod html;
mod json;
mod text;
mod xml;

pub use html::HtmlExtractor;
pub use json::{ExportShape, JsonExtractor};
pub use text::TextExtractor;
pub use xml::XmlExtractor;

use anyhow::Result;

use crate::format::FormatTag;

/// Turns entry content into a list of usernames.
pub trait Extractor: Sync {
    fn extract(&self, content: &str) -> Result<Vec<String>>;
}

/// Registered extractors, one per format that has one.
static STRATEGIES: &[(FormatTag, &dyn Extractor)] = &[
    (FormatTag::Html, &HtmlExtractor),
    (FormatTag::Json, &JsonExtractor),
    (FormatTag::Xml, &XmlExtractor),
    (FormatTag::Text, &TextExtractor),
];

/// Look up the extractor registered for a format.
pub fn strategy_for(format: FormatTag) -> Option<&'static dyn Extractor> {
    STRATEGIES
        .iter()
        .find(|(tag, _)| *tag == format)
        .map(|&(_, extractor)| extractor)
}

/// Keep a candidate only if it has visible characters.
pub(crate) fn is_meaningful(value: &str) -> bool {
    !value.trim().is_empty()
}
