use std::sync::LazyLock;

use anyhow::Result;
use scraper::{Html, Selector};

use super::Extractor;

static USERNAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a, span").unwrap());

/// Text of every `a` and `span` element, in document order.
///
/// HTML exports render each account as a profile link, so this picks up
/// usernames without depending on the surrounding layout.
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(content);
        Ok(document
            .select(&USERNAME_SELECTOR)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect())
    }
}
