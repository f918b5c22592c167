use anyhow::Result;

use super::Extractor;

/// One username per line.
pub struct TextExtractor;

impl Extractor for TextExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        Ok(content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
