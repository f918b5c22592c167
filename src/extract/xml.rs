use anyhow::{Context, Result, bail};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::Extractor;

/// Element path, outermost first, whose text holds a username.
const VALUE_PATH: [&[u8]; 3] = [b"string_list_data", b"item", b"value"];

fn at_value_path(stack: &[Vec<u8>]) -> bool {
    stack.len() >= VALUE_PATH.len()
        && stack[stack.len() - VALUE_PATH.len()..]
            .iter()
            .zip(VALUE_PATH)
            .all(|(open, expected)| open.as_slice() == expected)
}

/// Text of `value` elements that are direct children of an `item` inside
/// `string_list_data`.
pub struct XmlExtractor;

impl Extractor for XmlExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(content);
        let mut stack: Vec<Vec<u8>> = Vec::new();
        // Stack depth of the `value` element being captured, and its text so far
        let mut capture: Option<(usize, String)> = None;
        let mut usernames = Vec::new();

        loop {
            let event = reader
                .read_event()
                .with_context(|| format!("malformed XML at byte {}", reader.buffer_position()))?;

            match event {
                Event::Start(e) => {
                    stack.push(e.name().as_ref().to_vec());
                    if capture.is_none() && at_value_path(&stack) {
                        capture = Some((stack.len(), String::new()));
                    }
                }
                Event::End(_) => {
                    if let Some((_, text)) = capture.take_if(|(depth, _)| *depth == stack.len()) {
                        let text = text.trim();
                        if !text.is_empty() {
                            usernames.push(text.to_string());
                        }
                    }
                    stack.pop();
                }
                Event::Text(e) => {
                    if let Some((_, text)) = capture.as_mut() {
                        text.push_str(&e.unescape().context("invalid character reference")?);
                    }
                }
                Event::CData(e) => {
                    if let Some((_, text)) = capture.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            bail!("unclosed element <{}>", String::from_utf8_lossy(open));
        }

        Ok(usernames)
    }
}
