//! Recovers article fields from free-form model output.

use crate::domain::GeneratedContent;

/// Turns raw model text into title, body and caption
pub trait OutputParser: Send + Sync {
    fn parse(&self, raw: &str) -> GeneratedContent;
}

/// First line is the title, last line the caption, the lines between the body.
///
/// Blank lines at either end of the body are spacing, not content, so a
/// headline / blank / caption reply has an empty body. A single line becomes
/// both the title and the caption.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl OutputParser for LineParser {
    fn parse(&self, raw: &str) -> GeneratedContent {
        let lines: Vec<&str> = raw.trim_end().lines().collect();

        let title = lines.first().map(|l| l.trim()).unwrap_or_default();
        let caption = lines.last().map(|l| l.trim()).unwrap_or_default();

        let mut middle = if lines.len() > 2 {
            &lines[1..lines.len() - 1]
        } else {
            &[][..]
        };
        while let [first, rest @ ..] = middle {
            if !first.trim().is_empty() {
                break;
            }
            middle = rest;
        }
        while let [rest @ .., last] = middle {
            if !last.trim().is_empty() {
                break;
            }
            middle = rest;
        }

        GeneratedContent::new(title, middle.join("\n"), caption)
    }
}
