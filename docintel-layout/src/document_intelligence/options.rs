//! Options types for Document Intelligence analyze requests.

use std::fmt;

use strum::{Display, EnumString};

/// Format of the `content` string returned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Inclusive, 1-indexed page range (`3-4`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Number of pages covered by the range
    pub fn page_count(&self) -> u32 {
        self.last.saturating_sub(self.first) + 1
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Options for an analyze request
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Restrict analysis to these pages; the whole document when unset
    pub pages: Option<PageRange>,
    /// Desired format of the returned content
    pub content_format: ContentFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range_display() {
        assert_eq!(PageRange::new(1, 2).to_string(), "1-2");
        assert_eq!(PageRange::new(5, 5).to_string(), "5-5");
        assert_eq!(PageRange::new(5, 5).page_count(), 1);
    }

    #[test]
    fn test_content_format_wire_names() {
        assert_eq!(ContentFormat::Markdown.to_string(), "markdown");
        assert_eq!("json".parse::<ContentFormat>().unwrap(), ContentFormat::Json);
        assert_eq!(ContentFormat::default(), ContentFormat::Text);
    }
}
