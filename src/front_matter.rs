//! Splitting post files into a front-matter block and a Markdown body.

use std::sync::Arc;

use gray_matter::{engine::YAML, Matter};
use serde::Deserialize;
use thiserror::Error;

use crate::models::FrontMatter;

const FENCE: &str = "---";
const BOM: char = '\u{feff}';

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrontMatterError {
    #[error("missing opening `---` front-matter delimiter")]
    MissingDelimiter,
    #[error("front matter is never closed by a `---` line")]
    Unterminated,
    #[error("invalid front matter: {0}")]
    Invalid(String),
}

/// A post file split into its metadata and its untouched body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Maps raw file text to a [`Document`].
pub trait FrontMatterParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Document, FrontMatterError>;
}

/// Which [`FrontMatterParser`] the post store uses.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParserKind {
    #[default]
    Fenced,
    GrayMatter,
}

impl ParserKind {
    pub fn build(self) -> Arc<dyn FrontMatterParser> {
        match self {
            ParserKind::Fenced => Arc::new(FencedYaml),
            ParserKind::GrayMatter => Arc::new(GrayMatter),
        }
    }
}

/// `---` fenced YAML. The body is returned byte-for-byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct FencedYaml;

impl FencedYaml {
    /// Returns `(yaml_block, body)`.
    fn split(text: &str) -> Result<(&str, &str), FrontMatterError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut lines = text.split_inclusive('\n');

        let opening = lines.next().ok_or(FrontMatterError::MissingDelimiter)?;
        if opening.trim_end() != FENCE {
            return Err(FrontMatterError::MissingDelimiter);
        }

        let block_start = opening.len();
        let mut offset = block_start;
        for line in lines {
            if line.trim_end() == FENCE {
                let block = &text[block_start..offset];
                let body = &text[offset + line.len()..];
                return Ok((block, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }
}

impl FrontMatterParser for FencedYaml {
    fn parse(&self, text: &str) -> Result<Document, FrontMatterError> {
        let (block, body) = Self::split(text)?;
        let front_matter = serde_yaml::from_str::<FrontMatter>(block)
            .map_err(|e| FrontMatterError::Invalid(e.to_string()))?;

        Ok(Document {
            front_matter,
            body: body.to_string(),
        })
    }
}

/// Backed by the `gray_matter` crate. Its body has leading blank lines and
/// the trailing newline stripped.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrayMatter;

impl FrontMatterParser for GrayMatter {
    fn parse(&self, text: &str) -> Result<Document, FrontMatterError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        if !text.starts_with(FENCE) {
            return Err(FrontMatterError::MissingDelimiter);
        }

        let matter = Matter::<YAML>::new();
        let parsed = matter
            .parse::<FrontMatter>(text)
            .map_err(|e| FrontMatterError::Invalid(e.to_string()))?;
        let front_matter = parsed.data.ok_or(FrontMatterError::Unterminated)?;

        Ok(Document {
            front_matter,
            body: parsed.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\ntitle: Hello\npublished_at: 2024-01-01\nblurb: A first post\n---\n# Heading\n\nSome *text*.\n";

    #[test]
    fn fenced_splits_metadata_from_body() {
        let doc = FencedYaml.parse(POST).unwrap();
        assert_eq!(doc.front_matter.title, "Hello");
        assert_eq!(doc.front_matter.published_at.as_deref(), Some("2024-01-01"));
        assert_eq!(doc.front_matter.blurb, "A first post");
        assert_eq!(doc.body, "# Heading\n\nSome *text*.\n");
    }

    #[test]
    fn fenced_body_is_untouched() {
        let text = "---\r\ntitle: Crlf\r\n---\r\n\r\n  indented\r\n---\r\nafter a rule\n\n\n";
        let doc = FencedYaml.parse(text).unwrap();
        assert_eq!(doc.front_matter.title, "Crlf");
        assert_eq!(doc.body, "\r\n  indented\r\n---\r\nafter a rule\n\n\n");
    }

    #[test]
    fn fenced_body_can_be_empty() {
        let doc = FencedYaml.parse("---\ntitle: Empty\n---").unwrap();
        assert_eq!(doc.body, "");
    }

    #[test]
    fn fenced_tolerates_bom_and_trailing_spaces_on_opening_fence() {
        let doc = FencedYaml.parse("\u{feff}---  \ntitle: Bom\n---\nbody").unwrap();
        assert_eq!(doc.front_matter.title, "Bom");
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn fenced_rejects_missing_delimiters() {
        assert_eq!(
            FencedYaml.parse("# Just markdown\n"),
            Err(FrontMatterError::MissingDelimiter)
        );
        assert_eq!(FencedYaml.parse(""), Err(FrontMatterError::MissingDelimiter));
        assert_eq!(
            FencedYaml.parse("---\ntitle: Open\nno closing fence\n"),
            Err(FrontMatterError::Unterminated)
        );
    }

    #[test]
    fn fenced_rejects_invalid_structure() {
        assert!(matches!(
            FencedYaml.parse("---\n- a\n- b\n---\nbody"),
            Err(FrontMatterError::Invalid(_))
        ));
        assert!(matches!(
            FencedYaml.parse("---\nblurb: no title\n---\nbody"),
            Err(FrontMatterError::Invalid(_))
        ));
        assert!(matches!(
            FencedYaml.parse("---\ntitle: [unclosed\n---\nbody"),
            Err(FrontMatterError::Invalid(_))
        ));
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc = FencedYaml.parse("---\ntitle: Draft\n---\nbody").unwrap();
        assert_eq!(doc.front_matter.published_at, None);
        assert_eq!(doc.front_matter.blurb, "");
    }

    #[test]
    fn gray_matter_reads_the_same_metadata() {
        let doc = GrayMatter.parse(POST).unwrap();
        assert_eq!(doc.front_matter.title, "Hello");
        assert_eq!(doc.front_matter.published_at.as_deref(), Some("2024-01-01"));
        assert!(doc.body.contains("# Heading"));
        assert!(doc.body.contains("Some *text*."));
    }

    #[test]
    fn gray_matter_rejects_files_without_front_matter() {
        assert_eq!(
            GrayMatter.parse("# Just markdown\n"),
            Err(FrontMatterError::MissingDelimiter)
        );
    }

    #[test]
    fn parser_kind_builds_matching_parser() {
        let parser = ParserKind::default().build();
        assert_eq!(parser.parse(POST).unwrap().body, "# Heading\n\nSome *text*.\n");
    }
}
