use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// Metadata block at the top of a post file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub blurb: String,
}

/// A post ready for rendering. Built fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub blurb: String,
    /// Raw Markdown body, exactly as written after the front matter.
    pub content: String,
}

impl Post {
    pub fn from_front_matter(slug: &str, front_matter: FrontMatter, content: String) -> Self {
        let published_at = front_matter
            .published_at
            .as_deref()
            .and_then(|raw| {
                let parsed = parse_published_at(raw);
                if parsed.is_none() && !raw.trim().is_empty() {
                    warn!(
                        slug,
                        published_at = raw,
                        "unparseable publication date, treating post as unpublished"
                    );
                }
                parsed
            });

        Post {
            slug: slug.to_string(),
            title: front_matter.title,
            published_at,
            blurb: front_matter.blurb,
            content,
        }
    }

    /// Posts without a publication date are drafts.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a front-matter `published_at` value. Naive values are read as UTC.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_plain_dates_as_utc_midnight() {
        let parsed = parse_published_at("2024-06-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_published_at("2024-06-01T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetimes() {
        let expected = Utc.with_ymd_and_hms(2023, 12, 24, 18, 5, 9).unwrap();
        assert_eq!(parse_published_at("2023-12-24T18:05:09"), Some(expected));
        assert_eq!(parse_published_at("2023-12-24 18:05:09"), Some(expected));
    }

    #[test]
    fn empty_and_garbage_values_are_unset() {
        assert_eq!(parse_published_at(""), None);
        assert_eq!(parse_published_at("   "), None);
        assert_eq!(parse_published_at("sometime soon"), None);
        assert_eq!(parse_published_at("2024-13-45"), None);
    }

    #[test]
    fn post_keeps_slug_and_body_verbatim() {
        let front_matter = FrontMatter {
            title: "Hello".to_string(),
            published_at: Some("not a date".to_string()),
            blurb: "Short".to_string(),
        };
        let post = Post::from_front_matter("Hello_World", front_matter, "body\r\n".to_string());

        assert_eq!(post.slug, "Hello_World");
        assert_eq!(post.content, "body\r\n");
        assert!(!post.is_published());
    }
}
