use std::path::PathBuf;

use thiserror::Error;

use crate::front_matter::FrontMatterError;

pub type Result<T> = std::result::Result<T, PostError>;

/// Failures surfaced by the post store. Nothing is recovered locally.
#[derive(Error, Debug)]
pub enum PostError {
    /// No `<slug>.md` exists, or the slug is not a plain file stem
    #[error("post '{slug}' not found")]
    NotFound { slug: String },

    /// Front matter missing or malformed
    #[error("failed to parse front matter of post '{slug}': {source}")]
    Parse {
        slug: String,
        #[source]
        source: FrontMatterError,
    },

    /// Any other read or directory-listing failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PostError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PostError::NotFound { .. })
    }
}
