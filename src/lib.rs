//! Serves a directory of Markdown posts with YAML front matter as a blog.

pub mod config;
pub mod content_loader;
pub mod error;
pub mod front_matter;
pub mod hot_reload;
pub mod markdown;
pub mod models;
pub mod pages;
pub mod routes;
pub mod state;

pub use config::Config;
pub use content_loader::{LoadPolicy, PostStore};
pub use error::PostError;
pub use front_matter::{FencedYaml, FrontMatterParser, GrayMatter};
pub use models::Post;
