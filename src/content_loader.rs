use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PostError, Result};
use crate::front_matter::FrontMatterParser;
use crate::models::Post;

const POST_EXTENSION: &str = "md";

/// What `get_posts` does when a single post fails to load.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// The whole listing fails.
    #[default]
    FailFast,
    /// The post is logged and left out.
    SkipInvalid,
}

/// Reads posts from a directory on every call. Nothing is cached.
#[derive(Clone)]
pub struct PostStore {
    posts_dir: PathBuf,
    parser: Arc<dyn FrontMatterParser>,
    policy: LoadPolicy,
    concurrency: usize,
}

impl PostStore {
    pub fn new(posts_dir: impl Into<PathBuf>, parser: Arc<dyn FrontMatterParser>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            parser,
            policy: LoadPolicy::default(),
            concurrency: 16,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.posts_dir, config.front_matter.build())
            .with_policy(config.load_policy)
            .with_concurrency(config.concurrency())
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Load `<posts_dir>/<slug>.md`. The returned post carries `slug` verbatim.
    pub async fn get_post(&self, slug: &str) -> Result<Post> {
        if !is_plain_stem(slug) {
            return Err(PostError::NotFound {
                slug: slug.to_string(),
            });
        }

        let path = self.posts_dir.join(format!("{slug}.{POST_EXTENSION}"));
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PostError::NotFound {
                    slug: slug.to_string(),
                });
            }
            Err(source) => return Err(PostError::Io { path, source }),
        };

        let document = self.parser.parse(&text).map_err(|source| PostError::Parse {
            slug: slug.to_string(),
            source,
        })?;

        debug!(slug, "loaded post");
        Ok(Post::from_front_matter(
            slug,
            document.front_matter,
            document.body,
        ))
    }

    /// Published posts, newest first. Equal dates keep directory order.
    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        let slugs = self.list_slugs().await?;
        let total = slugs.len();
        let loads = stream::iter(slugs)
            .map(|slug| async move {
                let result = self.get_post(&slug).await;
                (slug, result)
            })
            .buffered(self.concurrency);

        let loaded: Vec<Post> = match self.policy {
            LoadPolicy::FailFast => loads
                .map(|(_, result)| result)
                .try_collect::<Vec<_>>()
                .await?,
            LoadPolicy::SkipInvalid => {
                loads
                    .filter_map(|(slug, result)| async move {
                        match result {
                            Ok(post) => Some(post),
                            Err(e) => {
                                warn!(%slug, error = %e, "skipping post that failed to load");
                                None
                            }
                        }
                    })
                    .collect()
                    .await
            }
        };

        let mut posts: Vec<Post> = loaded.into_iter().filter(Post::is_published).collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        info!(total, published = posts.len(), "loaded post listing");
        Ok(posts)
    }

    /// Slugs of every visible `*.md` file, in directory order.
    async fn list_slugs(&self) -> Result<Vec<String>> {
        let io_err = |source: std::io::Error| PostError::Io {
            path: self.posts_dir.clone(),
            source,
        };

        let mut slugs = Vec::new();
        let mut entries = fs::read_dir(&self.posts_dir).await.map_err(io_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Some(slug) = name.strip_suffix(".md") else {
                continue;
            };
            if !is_plain_stem(slug) {
                debug!(name, "skipping file name that is not a valid slug");
                continue;
            }
            if entry.file_type().await.map_err(io_err)?.is_dir() {
                continue;
            }
            slugs.push(slug.to_string());
        }
        Ok(slugs)
    }
}

/// A slug must name a file directly inside the posts directory.
fn is_plain_stem(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}
