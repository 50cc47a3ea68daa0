use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::content_loader::PostStore;

pub type RefreshBroadcaster = broadcast::Sender<()>;

pub struct AppState {
    pub store: PostStore,
    pub site_title: String,
    pub is_development: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: PostStore::from_config(config),
            site_title: config.site_title.clone(),
            is_development: config.development,
        }
    }

    pub fn page(&self, title: &str, content: &str) -> String {
        crate::pages::render_with_layout(title, content, self.is_development)
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub app_state: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app_state.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
