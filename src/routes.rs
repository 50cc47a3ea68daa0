use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, get_service},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::hot_reload::ws_handler;
use crate::pages::{render_error, render_index, render_not_found, render_post};
use crate::state::{AppState, RouterState};

pub fn router(router_state: RouterState, static_dir: &FsPath) -> Router {
    let is_development = router_state.app_state.is_development;
    let static_files = get_service(ServeDir::new(static_dir));
    let favicon = get_service(ServeFile::new(static_dir.join("favicon.ico")));

    let mut app = Router::new()
        .route("/", get(homepage))
        .route("/{slug}", get(post_page))
        .nest_service("/static", static_files)
        .route_service("/favicon.ico", favicon);

    if is_development {
        app = app.route("/ws", get(ws_handler));
    }

    app.fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(router_state)
}

async fn homepage(State(state): State<Arc<AppState>>) -> Response {
    match state.store.get_posts().await {
        Ok(posts) => {
            let body = render_index(&state.site_title, &posts);
            Html(state.page(&state.site_title, &body)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to load post listing");
            let page = state.page(&state.site_title, &render_error());
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
        }
    }
}

/// Unpublished posts are answered with 404, same as missing ones.
async fn post_page(Path(slug): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.store.get_post(&slug).await {
        Ok(post) if post.is_published() => {
            let page = state.page(&post.title, &render_post(&post));
            Html(page).into_response()
        }
        Ok(_) => {
            debug!(%slug, "post is unpublished");
            not_found(&state, &slug)
        }
        Err(e) if e.is_not_found() => {
            debug!(%slug, "post not found");
            not_found(&state, &slug)
        }
        Err(e) => {
            error!(%slug, error = %e, "failed to load post");
            not_found(&state, &slug)
        }
    }
}

async fn fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    not_found(&state, uri.path().trim_start_matches('/'))
}

fn not_found(state: &AppState, slug: &str) -> Response {
    let page = state.page("Not found", &render_not_found(slug));
    (StatusCode::NOT_FOUND, Html(page)).into_response()
}
