use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use pulldown_cmark::{html, Options, Parser};

use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Render the configured markdown file as an HTML page.
pub async fn readme(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let path = services.readme_path();
    let source = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "readme unavailable");
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        }
    };

    Html(render_markdown(&source)).into_response()
}

pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
