//! Static site serving
//!
//! Resolves request paths inside the configured site directory, with index
//! file fallback for directory requests and canonicalization to keep lookups
//! from escaping the site root.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve an asset from the site directory
pub async fn serve_site(
    ctx: &RequestContext<'_>,
    site_dir: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_site(site_dir, ctx.path, index_files).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(200, content.len());
            }
            build_asset_response(
                &content,
                content_type,
                ctx.if_none_match.as_deref(),
                ctx.is_head,
            )
        }
        None => http::build_404_response(),
    }
}

/// Load an asset from the site directory with index file support
pub async fn load_from_site(
    site_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    let mut file_path = Path::new(site_dir).join(&clean_path);

    // Security: ensure file_path stays within site_dir
    let site_dir_canonical = match Path::new(site_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site directory not found or inaccessible '{site_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory requests fall back to the configured index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&site_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build the asset response, honoring `If-None-Match`
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::response::build_304_response(&etag);
    }

    http::response::build_asset_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        is_head,
    )
}
