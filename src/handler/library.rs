//! Library document endpoint
//!
//! The document is re-read from disk on every request, so out-of-band edits
//! to the file show up without a restart. The server never writes it.

use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use tokio::fs;

/// Serve the library document
///
/// GET, POST and HEAD all end up here and perform the identical read-only
/// operation; request bodies and query strings are never inspected.
pub async fn serve_library(ctx: &RequestContext<'_>, file: &str) -> Response<Full<Bytes>> {
    match load_library(file).await {
        Ok(body) => {
            if ctx.access_log {
                logger::log_response(200, body.len());
            }
            http::response::build_library_response(body, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to load library document '{file}': {e}"));
            http::build_500_response()
        }
    }
}

/// Read the library file and re-serialize its JSON contents
///
/// The document is opaque: any syntactically valid JSON value passes through
/// unvalidated. A missing file or a parse failure fails the request.
async fn load_library(file: &str) -> io::Result<String> {
    let raw = fs::read(file).await?;
    let value: serde_json::Value = serde_json::from_slice(&raw)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    serde_json::to_string(&value).map_err(io::Error::from)
}
