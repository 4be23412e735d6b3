//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, fixed route
//! table, and dispatch to the library or static site handlers.

use crate::config::Config;
use crate::handler::{library, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Fixed path of the library document endpoint
pub const LIBRARY_PATH: &str = "/api/repos/library";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: no route reads a request body, including POST
/// to the library endpoint, whose payload is ignored by contract.
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<Config>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;
    let access_log = config.logging.access_log;

    if access_log {
        logger::log_request(method, req.uri(), req.version());
    }

    let ctx = RequestContext {
        path,
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        access_log,
    };

    let response = if ctx.path == LIBRARY_PATH {
        route_library(&ctx, method, &config).await
    } else {
        route_site(&ctx, method, &config).await
    };

    Ok(response)
}

/// Dispatch the library endpoint; GET, POST and HEAD are interchangeable
async fn route_library(
    ctx: &RequestContext<'_>,
    method: &Method,
    config: &Arc<Config>,
) -> Response<Full<Bytes>> {
    match method {
        &Method::GET | &Method::POST | &Method::HEAD => {
            library::serve_library(ctx, &config.library.file).await
        }
        &Method::OPTIONS => http::build_options_response(),
        _ => reject_method(method),
    }
}

/// Dispatch everything else to the static site
async fn route_site(
    ctx: &RequestContext<'_>,
    method: &Method,
    config: &Arc<Config>,
) -> Response<Full<Bytes>> {
    match method {
        &Method::GET | &Method::HEAD => {
            static_files::serve_site(ctx, &config.site.dir, &config.site.index_files).await
        }
        &Method::OPTIONS => http::build_options_response(),
        _ => reject_method(method),
    }
}

fn reject_method(method: &Method) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("Method not allowed: {method}"));
    http::build_405_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LibraryConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig};
    use http_body_util::BodyExt;
    use std::path::Path;

    fn test_config(site_dir: &Path, library_file: &Path) -> Arc<Config> {
        Arc::new(Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                workers: None,
            },
            site: SiteConfig {
                dir: site_dir.to_str().unwrap().to_string(),
                index_files: vec!["index.html".to_string()],
            },
            library: LibraryConfig {
                file: library_file.to_str().unwrap().to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
            },
        })
    }

    fn fixture_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("library_server_router_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request(method: Method, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_get_and_post_are_identical() {
        let dir = fixture_dir("methods");
        let library = dir.join("library.json");
        std::fs::write(&library, "{\"items\": [1,2,3]}").unwrap();
        let config = test_config(&dir, &library);

        let get = handle_request(request(Method::GET, LIBRARY_PATH), Arc::clone(&config))
            .await
            .unwrap();
        let post = handle_request(request(Method::POST, LIBRARY_PATH), Arc::clone(&config))
            .await
            .unwrap();

        assert_eq!(get.status(), post.status());
        assert_eq!(get.headers().clone(), post.headers().clone());
        assert_eq!(body_of(get).await, body_of(post).await);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_root_serves_index_file() {
        let dir = fixture_dir("index");
        std::fs::write(dir.join("index.html"), "<p>hello</p>").unwrap();
        let config = test_config(&dir, &dir.join("library.json"));

        let resp = handle_request(request(Method::GET, "/"), config)
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(body_of(resp).await, Bytes::from("<p>hello</p>"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_root_404_without_index_file() {
        let dir = fixture_dir("no_index");
        let config = test_config(&dir, &dir.join("library.json"));

        let resp = handle_request(request(Method::GET, "/"), config)
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_unknown_method_rejected() {
        let dir = fixture_dir("reject");
        let config = test_config(&dir, &dir.join("library.json"));

        let resp = handle_request(request(Method::DELETE, LIBRARY_PATH), Arc::clone(&config))
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);

        let resp = handle_request(request(Method::PUT, "/"), config).await.unwrap();
        assert_eq!(resp.status(), 405);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let dir = fixture_dir("options");
        let config = test_config(&dir, &dir.join("library.json"));

        let resp = handle_request(request(Method::OPTIONS, LIBRARY_PATH), config)
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        std::fs::remove_dir_all(dir).unwrap();
    }
}
