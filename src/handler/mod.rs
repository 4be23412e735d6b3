//! Request handler module
//!
//! Routing dispatch plus the two business handlers: the library document
//! endpoint and the static site.

pub mod library;
pub mod router;
pub mod static_files;

pub use router::handle_request;
