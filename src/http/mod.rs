//! HTTP protocol layer module
//!
//! Content-type detection, conditional-request helpers, and response builders,
//! decoupled from the route handlers that use them.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_500_response, build_options_response,
};
