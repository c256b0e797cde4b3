//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use self::url::{file_name_from_url, proxy_href, resolve_url};
