//! HTTP client module
//!
//! Plain GET downloads used by the archive uploader and by the loader for
//! remote sources.

mod client;

pub use client::{Fetched, HttpClient, USER_AGENT};
