// src/lib.rs

//! Course Dashboard Library
//!
//! Scrapes a student portal's course pages into a local cache and renders a
//! grade dashboard from them.

pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod storage;
pub mod utils;
