//! Poya - Holiday lookup service
//!
//! Resolves dates against yearly holiday datasets and lists a year's
//! holidays, behind API key validation and a cache-aside dataset cache.

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod holiday;
pub mod listing;
pub mod resolver;
pub mod server;
pub mod service;
pub mod store;
pub mod ui;

pub use error::{PoyaError, PoyaResult};
