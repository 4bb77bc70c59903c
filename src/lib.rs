//! ReelGraph library crate
//!
//! In-memory social video graph: users, follows, videos, reactions, comments
//! and the feed composed from them. Re-exports core modules for integration
//! tests and external use.

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod service;
pub mod social;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use service::{Platform, SharedPlatform, UserView, VideoView};
pub use social::*;
