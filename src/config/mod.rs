//! Configuration module for pagehoard
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration is built once at startup and shared by reference;
//! no component re-reads it from disk.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, CrawlerConfig, HttpConfig, StoreConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
