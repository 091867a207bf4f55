//! Configuration module for Site-Checker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional; every value has a default.
//!
//! # Example
//!
//! ```no_run
//! use site_checker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-checker.toml")).unwrap();
//! println!("Listening on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, CacheScope, Config, ResolverConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
