//! Layered configuration for the prefix cache.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. A TOML, YAML or JSON file, picked by extension.
//! 3. Environment variables prefixed with [`ENV_PREFIX`], nested keys
//!    separated by `__` (`HASHPREFIX_STORE__TYPE=memory`).
//!
//! ```no_run
//! let config = hashprefix_config::Config::load(None)?;
//! let cache = config.prefix_cache()?;
//! # Ok::<(), hashprefix_config::error::Error>(())
//! ```

pub mod error;
mod load;
mod settings;

pub use crate::load::{ENV_PREFIX, default_config_path};
pub use crate::settings::{CacheConfig, Config, StoreConfig};
