//! # Dbx Module
//!
//! Bootstrap glue that exposes the Dropbox storage client as an injectable
//! service.
//!
//! ```rust,ignore
//! use dbx_client::StorageService;
//! use dbx_module::{LaunchConfig, Registry, StorageModule};
//!
//! let registry = Registry::new();
//! StorageModule::new().configure(&registry, &LaunchConfig::load()?)?;
//!
//! let storage = registry.require::<dyn StorageService>()?;
//! let listing = storage.list("/").await?;
//! ```

mod error;
mod launch;
mod module;
mod registry;

pub use error::{ModuleError, Result};
pub use launch::{LaunchConfig, ENV_PREFIX};
pub use module::StorageModule;
pub use registry::Registry;
