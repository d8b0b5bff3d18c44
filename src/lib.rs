// Doctor Directory - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod query;
pub mod seed;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::DirectoryConfig;
pub use entities::{
    normalize_email, AccountProfile, AccountRecord, AccountRegistry, Catalog, CatalogEntry,
    ProviderRecord, ProviderRegistry, SignupPolicy,
};
pub use error::DirectoryError;
pub use query::{
    lenient, search, Predicate, SearchParams, SearchQuery, SortField, SortOrder, SortSpec,
};
pub use seed::{load_providers_csv, seed_registry};

#[cfg(feature = "server")]
pub use api::{router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
