// Entity Models
//
// Each entity has:
// - Stable identity (UUID) assigned once
// - A registry owning the collection and its lookups

pub mod provider;
pub mod account;
pub mod catalog;

pub use provider::{ProviderRecord, ProviderRegistry};
pub use account::{normalize_email, AccountProfile, AccountRecord, AccountRegistry, SignupPolicy};
pub use catalog::{Catalog, CatalogEntry};
