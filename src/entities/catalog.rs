// 🗂️ Catalog - lookup lists for client-side filter dropdowns
//
// Locations and specialities are plain `{id, name}` pairs. They are not
// foreign keys: provider records store speciality and location as free text,
// and search matches on text, never on catalog ids.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// CATALOG ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identity (UUID), assigned at construction
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(name: &str) -> Self {
        CatalogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    locations: Arc<Vec<CatalogEntry>>,
    specialities: Arc<Vec<CatalogEntry>>,
}

impl Catalog {
    /// Create catalog with the built-in lists
    pub fn new() -> Self {
        Self::from_names(DEFAULT_LOCATIONS, DEFAULT_SPECIALITIES)
    }

    pub fn from_names(locations: &[&str], specialities: &[&str]) -> Self {
        Catalog {
            locations: Arc::new(locations.iter().map(|n| CatalogEntry::new(n)).collect()),
            specialities: Arc::new(specialities.iter().map(|n| CatalogEntry::new(n)).collect()),
        }
    }

    pub fn locations(&self) -> &[CatalogEntry] {
        &self.locations
    }

    pub fn specialities(&self) -> &[CatalogEntry] {
        &self.specialities
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_LOCATIONS: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "Charlotte",
];

const DEFAULT_SPECIALITIES: &[&str] = &[
    "Cardiology",
    "Neurology",
    "Dermatology",
    "Orthopedics",
    "Pediatrics",
    "Gastroenterology",
    "Psychiatry",
    "Endocrinology",
    "Ophthalmology",
    "Pulmonology",
    "Rheumatology",
    "Nephrology",
    "Gynecology",
    "Urology",
    "Oncology",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::new();

        assert_eq!(catalog.locations().len(), 15);
        assert_eq!(catalog.specialities().len(), 15);
        assert_eq!(catalog.locations()[0].name, "New York");
        assert_eq!(catalog.specialities()[14].name, "Oncology");
    }

    #[test]
    fn test_entries_have_distinct_ids() {
        let catalog = Catalog::new();
        let mut ids: Vec<&str> = catalog
            .locations()
            .iter()
            .chain(catalog.specialities())
            .map(|e| e.id.as_str())
            .collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 30);
    }
}
