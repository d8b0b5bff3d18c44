// 🩺 Provider Entity - the searchable doctor directory
//
// "Identity is assigned once at seed time, values never change afterwards"
//
// The registry is the Record Store behind the search endpoint:
// - Seeded exactly once (built-in records or a CSV seed file)
// - No create/update/delete after construction
// - Shared between handlers as a cheap Arc clone, read without locking

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// PROVIDER RECORD
// ============================================================================

/// A single directory entry.
///
/// Serialized with camelCase keys (`consultationFee`) to match the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    /// Stable identity, assigned once at seed time
    pub id: String,

    /// Display name, e.g. "Dr. Alice"
    pub name: String,

    /// Medical speciality, free text (not keyed into the catalog)
    pub speciality: String,

    /// Average rating, conceptually 0.0 - 5.0
    pub rating: f64,

    /// Years of practice
    pub experience: u32,

    /// Consultation fee in whole currency units
    pub consultation_fee: u32,

    /// City
    pub location: String,

    /// Whether the provider is accepting appointments
    pub available: bool,
}

impl ProviderRecord {
    /// Create a new record with a fresh UUID
    pub fn new(
        name: &str,
        speciality: &str,
        rating: f64,
        experience: u32,
        consultation_fee: u32,
        location: &str,
        available: bool,
    ) -> Self {
        ProviderRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            speciality: speciality.to_string(),
            rating,
            experience,
            consultation_fee,
            location: location.to_string(),
            available,
        }
    }
}

// ============================================================================
// PROVIDER REGISTRY (Record Store)
// ============================================================================

/// Immutable, ordered collection of provider records.
///
/// Store order is significant: it is the tie-break order for stable sorting.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    records: Arc<Vec<ProviderRecord>>,
}

impl ProviderRegistry {
    /// Create registry seeded with the built-in directory
    pub fn new() -> Self {
        Self::from_records(default_providers())
    }

    /// Create registry from an explicit record list (seed file, tests)
    pub fn from_records(records: Vec<ProviderRecord>) -> Self {
        ProviderRegistry {
            records: Arc::new(records),
        }
    }

    /// All records in store order
    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    /// Find record by id
    pub fn find_by_id(&self, id: &str) -> Option<&ProviderRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The 15 providers the service ships with
fn default_providers() -> Vec<ProviderRecord> {
    vec![
        ProviderRecord::new("Dr. Alice", "Cardiology", 4.5, 10, 600, "New York", true),
        ProviderRecord::new("Dr. Bob", "Dermatology", 4.2, 8, 400, "Los Angeles", false),
        ProviderRecord::new("Dr. Charlie", "Cardiology", 4.8, 15, 750, "Chicago", true),
        ProviderRecord::new("Dr. Daisy", "Neurology", 4.6, 12, 1000, "Boston", true),
        ProviderRecord::new("Dr. Edward", "Cardiology", 4.1, 7, 500, "New York", false),
        ProviderRecord::new("Dr. Fiona", "Pediatrics", 4.7, 9, 300, "Austin", true),
        ProviderRecord::new("Dr. George", "Orthopedics", 4.3, 11, 700, "Seattle", true),
        ProviderRecord::new("Dr. Helen", "Dermatology", 4.0, 6, 450, "San Francisco", false),
        ProviderRecord::new("Dr. Ian", "Gastroenterology", 4.4, 13, 650, "Denver", true),
        ProviderRecord::new("Dr. Julia", "Endocrinology", 4.9, 14, 900, "Miami", true),
        ProviderRecord::new("Dr. Kevin", "Psychiatry", 4.1, 10, 550, "Atlanta", false),
        ProviderRecord::new("Dr. Laura", "Ophthalmology", 4.6, 12, 480, "San Diego", true),
        ProviderRecord::new("Dr. Mark", "Urology", 4.3, 9, 530, "Dallas", true),
        ProviderRecord::new("Dr. Nina", "Rheumatology", 4.7, 11, 670, "Philadelphia", false),
        ProviderRecord::new("Dr. Oscar", "Pulmonology", 4.2, 8, 620, "Portland", true),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_provider_creation() {
        let p = ProviderRecord::new("Dr. Test", "Cardiology", 4.5, 10, 600, "New York", true);

        assert!(!p.id.is_empty());
        assert_eq!(p.name, "Dr. Test");
        assert_eq!(p.consultation_fee, 600);
        assert!(p.available);
    }

    #[test]
    fn test_default_registry() {
        let registry = ProviderRegistry::new();

        assert_eq!(registry.len(), 15);
        assert!(!registry.is_empty());
        assert_eq!(registry.records()[0].name, "Dr. Alice");
        assert_eq!(registry.records()[14].name, "Dr. Oscar");
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ProviderRegistry::new();
        let ids: HashSet<&str> = registry.records().iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids.len(), registry.len());
    }

    #[test]
    fn test_ids_stable_across_clones() {
        let registry = ProviderRegistry::new();
        let clone = registry.clone();

        // Clones share the same seeded records
        for (a, b) in registry.records().iter().zip(clone.records()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_find_by_id() {
        let registry = ProviderRegistry::new();
        let julia_id = registry.records()[9].id.clone();

        let found = registry.find_by_id(&julia_id);
        assert_eq!(found.map(|r| r.name.as_str()), Some("Dr. Julia"));

        assert!(registry.find_by_id("non-existent-uuid").is_none());
    }

    #[test]
    fn test_camel_case_serialization() {
        let p = ProviderRecord::new("Dr. Test", "Cardiology", 4.5, 10, 600, "New York", true);
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["consultationFee"], 600);
        assert_eq!(json["speciality"], "Cardiology");
        assert!(json.get("consultation_fee").is_none());
    }
}
