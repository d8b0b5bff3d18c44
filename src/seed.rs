// 🌱 Seeding - load provider records from CSV
//
// Expected headers (camelCase, `id` optional):
//   id,name,speciality,rating,experience,consultationFee,location,available
//
// Rows without an id get a fresh UUID. The whole file is rejected on the
// first bad row, since a partially seeded directory is worse than none.

use crate::entities::{ProviderRecord, ProviderRegistry};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRow {
    #[serde(default)]
    id: Option<String>,
    name: String,
    speciality: String,
    rating: f64,
    experience: u32,
    consultation_fee: u32,
    location: String,
    available: bool,
}

impl ProviderRow {
    fn into_record(self) -> ProviderRecord {
        let mut record = ProviderRecord::new(
            self.name.trim(),
            self.speciality.trim(),
            self.rating,
            self.experience,
            self.consultation_fee,
            self.location.trim(),
            self.available,
        );
        if let Some(id) = self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
            record.id = id;
        }
        record
    }
}

/// Load provider records from a CSV file
pub fn load_providers_csv(csv_path: &Path) -> Result<Vec<ProviderRecord>> {
    let rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open seed file {}", csv_path.display()))?;
    read_providers(rdr)
}

/// Load provider records from any CSV source
pub fn read_providers<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<ProviderRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, result) in rdr.deserialize::<ProviderRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row =
            result.with_context(|| format!("Failed to deserialize provider on line {}", line))?;

        if row.name.trim().is_empty() {
            bail!("Provider on line {} has an empty name", line);
        }

        let record = row.into_record();
        if !seen_ids.insert(record.id.clone()) {
            bail!("Duplicate provider id '{}' on line {}", record.id, line);
        }
        records.push(record);
    }

    Ok(records)
}

/// Build the Record Store: from the seed file when given, built-ins otherwise
pub fn seed_registry(providers_csv: Option<&Path>) -> Result<ProviderRegistry> {
    match providers_csv {
        Some(path) => {
            let records = load_providers_csv(path)?;
            tracing::info!(
                count = records.len(),
                path = %path.display(),
                "Seeded directory from CSV"
            );
            Ok(ProviderRegistry::from_records(records))
        }
        None => {
            let registry = ProviderRegistry::new();
            tracing::info!(count = registry.len(), "Seeded built-in directory");
            Ok(registry)
        }
    }
}
