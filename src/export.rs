// src/export.rs - tabular export of assembled rows
use std::path::Path;

use tracing::info;

use crate::models::{OutputRecord, Result};

pub fn write_csv(path: &Path, rows: &[OutputRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;

    fn row(place_id: &str) -> OutputRecord {
        OutputRecord {
            address: "12 FC Road, Pune".to_string(),
            doctor_name: "Dr. Rao".to_string(),
            specialty: "Dermatologist".to_string(),
            organization: "City Care Clinic".to_string(),
            years_of_experience: "14".to_string(),
            phone: "+91 20 5555 1234".to_string(),
            email: NOT_AVAILABLE.to_string(),
            rating: "4.7".to_string(),
            review_count: "80".to_string(),
            summary: NOT_AVAILABLE.to_string(),
            recommendation: "Highly recommended".to_string(),
            website: "https://citycare.example".to_string(),
            place_id: place_id.to_string(),
            locality: "Baner, Pune".to_string(),
        }
    }

    #[test]
    fn writes_headers_and_rows() {
        let dir = std::env::temp_dir().join("clinic-scraper-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.csv");

        write_csv(&path, &[row("ChIJa"), row("ChIJb")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("Complete address"));
        assert!(header.contains("Recommendation"));
        assert_eq!(lines.count(), 2);

        std::fs::remove_file(&path).ok();
    }
}
