use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::models::validate_property_id;

/// CsvConnection manages the data directory layout, one directory per property
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self { base_directory: base_path })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one property's files
    pub fn property_directory(&self, property_id: &str) -> Result<PathBuf> {
        validate_property_id(property_id)?;
        Ok(self.base_directory.join(property_id))
    }

    /// Path of a property's `bookings.csv`
    pub fn bookings_file_path(&self, property_id: &str) -> Result<PathBuf> {
        Ok(self.property_directory(property_id)?.join("bookings.csv"))
    }

    /// Ensure the property directory exists, returning it
    pub fn ensure_property_directory(&self, property_id: &str) -> Result<PathBuf> {
        let dir = self.property_directory(property_id)?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created property directory: {}", dir.display());
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_base_directory() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().join("nested").join("data");

        let connection = CsvConnection::new(&base).unwrap();
        assert!(base.exists());
        assert_eq!(connection.base_directory(), base.as_path());
    }

    #[test]
    fn test_property_paths() {
        let temp_dir = tempdir().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let path = connection.bookings_file_path("p1").unwrap();
        assert_eq!(path, temp_dir.path().join("p1").join("bookings.csv"));

        assert!(connection.property_directory("../escape").is_err());
    }
}
