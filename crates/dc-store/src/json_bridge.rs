use std::fs;
use std::path::Path;

use dc_core::wire;

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// Export the full namespace as a single JSON blob.
    pub fn export_json_string(&self) -> Result<String> {
        let days = self.load_days()?;
        let experiment = self.experiment()?;
        let start = self.start_date()?;
        wire::export_store(&days, experiment.as_ref(), start.as_deref())
            .map_err(|e| StoreError::Codec(format!("JSON export failed: {e}")))
    }

    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        let json = self.export_json_string()?;
        fs::write(path, json)
            .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", path.display())))
    }

    /// Import a full-store blob, replacing the current namespace. Imported
    /// days run through the same repair path as an ordinary load, so the
    /// blob is never trusted structurally.
    pub fn import_json_str(&self, json: &str) -> Result<()> {
        let (days, experiment, start) = wire::import_store(json)
            .map_err(|e| StoreError::Codec(format!("invalid JSON: {e}")))?;

        self.reset_namespace()?;
        for day in &days {
            self.save_day(day)?;
        }
        if let Some(exp) = &experiment {
            self.set_experiment(exp)?;
        }
        if let Some(start) = &start {
            self.set_start_date(start)?;
        }
        tracing::info!("imported {} day records", days.len());
        Ok(())
    }

    pub fn import_json_file(&self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("failed to read {}: {e}", path.display())))?;
        self.import_json_str(&json)
    }
}
