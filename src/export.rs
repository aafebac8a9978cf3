use crate::config::OutputConfig;
use crate::error::Result;
use crate::pipeline::coverage::CoverageReport;
use crate::storage::OutputStore;
use crate::types::{DatasetResult, WebData};
use std::collections::BTreeMap;
use tracing::info;

/// Locations written by one export
#[derive(Debug, Clone, Default)]
pub struct ExportedFiles {
    pub locations: Vec<String>,
}

/// Writes pipeline results through an `OutputStore` under configured names
pub struct Exporter<'a> {
    store: &'a dyn OutputStore,
    names: &'a OutputConfig,
}

/// `data.json` -> `data_compact.json`
pub fn compact_name(name: &str) -> String {
    match name.strip_suffix(".json") {
        Some(stem) => format!("{stem}_compact.json"),
        None => format!("{name}_compact"),
    }
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a dyn OutputStore, names: &'a OutputConfig) -> Self {
        Self { store, names }
    }

    /// Pretty JSON for reading plus a compact copy for the web page.
    pub fn save_web_data(&self, web_data: &WebData) -> Result<ExportedFiles> {
        let pretty = serde_json::to_string_pretty(web_data)?;
        let compact = serde_json::to_string(web_data)?;

        let mut files = ExportedFiles::default();
        files
            .locations
            .push(self.store.write_text(&self.names.web_data, &pretty)?);
        files
            .locations
            .push(self.store.write_text(&compact_name(&self.names.web_data), &compact)?);

        info!("💾 Saved web data to {}", files.locations.join(", "));
        Ok(files)
    }

    pub fn save_summary(&self, summary: &str) -> Result<String> {
        let location = self.store.write_text(&self.names.summary, summary)?;
        info!("📄 Summary saved to {}", location);
        Ok(location)
    }

    pub fn save_detailed_results(
        &self,
        dataset_results: &BTreeMap<String, DatasetResult>,
    ) -> Result<String> {
        let json = serde_json::to_string_pretty(dataset_results)?;
        let location = self.store.write_text(&self.names.detailed_results, &json)?;
        info!("💾 Detailed results saved to {}", location);
        Ok(location)
    }

    /// Text report and machine-readable JSON for a coverage analysis.
    pub fn save_coverage(&self, report: &CoverageReport, text: &str) -> Result<ExportedFiles> {
        let json = serde_json::to_string_pretty(report)?;

        let mut files = ExportedFiles::default();
        files
            .locations
            .push(self.store.write_text(&self.names.coverage_report, text)?);
        files
            .locations
            .push(self.store.write_text(&self.names.coverage_json, &json)?);

        info!("💾 Coverage saved to {}", files.locations.join(", "));
        Ok(files)
    }
}
