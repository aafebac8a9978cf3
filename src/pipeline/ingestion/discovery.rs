use crate::error::{IntegrationError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A top-level dataset directory under the dataset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDir {
    pub name: String,
    pub path: PathBuf,
}

/// Every immediate sub-directory of `root` is one dataset, sorted by name.
pub fn list_datasets(root: &Path) -> Result<Vec<DatasetDir>> {
    if !root.is_dir() {
        return Err(IntegrationError::DatasetRoot(root.to_path_buf()));
    }

    let mut datasets = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            datasets.push(DatasetDir {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
            });
        }
    }

    datasets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(datasets)
}

/// Recursively collect CSV files below `dataset_dir`, skipping sample files.
pub fn discover_csv_files(dataset_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dataset_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_dataset_csv(&entry) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                // Continue scanning, don't abort
                warn!("Error accessing entry: {}", e);
            }
        }
    }

    debug!("{} CSV files under {}", files.len(), dataset_dir.display());
    files
}

fn is_dataset_csv(entry: &DirEntry) -> bool {
    is_dataset_csv_name(&entry.file_name().to_string_lossy())
}

fn is_dataset_csv_name(file_name: &str) -> bool {
    file_name.ends_with(".csv") && !file_name.to_lowercase().contains(".sample")
}
