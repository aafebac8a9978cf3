// Pipeline ingestion: dataset discovery and robust CSV reading

pub mod discovery;
pub mod reader;
pub mod table;

pub use discovery::{discover_csv_files, list_datasets, DatasetDir};
pub use reader::{delimiter_label, CsvReader, ReadOutcome, TextEncoding};
pub use table::{ColumnKind, Table};
