//! Master-code spreadsheet import.
//!
//! Files are checked locally (extension, and for CSV the header row) before
//! anything is uploaded. The upload itself is a [`StagedAction`]: a dry run
//! reports per-row validity and the intended action, and the real import is
//! only allowed after a dry run with no invalid rows.

use std::path::Path;

use async_trait::async_trait;

use crate::{
    console::Console,
    error::{ConsoleError, Result},
    models::BulkUploadResult,
    staged::{StagedAction, StagedOperation},
};

const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];
const REQUIRED_COLUMNS: [&str; 2] = ["code_type", "code_value"];

/// Sample file offered to users.
pub const TEMPLATE_CSV: &str = "code_type,code_value,short_description,long_description
WORK_CENTER,WC_SITE,Site Work Center,Primary work center for site operations
COST_CENTER,CC_001,Cost Center 001,Primary cost center for general operations
";

/// A spreadsheet that passed the local checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImportFile {
    /// Reads and checks the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConsoleError::validation("file").with_reason("missing file name"))?
            .to_string();
        // extension first so an unsupported file is never read
        extension_of(&file_name)?;
        let bytes = std::fs::read(path).map_err(|e| ConsoleError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(file_name, bytes)
    }

    /// Checks in-memory content named `file_name`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        if extension_of(&file_name)? == "csv" {
            check_csv_header(&bytes)?;
        }
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn extension_of(file_name: &str) -> Result<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ConsoleError::validation("file")
            .with_reason("Please select a CSV or Excel file (.csv, .xlsx, .xls)"))
    }
}

fn check_csv_header(bytes: &[u8]) -> Result<()> {
    let text = String::from_utf8_lossy(bytes);
    let header = text
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .unwrap_or_default();
    let columns: Vec<String> = header
        .split(',')
        .map(|column| column.trim().trim_matches('"').to_lowercase())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|c| c == required))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConsoleError::validation("file")
            .with_reason(format!("missing required column(s): {}", missing.join(", "))))
    }
}

/// Uploading master codes as a staged operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasterCodeImport;

#[async_trait]
impl StagedOperation for MasterCodeImport {
    type Input = ImportFile;
    type Preview = BulkUploadResult;
    type Outcome = BulkUploadResult;

    async fn preview(&self, console: &Console, input: &Self::Input) -> Result<Self::Preview> {
        console.upload_master_codes(input, true).await
    }

    fn is_committable(&self, preview: &Self::Preview) -> bool {
        preview.is_committable()
    }

    async fn commit(&self, console: &Console, input: &Self::Input) -> Result<Self::Outcome> {
        console.upload_master_codes(input, false).await
    }
}

/// A master-code import in progress.
pub type BulkImport = StagedAction<MasterCodeImport>;

impl BulkImport {
    pub fn master_codes() -> Self {
        StagedAction::new(MasterCodeImport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_whitelist() {
        assert!(ImportFile::from_bytes("codes.xlsx", vec![1, 2, 3]).is_ok());
        assert!(ImportFile::from_bytes("codes.XLS", vec![]).is_ok());
        assert!(ImportFile::from_bytes("codes.txt", b"code_type,code_value".to_vec()).is_err());
        assert!(ImportFile::from_bytes("codes", vec![]).is_err());
    }

    #[test]
    fn test_csv_header_requires_columns() {
        assert!(ImportFile::from_bytes("t.csv", TEMPLATE_CSV.as_bytes().to_vec()).is_ok());
        assert!(
            ImportFile::from_bytes("t.csv", b"\xEF\xBB\xBF\"Code_Type\",code_value\n".to_vec())
                .is_ok()
        );

        let err = ImportFile::from_bytes("t.csv", b"code_type,short_description\n".to_vec())
            .expect_err("header without code_value");
        assert!(err.to_string().contains("code_value"));
    }

    #[test]
    fn test_load_reads_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("codes.csv");
        std::fs::write(&path, TEMPLATE_CSV).expect("write");

        let file = ImportFile::load(&path).expect("load");
        assert_eq!(file.file_name(), "codes.csv");
        assert_eq!(file.bytes(), TEMPLATE_CSV.as_bytes());

        assert!(matches!(
            ImportFile::load(temp_dir.path().join("absent.csv")),
            Err(ConsoleError::FileSystem { .. })
        ));
    }
}
