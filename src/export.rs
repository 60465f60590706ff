// Spreadsheet export - turn the active quote into a formatted workbook
//
// The spreadsheet writer is an optional dependency behind the `excel`
// feature. Its presence is probed once and injected into the catalog at
// construction; without it the export operations report a typed failure
// instead of crashing.

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::QuoteCatalog;
use crate::entry::Entry;

/// Whether this build carries the spreadsheet writer
pub fn excel_available() -> bool {
    cfg!(feature = "excel")
}

// ============================================================================
// EXPORT FAILURES
// ============================================================================

/// Why an export did not produce a file. Never fatal to the process.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The build does not carry the spreadsheet writer
    ExcelUnavailable,

    /// The active quote has no entries
    EmptySelection,

    /// Workbook construction or writing failed
    Failed(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::ExcelUnavailable => {
                write!(f, "The spreadsheet library is not available in this build.")
            }
            ExportError::EmptySelection => {
                write!(f, "There are no entries in the current quote.")
            }
            ExportError::Failed(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

// ============================================================================
// EXPORT OPERATIONS
// ============================================================================

impl QuoteCatalog {
    /// Export the active quote to `quote_<YYYYMMDD_HHMM>.xlsx` in the
    /// current working directory.
    pub fn export_excel(&self) -> Result<PathBuf, ExportError> {
        self.export_excel_to(Path::new("."))
    }

    /// Export the active quote into `dir`.
    ///
    /// Checks run in order: capability, then selection. The filename embeds
    /// the current time at minute granularity so consecutive exports do not
    /// collide.
    pub fn export_excel_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if !self.excel_enabled() {
            return Err(ExportError::ExcelUnavailable);
        }

        let entries = self.selected_entries();
        if entries.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let filename = format!("quote_{}.xlsx", Local::now().format("%Y%m%d_%H%M"));
        let path = dir.join(filename);

        write_workbook(&entries, self.total(), &path)?;
        println!("✓ Exported {} quote entries to {}", entries.len(), path.display());
        Ok(path)
    }
}

// ============================================================================
// WORKBOOK CONSTRUCTION
// ============================================================================

#[cfg(feature = "excel")]
fn write_workbook(entries: &[&Entry], total: f64, path: &Path) -> Result<(), ExportError> {
    build_workbook(entries, total, path).map_err(|e| ExportError::Failed(e.to_string()))
}

#[cfg(feature = "excel")]
fn build_workbook(
    entries: &[&Entry],
    total: f64,
    path: &Path,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Quote")?;

    let header = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let cell = Format::new().set_border(FormatBorder::Thin);
    let price = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("$#,##0.00")
        .set_align(FormatAlign::Right);
    let total_label = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_align(FormatAlign::Right)
        .set_border(FormatBorder::Thin);
    let total_value = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_num_format("$#,##0.00")
        .set_align(FormatAlign::Right)
        .set_border(FormatBorder::Thin);

    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 15)?;
    sheet.set_column_width(2, 25)?;

    sheet.write_string_with_format(0, 0, "Description", &header)?;
    sheet.write_string_with_format(0, 1, "Price", &header)?;
    sheet.write_string_with_format(0, 2, "Category", &header)?;

    for (idx, entry) in entries.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string_with_format(row, 0, &entry.name, &cell)?;
        sheet.write_number_with_format(row, 1, entry.price, &price)?;
        sheet.write_string_with_format(row, 2, &entry.category, &cell)?;
    }

    let total_row = (entries.len() + 1) as u32;
    sheet.write_string_with_format(total_row, 0, "TOTAL:", &total_label)?;
    sheet.write_number_with_format(total_row, 1, total, &total_value)?;
    sheet.write_string_with_format(total_row, 2, "", &cell)?;

    workbook.save(path)?;
    Ok(())
}

#[cfg(not(feature = "excel"))]
fn write_workbook(_entries: &[&Entry], _total: f64, _path: &Path) -> Result<(), ExportError> {
    Err(ExportError::ExcelUnavailable)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_selected_catalog(dir: &Path, excel_enabled: bool) -> QuoteCatalog {
        let mut catalog =
            QuoteCatalog::with_capability(dir.join("cotizaciones.json"), excel_enabled);
        catalog
            .seed_initial(vec![
                Entry::new("Arreglo de mesa", 25000.0, "Decoración"),
                Entry::new("Bouquet de novia", 45000.0, "Bouquets"),
            ])
            .unwrap();

        let ids: Vec<_> = catalog.base().iter().map(|e| e.id.clone()).collect();
        for id in ids {
            assert!(catalog.select(&id));
        }
        catalog
    }

    #[test]
    fn test_export_without_capability_fails() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = create_selected_catalog(dir.path(), false);

        let err = catalog.export_excel_to(dir.path()).unwrap_err();
        assert_eq!(err, ExportError::ExcelUnavailable);
    }

    #[test]
    fn test_export_empty_selection_fails_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = QuoteCatalog::with_capability(dir.path().join("cotizaciones.json"), true);

        let err = catalog.export_excel_to(dir.path()).unwrap_err();
        assert_eq!(err, ExportError::EmptySelection);

        let produced: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "xlsx"))
            .collect();
        assert!(produced.is_empty(), "a failed export must not create a file");
    }

    #[test]
    fn test_capability_check_precedes_selection_check() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = QuoteCatalog::with_capability(dir.path().join("cotizaciones.json"), false);

        // Empty selection AND no capability: the capability failure wins
        let err = catalog.export_excel_to(dir.path()).unwrap_err();
        assert_eq!(err, ExportError::ExcelUnavailable);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_export_writes_timestamped_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = create_selected_catalog(dir.path(), true);

        let path = catalog.export_excel_to(dir.path()).unwrap();

        assert!(path.exists());
        let filename = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.starts_with("quote_"), "got {}", filename);
        assert!(filename.ends_with(".xlsx"), "got {}", filename);
        // quote_YYYYMMDD_HHMM.xlsx
        assert_eq!(filename.len(), "quote_20250101_1200.xlsx".len(), "got {}", filename);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_export_failure_reports_message() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = create_selected_catalog(dir.path(), true);

        // Writing into a directory that does not exist fails in the writer
        let err = catalog
            .export_excel_to(&dir.path().join("missing").join("deeper"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Failed(_)), "got {:?}", err);
    }

    #[test]
    fn test_error_messages_are_distinct() {
        assert_ne!(
            ExportError::ExcelUnavailable.to_string(),
            ExportError::EmptySelection.to_string()
        );
        assert!(ExportError::Failed("disk full".to_string())
            .to_string()
            .contains("disk full"));
    }
}
