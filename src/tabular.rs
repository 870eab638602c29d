//! Tabular I/O: bulk input rows, CSV export, and the input template.
//!
//! Bulk input (CSV or a spreadsheet) has the columns
//! `Campaign, Ad Group, Category, URL`. Only `URL` is required; rows with a
//! blank URL are skipped. Export has one row
//! per generated ad group in the [`ExportRow`] layout.

use crate::error::AdCopyError;
use crate::output::ExportRow;
use calamine::{open_workbook_auto, Reader};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Campaign name used when a bulk row leaves `Campaign` blank.
pub const DEFAULT_BULK_CAMPAIGN: &str = "Bulk";

/// Column names of the bulk input file.
pub const BULK_COLUMNS: [&str; 4] = ["Campaign", "Ad Group", "Category", "URL"];

/// One ad group to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdGroupRequest {
    pub campaign: String,
    pub ad_group: String,
    pub category: String,
    pub url: String,
}

/// Parsed bulk input.
#[derive(Debug, Clone, Default)]
pub struct BulkInput {
    /// Rows with a URL, in file order.
    pub requests: Vec<AdGroupRequest>,
    /// Rows skipped for lack of a URL.
    pub skipped: usize,
}

/// File extensions read as spreadsheets rather than CSV.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Positions of the bulk columns in a header row.
struct ColumnMap {
    campaign: Option<usize>,
    ad_group: Option<usize>,
    category: Option<usize>,
    url: usize,
}

impl ColumnMap {
    fn from_headers<S: AsRef<str>>(headers: &[S], origin: &Path) -> Result<Self, AdCopyError> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);
        let url = find("URL").ok_or_else(|| AdCopyError::MissingColumn {
            path: origin.to_path_buf(),
            column: "URL".into(),
        })?;
        Ok(Self {
            campaign: find("Campaign"),
            ad_group: find("Ad Group"),
            category: find("Category"),
            url,
        })
    }

    /// Build a request from one data row, or `None` when the URL is blank.
    fn request<S: AsRef<str>>(&self, row: &[S]) -> Option<AdGroupRequest> {
        let cell = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .map(|v| v.as_ref().trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let url = cell(Some(self.url))?;
        Some(AdGroupRequest {
            campaign: cell(self.campaign).unwrap_or_else(|| DEFAULT_BULK_CAMPAIGN.into()),
            ad_group: cell(self.ad_group).unwrap_or_default(),
            category: cell(self.category).unwrap_or_default(),
            url,
        })
    }
}

/// Read a bulk input file.
///
/// Spreadsheets (`.xlsx`, `.xls`, `.ods`, ...) are read from their first
/// sheet; anything else is parsed as CSV.
pub fn read_bulk_file(path: impl AsRef<Path>) -> Result<BulkInput, AdCopyError> {
    let path = path.as_ref();
    if is_spreadsheet(path) {
        if !path.exists() {
            return Err(AdCopyError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        return read_bulk_spreadsheet(path);
    }

    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AdCopyError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => AdCopyError::InvalidInput {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;
    read_bulk(file, path)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}

/// Read bulk input CSV from any reader. `origin` is used in error messages.
pub fn read_bulk<R: io::Read>(reader: R, origin: &Path) -> Result<BulkInput, AdCopyError> {
    let invalid = |detail: String| AdCopyError::InvalidInput {
        path: origin.to_path_buf(),
        detail,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| invalid(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = ColumnMap::from_headers(&headers, origin)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| invalid(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(collect_requests(&columns, &rows))
}

/// Read bulk input from the first sheet of a workbook.
pub fn read_bulk_spreadsheet(path: impl AsRef<Path>) -> Result<BulkInput, AdCopyError> {
    let path = path.as_ref();
    let invalid = |detail: String| AdCopyError::InvalidInput {
        path: path.to_path_buf(),
        detail,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| invalid(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| invalid("workbook has no sheets".into()))?
        .map_err(|e| invalid(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let columns = ColumnMap::from_headers(&headers, path)?;
    let rows: Vec<Vec<String>> = rows.collect();

    Ok(collect_requests(&columns, &rows))
}

fn collect_requests(columns: &ColumnMap, rows: &[Vec<String>]) -> BulkInput {
    let mut input = BulkInput::default();
    for (line, row) in rows.iter().enumerate() {
        match columns.request(row) {
            Some(request) => input.requests.push(request),
            None => {
                debug!("Row {}: no URL, skipping", line + 1);
                input.skipped += 1;
            }
        }
    }

    if input.skipped > 0 {
        warn!("Skipped {} rows without a URL", input.skipped);
    }
    input
}

/// Write export rows as CSV to any writer.
pub fn write_rows<W: io::Write>(writer: W, rows: &[ExportRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ExportRow::header())?;
    for row in rows {
        wtr.write_record(row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write export rows to a CSV file atomically (temp file + rename).
pub fn write_rows_to_file(path: impl AsRef<Path>, rows: &[ExportRow]) -> Result<(), AdCopyError> {
    write_atomic(path.as_ref(), |file| write_rows(file, rows))
}

/// Write the bulk input template: header plus one example row.
pub fn write_template<W: io::Write>(writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(BULK_COLUMNS)?;
    wtr.write_record(["Campaign_Name", "Ad_Group", "Category", "https://example.com"])?;
    wtr.flush()?;
    Ok(())
}

/// Write the bulk input template to a file.
pub fn write_template_to_file(path: impl AsRef<Path>) -> Result<(), AdCopyError> {
    write_atomic(path.as_ref(), |file| write_template(file))
}

fn write_atomic(
    path: &Path,
    write: impl FnOnce(&mut std::fs::File) -> Result<(), csv::Error>,
) -> Result<(), AdCopyError> {
    let write_failed = |source: io::Error| AdCopyError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    let mut file = std::fs::File::create(&tmp_path).map_err(write_failed)?;
    write(&mut file).map_err(|e| write_failed(io::Error::other(e)))?;
    std::fs::rename(&tmp_path, path).map_err(write_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::AdAssetSet;
    use std::path::PathBuf;

    fn origin() -> PathBuf {
        PathBuf::from("rows.csv")
    }

    #[test]
    fn test_read_bulk_rows() {
        let csv = "Campaign,Ad Group,Category,URL\n\
                   Search_2026,Semaglutide,Semaglutide,https://a.example\n\
                   ,VoIP Systems,Business VoIP,https://b.example\n";
        let input = read_bulk(csv.as_bytes(), &origin()).unwrap();
        assert_eq!(input.requests.len(), 2);
        assert_eq!(input.skipped, 0);
        assert_eq!(input.requests[0].campaign, "Search_2026");
        assert_eq!(input.requests[1].campaign, DEFAULT_BULK_CAMPAIGN);
        assert_eq!(input.requests[1].category, "Business VoIP");
    }

    #[test]
    fn test_rows_without_url_skipped() {
        let csv = "Campaign,Ad Group,Category,URL\n\
                   C,A,casino,\n\
                   C,B,casino,   \n\
                   C,D,casino,https://d.example\n";
        let input = read_bulk(csv.as_bytes(), &origin()).unwrap();
        assert_eq!(input.requests.len(), 1);
        assert_eq!(input.skipped, 2);
        assert_eq!(input.requests[0].ad_group, "D");
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv = "URL\nhttps://only.example\n";
        let input = read_bulk(csv.as_bytes(), &origin()).unwrap();
        assert_eq!(input.requests[0].ad_group, "");
        assert_eq!(input.requests[0].category, "");
    }

    #[test]
    fn test_missing_url_column_rejected() {
        let csv = "Campaign,Ad Group,Category\nC,A,casino\n";
        let err = read_bulk(csv.as_bytes(), &origin()).unwrap_err();
        assert!(matches!(err, AdCopyError::MissingColumn { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_bulk_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, AdCopyError::InputNotFound { .. }));
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_read_xlsx_matches_csv() {
        let from_xlsx = read_bulk_file(fixture("bulk_rows.xlsx")).unwrap();
        let from_csv = read_bulk_file(fixture("bulk_rows.csv")).unwrap();

        assert_eq!(from_xlsx.requests, from_csv.requests);
        assert_eq!(from_xlsx.skipped, 1);
        assert_eq!(from_xlsx.requests.len(), 3);
        assert_eq!(from_xlsx.requests[0].campaign, "Search_2026");
        assert_eq!(from_xlsx.requests[1].campaign, DEFAULT_BULK_CAMPAIGN);
        assert_eq!(from_xlsx.requests[1].category, "Business VoIP");
        assert_eq!(from_xlsx.requests[2].url, "https://d.example");
    }

    #[test]
    fn test_spreadsheet_detected_by_extension() {
        assert!(is_spreadsheet(Path::new("rows.xlsx")));
        assert!(is_spreadsheet(Path::new("ROWS.XLSX")));
        assert!(is_spreadsheet(Path::new("rows.ods")));
        assert!(!is_spreadsheet(Path::new("rows.csv")));
        assert!(!is_spreadsheet(Path::new("rows")));
    }

    #[test]
    fn test_missing_xlsx_is_not_found() {
        let err = read_bulk_file("/definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, AdCopyError::InputNotFound { .. }));
    }

    #[test]
    fn test_corrupt_xlsx_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.xlsx");
        std::fs::write(&path, b"Campaign,URL\nnot,a workbook\n").unwrap();
        let err = read_bulk_file(&path).unwrap_err();
        assert!(matches!(err, AdCopyError::InvalidInput { .. }));
    }

    #[test]
    fn test_write_rows_quotes_commas() {
        let assets = AdAssetSet {
            headlines: vec!["Voice, Video & Text".into(); 15],
            descriptions: vec!["D".into(); 4],
            warnings: vec![],
        };
        let row = ExportRow::new("Camp", "Group", &assets);
        let mut buf = Vec::new();
        write_rows(&mut buf, &[row]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Campaign,Ad Group,Headline 1,"));
        assert!(lines.next().unwrap().starts_with("Camp,Group,\"Voice, Video & Text\","));
    }

    #[test]
    fn test_template_reads_back() {
        let mut buf = Vec::new();
        write_template(&mut buf).unwrap();
        let input = read_bulk(buf.as_slice(), &origin()).unwrap();
        assert_eq!(input.requests.len(), 1);
        assert_eq!(input.requests[0].url, "https://example.com");
    }

    #[test]
    fn test_write_rows_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/bulk.csv");
        write_rows_to_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Campaign,Ad Group"));
        assert!(!path.with_extension("csv.tmp").exists());
    }
}
