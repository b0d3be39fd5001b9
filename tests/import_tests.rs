//! Bulk import tests: CSV and Excel payloads, per-row and atomic modes
//!
//! Workbooks are generated in memory with `rust_xlsxwriter`.

use rust_xlsxwriter::Workbook;
use socks::prelude::*;

const HEADER: &str = "color,cottonPercentage,quantity\n";

fn service_with(mode: ImportMode) -> InventoryService {
    InventoryService::new(Arc::new(InMemorySockStore::new()))
        .with_import_config(ImportConfig { mode })
}

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// Build an .xlsx file whose first sheet holds a header row and `rows`
fn workbook(rows: &[[Cell<'_>; 3]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, title) in ["color", "cottonPercentage", "quantity"].iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (row, cells) in rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (row, col) = (row as u32 + 1, col as u16);
            match cell {
                Cell::Text(text) => sheet.write_string(row, col, *text).unwrap(),
                Cell::Number(number) => sheet.write_number(row, col, *number).unwrap(),
            };
        }
    }

    workbook.save_to_buffer().unwrap()
}

async fn quantity_of(service: &InventoryService, color: &str) -> Vec<i32> {
    let q = SockQuery {
        color: Some(color.to_string()),
        ..SockQuery::default()
    };
    service
        .list_socks(&q)
        .await
        .unwrap()
        .iter()
        .map(|s| s.quantity)
        .collect()
}

// ============================================================================
// CSV
// ============================================================================

#[tokio::test]
async fn test_csv_rows_merge_into_existing_stock() {
    let service = service_with(ImportMode::PerRow);
    service.add_socks(&SockPayload::new("red", 80, 5)).await.unwrap();

    let body = format!("{}red,80,10\nblue,60,3\nblue,60,4\n", HEADER);
    let summary = service.import_file("stock.csv", body.as_bytes()).await.unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            format: FileFormat::Csv,
            rows: 3,
            created: 1,
            merged: 2,
        }
    );
    assert_eq!(quantity_of(&service, "red").await, vec![15]);
    assert_eq!(quantity_of(&service, "blue").await, vec![7]);
}

#[tokio::test]
async fn test_csv_per_row_keeps_rows_before_failure() {
    let service = service_with(ImportMode::PerRow);

    let body = format!("{}red,80,10\nblue,60,5\ngreen,40,abc\nwhite,10,1\n", HEADER);
    let err = service
        .import_file("stock.csv", body.as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::FileProcessing { .. }));
    assert!(err.to_string().contains("row 4"), "{}", err);

    let all = service.all_socks().await.unwrap();
    let colors: Vec<&str> = all.iter().map(|s| s.color.as_str()).collect();
    assert_eq!(colors, vec!["red", "blue"]);
}

#[tokio::test]
async fn test_csv_atomic_commits_nothing_on_failure() {
    let service = service_with(ImportMode::Atomic);
    service.add_socks(&SockPayload::new("red", 80, 5)).await.unwrap();

    let body = format!("{}red,80,10\nblue,60,5\ngreen,40,abc\n", HEADER);
    let err = service
        .import_file("stock.csv", body.as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::FileProcessing { .. }));
    assert_eq!(service.all_socks().await.unwrap().len(), 1);
    assert_eq!(quantity_of(&service, "red").await, vec![5]);
}

#[tokio::test]
async fn test_csv_atomic_success() {
    let service = service_with(ImportMode::Atomic);

    let body = format!("{}red,80,10\nred,80,1\n", HEADER);
    let summary = service.import_file("STOCK.CSV", body.as_bytes()).await.unwrap();

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.merged, 1);
    assert_eq!(quantity_of(&service, "red").await, vec![11]);
}

#[tokio::test]
async fn test_csv_wrong_column_count() {
    let service = service_with(ImportMode::PerRow);

    let body = format!("{}red,80\n", HEADER);
    let err = service
        .import_file("stock.csv", body.as_bytes())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("expected 3 columns"));
}

#[tokio::test]
async fn test_header_only_file_imports_nothing() {
    let service = service_with(ImportMode::PerRow);

    let summary = service.import_file("stock.csv", HEADER.as_bytes()).await.unwrap();

    assert_eq!(summary.rows, 0);
    assert!(service.all_socks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_extension() {
    let service = service_with(ImportMode::PerRow);

    let err = service.import_file("stock.json", b"[]").await.unwrap_err();

    assert!(matches!(err, InventoryError::UnsupportedFileType { .. }));
}

// ============================================================================
// Excel
// ============================================================================

#[tokio::test]
async fn test_xlsx_import() {
    let service = service_with(ImportMode::PerRow);
    let bytes = workbook(&[
        [Cell::Text("red"), Cell::Number(80.0), Cell::Number(10.0)],
        [Cell::Text("blue"), Cell::Number(60.0), Cell::Number(2.9)],
        [Cell::Text("red"), Cell::Text("80"), Cell::Text("5")],
    ]);

    let summary = service.import_file("stock.xlsx", &bytes).await.unwrap();

    assert_eq!(summary.format, FileFormat::Spreadsheet);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.created, 2);
    assert_eq!(quantity_of(&service, "red").await, vec![15]);
    // numeric cells are truncated toward zero
    assert_eq!(quantity_of(&service, "blue").await, vec![2]);
}

#[tokio::test]
async fn test_xlsx_per_row_keeps_rows_before_failure() {
    let service = service_with(ImportMode::PerRow);
    let bytes = workbook(&[
        [Cell::Text("red"), Cell::Number(80.0), Cell::Number(10.0)],
        [Cell::Text("blue"), Cell::Number(60.0), Cell::Number(5.0)],
        [Cell::Text("green"), Cell::Number(40.0), Cell::Text("plenty")],
    ]);

    let err = service.import_file("stock.xlsx", &bytes).await.unwrap_err();

    assert!(matches!(err, InventoryError::FileProcessing { .. }));
    assert!(err.to_string().contains("row 4"), "{}", err);
    assert_eq!(service.all_socks().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_xlsx_atomic_commits_nothing_on_failure() {
    let service = service_with(ImportMode::Atomic);
    let bytes = workbook(&[
        [Cell::Text("red"), Cell::Number(80.0), Cell::Number(10.0)],
        [Cell::Text("green"), Cell::Text("forty"), Cell::Number(1.0)],
    ]);

    let err = service.import_file("stock.xlsx", &bytes).await.unwrap_err();

    assert!(matches!(err, InventoryError::FileProcessing { .. }));
    assert!(service.all_socks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_workbook() {
    let service = service_with(ImportMode::PerRow);

    let err = service
        .import_file("stock.xlsx", b"PK this is not really a zip")
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::FileProcessing { .. }));
}
