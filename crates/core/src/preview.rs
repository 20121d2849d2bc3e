//! Per-sheet preview of a parsed spreadsheet.

use serde::{Deserialize, Serialize};

use crate::types::PreviewRow;

/// Preview of one worksheet.
///
/// The wire names follow the backend payload (`nombre`, `mensaje`,
/// `datos`). A sheet without `datos` is treated as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetPreview {
    #[serde(rename = "nombre")]
    pub name: String,
    /// Backend validation note for the sheet, if any.
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "datos", default)]
    pub rows: Vec<PreviewRow>,
}

impl SheetPreview {
    pub fn new(name: impl Into<String>, rows: Vec<PreviewRow>) -> Self {
        Self {
            name: name.into(),
            message: None,
            rows,
        }
    }

    /// A sheet with zero parsed rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-row order.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Names of every empty sheet, in preview order.
pub fn empty_sheet_names(sheets: &[SheetPreview]) -> Vec<String> {
    sheets
        .iter()
        .filter(|sheet| sheet.is_empty())
        .map(|sheet| sheet.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheets() -> Vec<SheetPreview> {
        serde_json::from_value(json!([
            {"nombre": "Sheet1", "datos": []},
            {"nombre": "Sheet2", "mensaje": "Hoja válida", "datos": [{"a": 1}]},
            {"nombre": "Sheet3"}
        ]))
        .unwrap()
    }

    #[test]
    fn parses_wire_names() {
        let sheets = sheets();
        assert_eq!(sheets[1].name, "Sheet2");
        assert_eq!(sheets[1].message.as_deref(), Some("Hoja válida"));
        assert_eq!(sheets[1].rows[0]["a"], 1);
    }

    #[test]
    fn missing_rows_means_empty() {
        assert!(sheets()[2].is_empty());
    }

    #[test]
    fn collects_empty_sheet_names_in_order() {
        assert_eq!(empty_sheet_names(&sheets()), vec!["Sheet1", "Sheet3"]);
    }

    #[test]
    fn columns_follow_first_row() {
        let sheet: SheetPreview = serde_json::from_value(json!({
            "nombre": "S",
            "datos": [{"producto": "A", "cantidad": 2}]
        }))
        .unwrap();
        assert_eq!(sheet.columns().len(), 2);
        assert!(SheetPreview::new("E", Vec::new()).columns().is_empty());
    }
}
