//! Plain-text rendering of catalog, preview, notices and the chart.

use std::io::{self, Write};

use sheetflow_core::chart::BarChart;
use sheetflow_core::files::CatalogEntry;
use sheetflow_core::notice::{Notice, NoticeLevel};
use sheetflow_core::preview::SheetPreview;
use sheetflow_workflow::{ChartRenderer, RenderError};

/// Widest bar drawn, in characters.
const BAR_WIDTH: usize = 40;

/// Preview rows shown per sheet.
const PREVIEW_ROWS: usize = 5;

pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

pub fn print_catalog<W: Write>(out: &mut W, entries: &[CatalogEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No files uploaded.");
    }

    writeln!(
        out,
        "{:>6}  {:<32} {:>10}  {:<6} {:<20} STATUS",
        "ID", "FILENAME", "SIZE", "TYPE", "UPLOADED"
    )?;
    for entry in entries {
        let record = &entry.record;
        let size = record
            .filesize
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        let kind = record.filetype.as_deref().unwrap_or("-");
        let uploaded = record
            .upload_date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".into());
        writeln!(
            out,
            "{:>6}  {:<32} {:>10}  {:<6} {:<20} {}",
            record.id, record.filename, size, kind, uploaded, entry.status
        )?;
    }
    Ok(())
}

pub fn print_preview<W: Write>(out: &mut W, sheets: &[SheetPreview]) -> io::Result<()> {
    for sheet in sheets {
        writeln!(out, "== {} ({} rows)", sheet.name, sheet.rows.len())?;
        if let Some(message) = &sheet.message {
            writeln!(out, "   {message}")?;
        }
        if sheet.is_empty() {
            writeln!(out, "   (empty)")?;
            continue;
        }

        let columns = sheet.columns();
        writeln!(out, "   {}", columns.join(" | "))?;
        for row in sheet.rows.iter().take(PREVIEW_ROWS) {
            let cells: Vec<String> = columns
                .iter()
                .map(|col| row.get(*col).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            writeln!(out, "   {}", cells.join(" | "))?;
        }
        if sheet.rows.len() > PREVIEW_ROWS {
            writeln!(out, "   ... {} more", sheet.rows.len() - PREVIEW_ROWS)?;
        }
    }
    Ok(())
}

/// Bar length for `value` on a scale where `max` fills [`BAR_WIDTH`].
///
/// Negative values draw nothing. Computed in `u128` so values near
/// `i64::MAX` cannot overflow.
fn bar_len(value: i64, max: i64) -> usize {
    let value = value.max(0) as u128;
    let max = max.max(1) as u128;
    (value * BAR_WIDTH as u128 / max).min(BAR_WIDTH as u128) as usize
}

/// Horizontal bar chart drawn with `#` characters.
pub struct TextBarChart<W> {
    out: W,
}

impl<W: Write + Send> TextBarChart<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChartRenderer for TextBarChart<W> {
    fn render(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        let max = chart.max_value().max(1);
        let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        writeln!(self.out, "{} ({})", chart.title, chart.dataset_label)?;
        for (label, value) in chart.labels.iter().zip(&chart.values) {
            let bar = "#".repeat(bar_len(*value, max));
            writeln!(self.out, "{label:<label_width$} | {bar} {value}")?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        writeln!(self.out, "No chart data.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetflow_core::chart::{normalize, ChartPoint, ChartSeries};
    use sheetflow_core::files::{FileRecord, FileStatus};
    use sheetflow_workflow::render::apply_series;

    fn render(points: Vec<ChartPoint>) -> String {
        let mut chart = TextBarChart::new(Vec::new());
        apply_series(&mut chart, &ChartSeries::new(points));
        String::from_utf8(chart.into_inner()).unwrap()
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let text = render(vec![ChartPoint::new("Pan", 10), ChartPoint::new("Leche", 5)]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Pan   | "));
        assert_eq!(lines[1].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH / 2);
        assert!(lines[2].ends_with(" 5"));
    }

    #[test]
    fn huge_values_scale_without_overflow() {
        let text = render(vec![
            ChartPoint::new("A", i64::MAX),
            ChartPoint::new("B", i64::MAX / 2),
        ]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH / 2 - 1);
    }

    #[test]
    fn saturated_backend_value_draws_full_bar() {
        let series = normalize(&[json!({"producto": "A", "total": "1e18"})]);
        let mut chart = TextBarChart::new(Vec::new());

        assert!(apply_series(&mut chart, &series));
        let text = String::from_utf8(chart.into_inner()).unwrap();
        assert_eq!(text.lines().nth(1).unwrap().matches('#').count(), BAR_WIDTH);
    }

    #[test]
    fn negative_values_draw_no_bar() {
        assert_eq!(bar_len(-5, 10), 0);
        assert_eq!(bar_len(10, 10), BAR_WIDTH);
    }

    #[test]
    fn all_zero_series_prints_no_data() {
        let text = render(vec![ChartPoint::new("Pan", 0)]);
        assert_eq!(text, "No chart data.\n");
    }

    #[test]
    fn catalog_shows_missing_metadata_as_dash() {
        let entries = vec![CatalogEntry {
            record: FileRecord::new(3, "ventas.xlsx"),
            status: FileStatus::Inserted,
        }];
        let mut out = Vec::new();
        print_catalog(&mut out, &entries).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("ventas.xlsx"));
        assert!(text.contains(" - "));
        assert!(text.trim_end().ends_with(&FileStatus::Inserted.to_string()));
    }

    #[test]
    fn empty_sheet_is_marked() {
        let mut out = Vec::new();
        print_preview(&mut out, &[SheetPreview::new("Hoja1", Vec::new())]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("== Hoja1 (0 rows)"));
        assert!(text.contains("(empty)"));
    }

    #[test]
    fn notices_carry_level_tag() {
        assert_eq!(format_notice(&Notice::error("boom")), "[error] boom");
        assert_eq!(format_notice(&Notice::success("done")), "[ok] done");
    }
}
