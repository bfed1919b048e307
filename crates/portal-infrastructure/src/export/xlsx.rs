// ============================================================================
// Portal Infrastructure - XLSX Exporter
// File: crates/portal-infrastructure/src/export/xlsx.rs
// ============================================================================
//! Single-sheet Office Open XML workbook. Every cell is written as an inline
//! string, header row first.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use portal_core::error::DomainError;
use portal_core::services::export::{Sheet, SpreadsheetExporter};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Sheet names are capped at 31 characters and may not contain `[]:*?/\`.
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        Self
    }

    fn workbook_xml(sheet_name: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            escape(&sanitize_sheet_name(sheet_name))
        )
    }

    fn worksheet_xml(sheet: &Sheet) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        write_row(&mut xml, 1, &sheet.columns);
        for (i, row) in sheet.rows.iter().enumerate() {
            write_row(&mut xml, i + 2, row);
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

fn write_row(xml: &mut String, number: usize, cells: &[String]) {
    xml.push_str(&format!(r#"<row r="{}">"#, number));
    for (col, value) in cells.iter().enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(col),
            number,
            escape(&strip_control_chars(value))
        ));
    }
    xml.push_str("</row>");
}

/// Zero-based column index to spreadsheet letters: 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

// XML 1.0 forbids most C0 control characters.
fn strip_control_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn zip_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::ExportError(e.to_string())
}

impl SpreadsheetExporter for XlsxExporter {
    fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    fn export(&self, sheet: &Sheet) -> Result<Vec<u8>, DomainError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", ROOT_RELS_XML.to_string()),
            ("xl/workbook.xml", Self::workbook_xml(&sheet.name)),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
            ("xl/worksheets/sheet1.xml", Self::worksheet_xml(sheet)),
        ];
        for (name, body) in parts {
            writer.start_file(name, options).map_err(zip_error)?;
            writer.write_all(body.as_bytes()).map_err(zip_error)?;
        }

        let bytes = writer.finish().map_err(zip_error)?.into_inner();
        debug!(
            "Wrote workbook '{}' with {} data rows ({} bytes)",
            sheet.name,
            sheet.rows.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
