//! Spreadsheet and receipt writers

mod pdf;
mod xlsx;

pub use pdf::{PdfReceiptRenderer, PDF_CONTENT_TYPE};
pub use xlsx::XlsxExporter;
