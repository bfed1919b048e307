// ============================================================================
// Portal Infrastructure - PDF Receipt Renderer
// File: crates/portal-infrastructure/src/export/pdf.rs
// ============================================================================
//! A4 receipt written with lopdf. Uses the built-in Courier face so the
//! fixed-width receipt lines keep their columns; no font is embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use portal_core::error::DomainError;
use portal_core::services::{ReceiptRenderer, RenderedDocument, Receipt};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A4 in PostScript points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
/// Courier advances 0.6 em, so 72 columns at 10pt take 432pt of the 483pt
/// between the margins.
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReceiptRenderer;

impl PdfReceiptRenderer {
    pub fn new() -> Self {
        Self
    }

    fn page_content(lines: &[String], page: usize, pages: usize) -> Result<Vec<u8>, DomainError> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LEADING.into()]),
            Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(latin1(line))]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        if pages > 1 {
            let footer = format!("Page {} of {}", page, pages);
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 8i64.into()]),
                Operation::new("Td", vec![MARGIN.into(), (MARGIN / 2).into()]),
                Operation::new("Tj", vec![Object::string_literal(latin1(&footer))]),
                Operation::new("ET", vec![]),
            ]);
        }

        Content { operations }
            .encode()
            .map_err(|e| DomainError::ExportError(format!("failed to encode page content: {}", e)))
    }

    fn build(&self, receipt: &Receipt) -> Result<Document, DomainError> {
        let lines = receipt.lines();
        let chunks: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();

        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let content = Self::page_content(chunk, index + 1, chunks.len())?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0i64.into(), 0i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(latin1(&receipt.file_stem())),
            "Producer" => Object::string_literal("portal-server"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

impl ReceiptRenderer for PdfReceiptRenderer {
    fn render(&self, receipt: &Receipt) -> Result<RenderedDocument, DomainError> {
        let mut doc = self.build(receipt)?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| DomainError::ExportError(format!("failed to write PDF: {}", e)))?;

        debug!("Rendered receipt {} ({} bytes)", receipt.protocol, bytes.len());
        Ok(RenderedDocument {
            filename: format!("{}.pdf", receipt.file_stem()),
            content_type: PDF_CONTENT_TYPE,
            page_size: receipt.page_size,
            bytes,
        })
    }
}

/// Standard Type1 fonts only cover a single-byte encoding; anything past
/// Latin-1 prints as `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
