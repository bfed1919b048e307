//! Printable receipt for a sent message

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Employee, Message};
use crate::error::DomainError;

pub const RECEIPT_STATUS_LINE: &str = "Message officially sent";
pub const RECEIPT_TITLE: &str = "MESSAGE SUBMISSION RECEIPT";

/// Text columns that fit an A4 page at the default monospace size.
const LINE_WIDTH: usize = 72;
const LABEL_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize {
    pub name: &'static str,
    pub width_mm: u32,
    pub height_mm: u32,
}

pub const A4: PageSize = PageSize {
    name: "A4",
    width_mm: 210,
    height_mm: 297,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub employee_name: String,
    pub origin_department: String,
    pub destination_department: String,
    pub message_type: String,
    pub generated_at: DateTime<Utc>,
    pub protocol: String,
    pub content_hash: String,
    pub status_line: String,
    pub page_size: PageSize,
}

pub fn build_receipt(
    employee: &Employee,
    message: &Message,
    department: &str,
    protocol: &str,
    hash: &str,
    generated_at: DateTime<Utc>,
) -> Receipt {
    Receipt {
        employee_name: employee.full_name.clone(),
        origin_department: employee.department.clone(),
        destination_department: department.to_string(),
        message_type: message.message_type.as_str().to_string(),
        generated_at,
        protocol: protocol.to_string(),
        content_hash: hash.to_string(),
        status_line: RECEIPT_STATUS_LINE.to_string(),
        page_size: A4,
    }
}

impl Receipt {
    /// Receipt body as fixed-width lines, none wider than the page allows.
    /// Long values wrap under their label.
    pub fn lines(&self) -> Vec<String> {
        let rule = "=".repeat(LINE_WIDTH);
        let value_width = LINE_WIDTH - LABEL_WIDTH;
        let generated_at = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

        let mut lines = vec![
            rule.clone(),
            format!("{:^width$}", RECEIPT_TITLE, width = LINE_WIDTH),
            rule,
        ];
        for (label, value) in [
            ("Employee:", self.employee_name.as_str()),
            ("Origin department:", self.origin_department.as_str()),
            ("Destination department:", self.destination_department.as_str()),
            ("Type:", self.message_type.as_str()),
            ("Generated at:", generated_at.as_str()),
            ("Protocol:", self.protocol.as_str()),
        ] {
            for (i, chunk) in wrap(value, value_width).into_iter().enumerate() {
                let label = if i == 0 { label } else { "" };
                lines.push(format!("{:<width$}{}", label, chunk, width = LABEL_WIDTH));
            }
        }
        lines.push("Content hash (SHA-256):".to_string());
        lines.extend(wrap(&self.content_hash, LINE_WIDTH - 2).into_iter().map(|c| format!("  {}", c)));
        lines.push("-".repeat(LINE_WIDTH));
        lines.extend(wrap(&format!("Status: {}", self.status_line), LINE_WIDTH));
        lines
    }

    pub fn render_text(&self) -> String {
        let mut out = self.lines().join("\n");
        out.push('\n');
        out
    }

    /// Download name derived from the protocol, e.g. `receipt-20240307-0001`.
    pub fn file_stem(&self) -> String {
        format!("receipt-{}", self.protocol.trim_start_matches('#'))
    }
}

/// Greedy word wrap. Words wider than `width` are split hard.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A receipt laid out as a downloadable document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub page_size: PageSize,
    pub bytes: Vec<u8>,
}

pub trait ReceiptRenderer: Send + Sync {
    fn render(&self, receipt: &Receipt) -> Result<RenderedDocument, DomainError>;
}

/// Plain-text A4 rendering, kept for `receipt_format = "text"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReceiptRenderer;

impl ReceiptRenderer for TextReceiptRenderer {
    fn render(&self, receipt: &Receipt) -> Result<RenderedDocument, DomainError> {
        Ok(RenderedDocument {
            filename: format!("{}.txt", receipt.file_stem()),
            content_type: "text/plain; charset=utf-8",
            page_size: receipt.page_size,
            bytes: receipt.render_text().into_bytes(),
        })
    }
}
