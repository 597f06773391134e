//! Minimal PDF 1.4 writer backing the report document sink.
//!
//! Pages are A4 portrait, text uses the standard Helvetica faces with
//! WinAnsi encoding, and content streams are left uncompressed.

use std::fmt::Write as _;

use crate::application::report_render::{DocumentSink, DocumentWriter, LineStyle};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FOOTER_Y: f32 = 30.0;
const TABLE_FONT_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 16.0;
/// Left edge of each table column, relative to the page.
const COLUMN_X: [f32; 4] = [MARGIN, 140.0, 330.0, 455.0];
/// Rough Helvetica advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.52;

#[derive(Debug, Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

/// Produces PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfSink;

impl DocumentSink for PdfSink {
    fn new_document(&self) -> Box<dyn DocumentWriter> {
        Box::new(PdfWriter::new())
    }
}

struct PdfWriter {
    pages: Vec<String>,
    cursor_y: f32,
    table_header: Option<Vec<String>>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            pages: vec![String::new()],
            cursor_y: PAGE_HEIGHT - MARGIN,
            table_header: None,
        }
    }

    fn content(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Break to a fresh page when `height` does not fit above the bottom margin.
    fn reserve(&mut self, height: f32) -> bool {
        if self.cursor_y - height >= MARGIN {
            return false;
        }
        self.pages.push(String::new());
        self.cursor_y = PAGE_HEIGHT - MARGIN;
        true
    }

    fn text(&mut self, x: f32, y: f32, face: Face, size: f32, text: &str) {
        let escaped = escape_text(text);
        let _ = writeln!(
            self.content(),
            "BT /{} {size:.1} Tf {x:.2} {y:.2} Td ({escaped}) Tj ET",
            face.resource()
        );
    }

    fn rule(&mut self, y: f32) {
        let _ = writeln!(
            self.content(),
            "0.5 w {MARGIN:.2} {y:.2} m {:.2} {y:.2} l S",
            PAGE_WIDTH - MARGIN
        );
    }

    fn draw_cells(&mut self, cells: &[String], face: Face) {
        self.cursor_y -= ROW_HEIGHT;
        let y = self.cursor_y;
        for (index, cell) in cells.iter().take(COLUMN_X.len()).enumerate() {
            let x = COLUMN_X[index];
            let right = COLUMN_X
                .get(index + 1)
                .copied()
                .unwrap_or(PAGE_WIDTH - MARGIN);
            let fitted = fit_to_width(cell, right - x - 6.0, TABLE_FONT_SIZE);
            self.text(x, y, face, TABLE_FONT_SIZE, &fitted);
        }
    }

    fn draw_table_header(&mut self) {
        if let Some(header) = self.table_header.clone() {
            self.draw_cells(&header, Face::Bold);
            let underline = self.cursor_y - 4.0;
            self.rule(underline);
            self.cursor_y -= 4.0;
        }
    }

    fn render(self) -> Vec<u8> {
        let page_count = self.pages.len();
        let first_page_object = 5;
        let mut objects: Vec<String> = Vec::with_capacity(4 + page_count * 2);

        let kids = (0..page_count)
            .map(|index| format!("{} 0 R", first_page_object + index * 2))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        objects.push(format!(
            "<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"
        ));
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        for (index, mut content) in self.pages.into_iter().enumerate() {
            let footer = format!("Page {} of {page_count}", index + 1);
            let _ = writeln!(
                content,
                "BT /F1 8.0 Tf {:.2} {FOOTER_Y:.2} Td ({}) Tj ET",
                PAGE_WIDTH - MARGIN - 50.0,
                escape_text(&footer)
            );

            let content_object = first_page_object + index * 2 + 1;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_object} 0 R >>"
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}endstream",
                content.len()
            ));
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", index + 1);
        }

        let xref_offset = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = write!(out, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        );

        out.into_bytes()
    }
}

impl DocumentWriter for PdfWriter {
    fn write_line(&mut self, text: &str, style: LineStyle) {
        let (face, size, leading) = match style {
            LineStyle::Title => (Face::Bold, 18.0, 28.0),
            LineStyle::Subtitle => (Face::Regular, 13.0, 20.0),
            LineStyle::Body => (Face::Regular, 11.0, 17.0),
        };
        if self.reserve(leading) {
            self.draw_table_header();
        }
        self.cursor_y -= leading;
        let y = self.cursor_y;
        self.text(MARGIN, y, face, size, text);
    }

    fn start_table(&mut self, columns: &[&str]) {
        self.table_header = Some(columns.iter().map(|column| column.to_string()).collect());
        self.cursor_y -= ROW_HEIGHT / 2.0;
        // Header plus at least one row on the same page.
        self.reserve(ROW_HEIGHT * 2.0 + 4.0);
        self.draw_table_header();
    }

    fn write_row(&mut self, cells: &[String]) {
        if self.reserve(ROW_HEIGHT) {
            self.draw_table_header();
        }
        self.draw_cells(cells, Face::Regular);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        (*self).render()
    }
}

/// Escape a string for a PDF literal, mapping Latin-1 to WinAnsi octal escapes.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(escaped, "\\{:03o}", ch as u32);
            }
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn fit_to_width(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * AVERAGE_GLYPH_WIDTH)).floor().max(4.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(max_chars - 3).collect();
    fitted.push_str("...");
    fitted
}
