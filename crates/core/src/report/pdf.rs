//! Text-only PDF 1.4 writer for [`Document`]s: US Letter pages, the two
//! standard Helvetica faces, greedy word wrap and automatic page breaks.

use crate::report::{Block, Document};
use std::fmt::Write as _;

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 72.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f64 = 0.5;
const KEY_COLUMN_WIDTH: f64 = 144.0;
const TABLE_COLUMN_WIDTH: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
struct TextOp {
    x: f64,
    y: f64,
    font: Font,
    size: f64,
    red: bool,
    text: String,
}

struct Layout {
    pages: Vec<Vec<TextOp>>,
    y: f64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure(&mut self, height: f64) {
        if self.y - height < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn skip(&mut self, height: f64) {
        self.y -= height;
    }

    fn line(&mut self, x: f64, font: Font, size: f64, red: bool, text: String) {
        let leading = size * 1.4;
        self.ensure(leading);
        self.y -= leading;
        self.put(x, self.y, font, size, red, text);
    }

    fn put(&mut self, x: f64, y: f64, font: Font, size: f64, red: bool, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.push(TextOp {
                x,
                y,
                font,
                size,
                red,
                text,
            });
        }
    }

    fn wrapped(&mut self, x: f64, width: f64, font: Font, size: f64, red: bool, text: &str) {
        for line in wrap(text, width, size) {
            self.line(x, font, size, red, line);
        }
    }
}

pub fn render(doc: &Document) -> Vec<u8> {
    let mut layout = Layout::new();

    for block in &doc.blocks {
        match block {
            Block::Title(t) => layout.wrapped(MARGIN, CONTENT_WIDTH, Font::Bold, 18.0, false, t),
            Block::Heading(h) => {
                layout.skip(6.0);
                layout.wrapped(MARGIN, CONTENT_WIDTH, Font::Bold, 14.0, false, h);
            }
            Block::Paragraph(p) => layout.wrapped(MARGIN, CONTENT_WIDTH, Font::Regular, 10.0, false, p),
            Block::Bullet(b) => {
                let lines = wrap(b, CONTENT_WIDTH - 12.0, 10.0);
                for (i, line) in lines.into_iter().enumerate() {
                    let text = if i == 0 { format!("- {line}") } else { line };
                    layout.line(MARGIN + 12.0, Font::Regular, 10.0, false, text);
                }
            }
            Block::KeyValues(rows) => {
                for (key, value) in rows {
                    let values = wrap(value, CONTENT_WIDTH - KEY_COLUMN_WIDTH, 10.0);
                    for (i, v) in values.into_iter().enumerate() {
                        layout.line(MARGIN + KEY_COLUMN_WIDTH, Font::Regular, 10.0, false, v);
                        if i == 0 {
                            let y = layout.y;
                            layout.put(MARGIN, y, Font::Bold, 10.0, false, format!("{key}:"));
                        }
                    }
                }
            }
            Block::Table { header, rows } => {
                table_row(&mut layout, header, Font::Bold);
                for row in rows {
                    table_row(&mut layout, row, Font::Regular);
                }
            }
            Block::Spacer => layout.skip(14.0),
            Block::Disclaimer(d) => {
                layout.skip(6.0);
                layout.line(MARGIN, Font::Bold, 12.0, false, "IMPORTANT DISCLAIMER:".to_string());
                layout.wrapped(MARGIN, CONTENT_WIDTH, Font::Regular, 8.0, true, d);
            }
        }
    }

    serialize(&layout.pages)
}

fn table_row(layout: &mut Layout, cells: &[String], font: Font) {
    let max_chars = max_chars(TABLE_COLUMN_WIDTH - 8.0, 10.0);
    for (i, cell) in cells.iter().enumerate() {
        let text: String = cell.chars().take(max_chars).collect();
        let x = MARGIN + i as f64 * TABLE_COLUMN_WIDTH;
        if i == 0 {
            layout.line(x, font, 10.0, false, text);
        } else {
            let y = layout.y;
            layout.put(x, y, font, 10.0, false, text);
        }
    }
}

fn max_chars(width: f64, size: f64) -> usize {
    ((width / (size * AVG_GLYPH_EM)).floor() as usize).max(1)
}

/// Greedy word wrap by estimated glyph width; over-long words are split.
fn wrap(text: &str, width: f64, size: f64) -> Vec<String> {
    let limit = max_chars(width, size);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > limit {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..limit).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > limit && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(ops: &[TextOp]) -> String {
    let mut s = String::new();
    for op in ops {
        let color = if op.red { "1 0 0 rg" } else { "0 g" };
        let _ = writeln!(
            s,
            "BT {color} /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
            op.font.resource(),
            op.size,
            op.x,
            op.y,
            escape_pdf_text(&op.text)
        );
    }
    s
}

fn serialize(pages: &[Vec<TextOp>]) -> Vec<u8> {
    // 1 catalog, 2 page tree, 3-4 fonts, then (page, content) pairs.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>".to_string(),
    ];

    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}endstream",
            stream.len()
        ));
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn single_page_document_is_well_formed() {
        let doc = Document {
            blocks: vec![
                Block::Title("Stock Analysis Report: AAPL".to_string()),
                Block::Paragraph("Current Price: $190.00 (live)".to_string()),
            ],
        };
        let pdf = as_text(&render(&doc));

        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("(Stock Analysis Report: AAPL) Tj"));
        assert!(pdf.contains("(Current Price: $190.00 \\(live\\)) Tj"));

        // startxref must point at the xref keyword.
        let tail = pdf.rsplit("startxref\n").next().unwrap();
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(pdf[offset..].starts_with("xref\n"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let doc = Document {
            blocks: vec![Block::Paragraph("hello".to_string())],
        };
        let pdf = as_text(&render(&doc));
        let xref_start = pdf.find("xref\n").unwrap();
        let entries: Vec<usize> = pdf[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn long_documents_break_across_pages() {
        let blocks = (0..120)
            .map(|i| Block::Paragraph(format!("Line number {i}")))
            .collect();
        let pdf = as_text(&render(&Document { blocks }));
        assert!(pdf.contains("/Count 3"));
        assert_eq!(pdf.matches("/Type /Page ").count(), 3);
    }

    #[test]
    fn wrap_respects_estimated_width() {
        let text = "The 20-Day SMA is currently above the 50-Day SMA, suggesting a positive short-term trend.";
        let lines = wrap(text, 100.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), text);

        let long_word = wrap(&"x".repeat(45), 100.0, 10.0);
        assert_eq!(long_word.len(), 3);
        assert_eq!(long_word[2].len(), 5);
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(escape_pdf_text("a\u{2019}b – c ü"), "a'b - c ?");
    }
}
