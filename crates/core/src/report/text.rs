use crate::report::{Block, Document};

pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    for block in &doc.blocks {
        match block {
            Block::Title(t) => {
                out.push_str(t);
                out.push('\n');
                out.push_str(&"=".repeat(t.chars().count()));
                out.push_str("\n\n");
            }
            Block::Heading(h) => {
                out.push_str(h);
                out.push('\n');
                out.push_str(&"-".repeat(h.chars().count()));
                out.push('\n');
            }
            Block::Paragraph(p) => {
                out.push_str(p);
                out.push('\n');
            }
            Block::Bullet(b) => {
                out.push_str("- ");
                out.push_str(b);
                out.push('\n');
            }
            Block::KeyValues(rows) => {
                let width = rows
                    .iter()
                    .map(|(k, _)| k.chars().count() + 1)
                    .max()
                    .unwrap_or(0);
                for (k, v) in rows {
                    out.push_str(&format!("{:<width$} {v}\n", format!("{k}:")));
                }
            }
            Block::Table { header, rows } => render_table(&mut out, header, rows),
            Block::Spacer => out.push('\n'),
            Block::Disclaimer(d) => {
                out.push_str("IMPORTANT DISCLAIMER:\n");
                out.push_str(d);
                out.push('\n');
            }
        }
    }

    out
}

fn render_table(out: &mut String, header: &[String], rows: &[Vec<String>]) {
    let columns = header.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = (0..columns)
            .map(|i| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:>width$}", cell, width = widths[i])
            })
            .collect();
        padded.join("  ")
    };

    out.push_str(&line(header));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
}
