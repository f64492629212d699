//! Minimal single-sheet `.xlsx` writer for the annual sales export.

use crate::provider::types::AnnualRevenue;
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

/// The last `years` fiscal periods, oldest first. The flag is `true` when
/// fewer periods are available than requested.
pub fn recent_revenue(rows: &[AnnualRevenue], years: usize) -> (Vec<AnnualRevenue>, bool) {
    let start = rows.len().saturating_sub(years);
    (rows[start..].to_vec(), rows.len() < years)
}

pub fn sales_file_name(symbol: &str, years: usize) -> String {
    format!(
        "{}_Annual_Sales_Data_Last_{years}_Years.xlsx",
        super::file_stem(symbol)
    )
}

pub fn sales_workbook(rows: &[AnnualRevenue]) -> Result<Vec<u8>> {
    let mut table = vec![vec![
        Cell::Text("Period End".to_string()),
        Cell::Text("Sales".to_string()),
    ]];
    for row in rows {
        table.push(vec![
            Cell::Text(row.period_end.format("%Y-%m-%d").to_string()),
            Cell::Number(row.revenue),
        ]);
    }
    workbook("Sales", &table)
}

pub fn workbook(sheet_name: &str, rows: &[Vec<Cell>]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let workbook_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(sheet_name)
    );

    let parts: [(&str, &str); 4] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", &workbook_xml),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("failed to start xlsx part {name}"))?;
        zip.write_all(body.as_bytes())
            .with_context(|| format!("failed to write xlsx part {name}"))?;
    }

    zip.start_file("xl/worksheets/sheet1.xml", options)
        .context("failed to start worksheet part")?;
    zip.write_all(sheet_xml(rows).as_bytes())
        .context("failed to write worksheet part")?;

    let cursor = zip.finish().context("failed to finalize xlsx archive")?;
    Ok(cursor.into_inner())
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    for (r, row) in rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{row_num}">"#));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_num}", column_name(c));
            match cell {
                Cell::Text(s) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape_xml(s)
                )),
                Cell::Number(n) if n.is_finite() => {
                    xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#))
                }
                Cell::Number(_) => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
