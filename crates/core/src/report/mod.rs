//! Stock report: a renderer-neutral block document plus text and PDF output.

pub mod pdf;
pub mod text;

use crate::analysis::error::SignalError;
use crate::export::file_stem;
use crate::provider::types::{AnnualRevenue, CompanyProfile};
use crate::service::Analysis;
use crate::DISCLAIMER;
use chrono::{DateTime, Datelike, Local};

pub const REPORT_SALES_YEARS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    Bullet(String),
    KeyValues(Vec<(String, String)>),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Spacer,
    Disclaimer(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Paragraph(text.into()));
    }
}

pub struct ReportInput<'a> {
    pub symbol: &'a str,
    pub generated_at: DateTime<Local>,
    pub profile: Option<&'a CompanyProfile>,
    /// `None` when price history could not be fetched at all.
    pub analysis: Option<&'a Analysis>,
    pub revenue: &'a [AnnualRevenue],
}

pub fn text_file_name(symbol: &str) -> String {
    format!("{}_Stock_Report.txt", file_stem(symbol))
}

pub fn pdf_file_name(symbol: &str) -> String {
    format!("{}_Stock_Report.pdf", file_stem(symbol))
}

pub fn build_stock_report(input: &ReportInput<'_>) -> Document {
    let mut doc = Document::default();
    let symbol = input.symbol;

    doc.push(Block::Title(format!("Stock Analysis Report: {symbol}")));
    doc.paragraph(format!(
        "Date Generated: {}",
        input.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push(Block::Spacer);

    doc.push(Block::Heading("1. Company Details".to_string()));
    match input.profile {
        Some(profile) => doc.push(Block::KeyValues(profile_rows(profile))),
        None => doc.paragraph(format!("Could not retrieve company details for {symbol}.")),
    }
    doc.push(Block::Spacer);

    doc.push(Block::Heading("2. Price and Technical Analysis".to_string()));
    match input.analysis {
        Some(analysis) => technical_section(&mut doc, analysis),
        None => doc.paragraph(format!("Could not retrieve price history for {symbol}.")),
    }
    doc.push(Block::Spacer);

    doc.push(Block::Heading(format!(
        "3. Financials Summary (Last {REPORT_SALES_YEARS} Years Sales)"
    )));
    if input.revenue.is_empty() {
        doc.paragraph("No sales data available for summary.");
    } else {
        let start = input.revenue.len().saturating_sub(REPORT_SALES_YEARS);
        let rows = input.revenue[start..]
            .iter()
            .map(|r| vec![r.period_end.year().to_string(), money(r.revenue, 0)])
            .collect();
        doc.push(Block::Table {
            header: vec!["Year".to_string(), "Sales".to_string()],
            rows,
        });
    }
    doc.push(Block::Spacer);

    doc.push(Block::Disclaimer(DISCLAIMER.to_string()));
    doc
}

fn technical_section(doc: &mut Document, analysis: &Analysis) {
    match analysis.current_price() {
        Some(price) => doc.paragraph(format!("Current Price: {}", money(price, 2))),
        None => doc.paragraph("Current price could not be retrieved."),
    }

    let (short, long) = analysis.averages.latest();
    if let (Some(short), Some(long)) = (short, long) {
        doc.paragraph(format!(
            "{}-Day SMA: {}",
            analysis.averages.short_window,
            money(short, 2)
        ));
        doc.paragraph(format!(
            "{}-Day SMA: {}",
            analysis.averages.long_window,
            money(long, 2)
        ));
    }

    match &analysis.outcome {
        Ok(rec) => {
            doc.paragraph(format!("Recommendation: {}", rec.signal));
            doc.paragraph("Reasoning:");
            for reason in &rec.reasons {
                doc.push(Block::Bullet(reason.clone()));
            }
        }
        Err(SignalError::DataInsufficient { available, required }) => doc.paragraph(format!(
            "Not enough historical data for a recommendation ({available} trading days, {required} needed)."
        )),
        Err(err) => doc.paragraph(format!("Could not provide a recommendation: {err}")),
    }
}

pub fn profile_rows(profile: &CompanyProfile) -> Vec<(String, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    vec![
        ("Company Name".to_string(), text(&profile.name)),
        ("Exchange".to_string(), text(&profile.exchange)),
        ("Industry".to_string(), text(&profile.industry)),
        ("Sector".to_string(), text(&profile.sector)),
        ("Country".to_string(), text(&profile.country)),
        ("IPO Date".to_string(), text(&profile.ipo)),
        (
            "Market Capitalization".to_string(),
            profile
                .market_cap_millions
                .map(|v| format!("{} M", money(v, 2)))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Shares Outstanding".to_string(),
            profile
                .shares_outstanding_millions
                .map(|v| format!("{} M", thousands(v, 2)))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Website".to_string(), text(&profile.website)),
        ("Phone".to_string(), text(&profile.phone)),
        ("Currency".to_string(), text(&profile.currency)),
        (
            "Employee Total".to_string(),
            profile
                .employee_total
                .map(|v| thousands(v, 0))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ]
}

/// `1234567.891, 2` -> `1,234,567.89`.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn money(value: f64, decimals: usize) -> String {
    let s = thousands(value, decimals);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${s}"),
    }
}
