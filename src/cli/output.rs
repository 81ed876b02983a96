// src/cli/output.rs — Result output (console / CSV)

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::collection::KeywordCollection;
use crate::core::types::{KeywordInfo, Money, TrafficMetrics};

pub const CSV_HEADERS: [&str; 21] = [
    "Keyword",
    "Match Type",
    "Score",
    "Impressions (min)",
    "Impressions (mean)",
    "Impressions (max)",
    "Clicks (min)",
    "Clicks (mean)",
    "Clicks (max)",
    "Ctr (min)",
    "Ctr (mean)",
    "Ctr (max)",
    "Avg. Position (min)",
    "Avg. Position (mean)",
    "Avg. Position (max)",
    "Avg. Cpc (min)",
    "Avg. Cpc (mean)",
    "Avg. Cpc (max)",
    "Cost (min)",
    "Cost (mean)",
    "Cost (max)",
];

/// Headline plus one line per keyword, best first.
pub fn write_console(out: &mut impl Write, keywords: &KeywordCollection) -> io::Result<()> {
    writeln!(out, "Results ({} keywords)", keywords.len())?;
    writeln!(out, "--------------------")?;
    for info in keywords.list_sorted_by_score() {
        writeln!(out, "{}", info)?;
    }
    Ok(())
}

pub fn write_csv(out: &mut impl Write, keywords: &KeywordCollection) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADERS)?;
    for info in keywords.list_sorted_by_score() {
        writer.write_record(csv_row(info))?;
    }
    writer.flush()
}

pub fn write_csv_file(path: &Path, keywords: &KeywordCollection) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv(&mut out, keywords)?;
    out.flush()
}

fn csv_row(info: &KeywordInfo) -> Vec<String> {
    let mut row = vec![
        info.keyword.text.clone(),
        info.keyword.match_type.to_string(),
        number(info.score),
    ];

    let empty = TrafficMetrics::default();
    let (min, mean, max) = match info.estimate {
        Some(ref e) => (&e.min, &e.mean, &e.max),
        None => (&empty, &empty, &empty),
    };
    let triple = [min, mean, max];

    row.extend(triple.iter().map(|m| number(m.impressions_per_day)));
    row.extend(triple.iter().map(|m| number(m.clicks_per_day)));
    row.extend(triple.iter().map(|m| number(m.click_through_rate)));
    row.extend(triple.iter().map(|m| number(m.average_position)));
    row.extend(triple.iter().map(|m| money(m.average_cpc)));
    row.extend(triple.iter().map(|m| money(m.total_cost)));
    row
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn money(value: Option<Money>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
