/// CSV export of a finished ranking.
///
/// Columns: rank, id, label. Tied items share a rank number.
use anyhow::{Context, Result};
use mergerank_core::RankingResult;
use std::path::Path;

/// Quote a field when it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn to_csv(result: &RankingResult) -> String {
    let mut out = String::from("rank,id,label\n");
    for entry in result.ranked_entries() {
        out.push_str(&format!("{},{},{}\n", entry.rank, entry.item.id, csv_field(&entry.item.label)));
    }
    out
}

pub fn write_csv(path: &Path, result: &RankingResult) -> Result<()> {
    std::fs::write(path, to_csv(result))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}
