/// Output formatting: terminal table and JSON.
use mergerank_core::{RankingResult, RankingSession};
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: i64,
    label: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedItem<'a>>,
    groups: usize,
    total_comparisons: usize,
}

/// Print results as a formatted terminal table.
pub fn print_table(result: &RankingResult, total_comparisons: usize) {
    let label_width = result
        .items_in_order()
        .map(|item| item.label.chars().count())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!("   # | {:<label_width$} | {:>8}", "Item", "ID");
    println!("-----|-{}-|---------", "-".repeat(label_width));

    let mut rank = 1;
    for group in &result.groups {
        // Ties are marked "=" the way league tables do.
        let shown = if group.len() > 1 { format!("={rank}") } else { rank.to_string() };
        for item in &group.items {
            println!("{:>4} | {:<label_width$} | {:>8}", shown, item.label, item.id);
        }
        rank += group.len();
    }

    println!(
        "\n{} items ranked in {} groups ({} comparisons)",
        result.len(),
        result.groups.len(),
        total_comparisons,
    );
}

/// Print results as JSON.
pub fn print_json(result: &RankingResult, total_comparisons: usize) {
    let entries = result.ranked_entries();
    let output = JsonOutput {
        items: entries
            .iter()
            .map(|e| JsonRankedItem { rank: e.rank, id: e.item.id, label: &e.item.label })
            .collect(),
        groups: result.groups.len(),
        total_comparisons,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize results: {e}")),
    }
}

/// Print where a session stands without advancing it.
pub fn print_status(session: &RankingSession) {
    let progress = session.progress();
    println!("Items: {}", session.items().len());
    println!(
        "Comparisons: {} of at most {} ({:.0}%)",
        progress.completed,
        progress.estimated_total,
        progress.fraction() * 100.0,
    );
    match (session.result(), session.pending()) {
        (Some(result), _) => println!("Complete: {} items in {} groups", result.len(), result.groups.len()),
        (None, Some(request)) => println!(
            "Waiting on #{}: \"{}\" vs \"{}\"",
            request.sequence,
            request.left.representative().label,
            request.right.representative().label,
        ),
        (None, None) => println!("In progress"),
    }
}
