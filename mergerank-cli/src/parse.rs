/// Parsing of item lists and interactive answers.
use mergerank_core::{Decision, Item};
use serde::Deserialize;

/// What the user typed at the comparison prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Decide(Decision),
    /// Save and stop; the session can be resumed later.
    Quit,
    Help,
}

/// Item entry in a JSON items file: either a bare label or `{id, label}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonItem {
    Label(String),
    Full { id: i64, label: String },
}

/// Parse an answer. Case-insensitive, surrounding whitespace ignored.
/// Returns `None` for anything unrecognised.
pub fn parse_answer(input: &str) -> Option<Answer> {
    let answer = match input.trim().to_ascii_lowercase().as_str() {
        "1" | "l" | "left" => Answer::Decide(Decision::PreferLeft),
        "2" | "r" | "right" => Answer::Decide(Decision::PreferRight),
        "=" | "0" | "e" | "equal" | "tie" => Answer::Decide(Decision::Equal),
        "q" | "quit" | "exit" => Answer::Quit,
        "?" | "h" | "help" => Answer::Help,
        _ => return None,
    };
    Some(answer)
}

/// Parse items from file content.
///
/// Accepts a JSON array (of labels, or of `{"id": .., "label": ..}` objects)
/// or plain text with one item per line. Items without an explicit ID get
/// their position as ID. Blank entries are skipped.
pub fn parse_items_from_str(content: &str) -> Result<Vec<Item>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let entries: Vec<JsonItem> = serde_json::from_str(trimmed)
            .map_err(|e| format!("File looks like JSON but failed to parse: {e}"))?;
        let items = entries
            .into_iter()
            .enumerate()
            .filter_map(|(pos, entry)| match entry {
                JsonItem::Label(label) if label.trim().is_empty() => None,
                JsonItem::Label(label) => Some(Item::new(pos as i64, label.trim())),
                JsonItem::Full { id, label } => Some(Item::new(id, label)),
            })
            .collect();
        Ok(items)
    } else {
        Ok(labels_to_items(trimmed.lines()))
    }
}

/// Turn bare labels into items, numbering them in order.
pub fn labels_to_items<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<Item> {
    labels
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(pos, label)| Item::new(pos as i64, label))
        .collect()
}

/// Append inline labels to `items`, numbered after the largest ID already
/// present so they never collide with file IDs.
pub fn append_inline_items(items: &mut Vec<Item>, labels: &[String]) -> Result<(), String> {
    if labels.is_empty() {
        return Ok(());
    }
    let first_id = match items.iter().map(|i| i.id).max() {
        None => 0,
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| format!("No IDs left for --item after item ID {max}"))?,
    };

    for mut item in labels_to_items(labels.iter().map(String::as_str)) {
        item.id = first_id
            .checked_add(item.id)
            .ok_or_else(|| format!("No ID left for --item {:?}", item.label))?;
        items.push(item);
    }
    Ok(())
}
