/// Terminal rendering of comparison requests.
use mergerank_core::{ComparisonRequest, Progress, RankGroup};

pub const HELP_TEXT: &str = "\
  1 / l / left    the left item ranks higher
  2 / r / right   the right item ranks higher
  = / e / equal   both rank the same (they stay tied)
  q / quit        save the session and stop
  ? / h / help    show this help";

/// Describe one side of a comparison. A tie group is shown by its first
/// member plus the size of the group.
fn describe(group: &RankGroup) -> String {
    let first = &group.representative().label;
    match group.len() {
        1 => first.clone(),
        n => format!("{first}  (tied with {} other{})", n - 1, if n == 2 { "" } else { "s" }),
    }
}

/// Build the question shown for one request.
pub fn build_prompt(request: &ComparisonRequest, progress: &Progress) -> String {
    format!(
        "\n[{}/{} max] Which do you prefer?\n\
         \x20 1) {}\n\
         \x20 2) {}\n\
         (1 / 2 / = for equal, q to save and quit) > ",
        progress.completed + 1,
        progress.estimated_total,
        describe(&request.left),
        describe(&request.right),
    )
}
