/// The question/answer loop between a human and a ranking session.
///
/// Generic over input and output so it can be driven by a terminal or a test.
use anyhow::{Context, Result};
use mergerank_core::{RankError, RankingResult, RankingSession, Step};
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::parse::{parse_answer, Answer};
use crate::prompt::{build_prompt, HELP_TEXT};

/// How the loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed(RankingResult),
    /// The user asked to stop. The session is resumable.
    Suspended,
    /// Input ran out before the ranking finished. The session is resumable.
    InputClosed,
}

/// Ask until the session completes, the user quits, or input ends.
///
/// `after_decision` runs once per accepted decision, after the session has
/// moved on to the next request or to completion. The CLI saves the session
/// there, so a saved file carries the pair waiting to be answered.
pub fn run_session<R, W, F>(
    session: &mut RankingSession,
    input: &mut R,
    out: &mut W,
    mut after_decision: F,
) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    F: FnMut(&RankingSession) -> Result<()>,
{
    let mut line = String::new();
    let mut decided = false;
    loop {
        let step = session.next_request();
        if decided {
            after_decision(session)?;
            decided = false;
        }
        let request = match step {
            Step::Complete(result) => return Ok(Outcome::Completed(result)),
            Step::Compare(request) => request,
        };

        write!(out, "{}", build_prompt(&request, &session.progress()))?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line).context("Failed to read answer")?;
        if read == 0 {
            info!(comparisons = session.comparisons_made(), "Input closed before ranking finished");
            return Ok(Outcome::InputClosed);
        }

        match parse_answer(&line) {
            None => writeln!(out, "Unrecognised answer {:?}. Type ? for help.", line.trim())?,
            Some(Answer::Help) => writeln!(out, "{HELP_TEXT}")?,
            Some(Answer::Quit) => return Ok(Outcome::Suspended),
            Some(Answer::Decide(decision)) => {
                match session.submit_decision(request.sequence, decision) {
                    Ok(()) => decided = true,
                    Err(RankError::TieNotAllowed) => {
                        writeln!(out, "Ties are disabled for this session; pick 1 or 2.")?
                    }
                    Err(e) => {
                        warn!(error = %e, "Decision rejected");
                        writeln!(out, "{e}")?;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergerank_core::{Item, SessionConfig, TiePolicy};
    use std::io::Cursor;

    fn session(labels: &[&str], config: SessionConfig) -> RankingSession {
        let items = labels.iter().enumerate().map(|(i, l)| Item::new(i as i64, *l)).collect();
        RankingSession::new(items, config).unwrap()
    }

    fn completed(outcome: Outcome) -> RankingResult {
        match outcome {
            Outcome::Completed(result) => result,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    fn labels(result: &RankingResult) -> Vec<Vec<String>> {
        result.groups.iter().map(|g| g.items.iter().map(|i| i.label.clone()).collect()).collect()
    }

    #[test]
    fn test_full_run_with_help_and_garbage() {
        let mut s = session(&["A", "B", "C", "D"], SessionConfig::default());
        let mut input = Cursor::new("?\n1\nmaybe\n=\n1\n1\n");
        let mut out = Vec::new();
        let mut saves = 0;

        let outcome = run_session(&mut s, &mut input, &mut out, |_| {
            saves += 1;
            Ok(())
        })
        .unwrap();

        let result = completed(outcome);
        assert_eq!(labels(&result), vec![vec!["A"], vec!["B"], vec!["C", "D"]]);
        assert_eq!(saves, 4);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("save the session and stop"));
        assert!(text.contains("Unrecognised answer \"maybe\""));
    }

    #[test]
    fn test_saved_session_carries_next_pair() {
        let mut s = session(&["A", "B", "C", "D"], SessionConfig::default());
        let mut pending = Vec::new();

        let outcome = run_session(&mut s, &mut Cursor::new("1\n2\n"), &mut Vec::new(), |s| {
            pending.push(s.pending().map(|req| req.sequence));
            Ok(())
        })
        .unwrap();

        assert_eq!(outcome, Outcome::InputClosed);
        assert_eq!(pending, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_quit_suspends_without_deciding() {
        let mut s = session(&["A", "B", "C"], SessionConfig::default());
        let mut input = Cursor::new("2\nq\n1\n");
        let mut out = Vec::new();

        let outcome = run_session(&mut s, &mut input, &mut out, |_| Ok(())).unwrap();
        assert_eq!(outcome, Outcome::Suspended);
        assert_eq!(s.comparisons_made(), 1);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_eof_reports_input_closed() {
        let mut s = session(&["A", "B"], SessionConfig::default());
        let outcome = run_session(&mut s, &mut Cursor::new(""), &mut Vec::new(), |_| Ok(())).unwrap();
        assert_eq!(outcome, Outcome::InputClosed);
    }

    #[test]
    fn test_forbidden_tie_asks_again() {
        let config = SessionConfig { tie_policy: TiePolicy::Forbid, ..Default::default() };
        let mut s = session(&["A", "B"], config);
        let mut out = Vec::new();

        let outcome = run_session(&mut s, &mut Cursor::new("=\n2\n"), &mut out, |_| Ok(())).unwrap();
        let result = completed(outcome);
        assert_eq!(labels(&result), vec![vec!["B"], vec!["A"]]);
        assert!(String::from_utf8(out).unwrap().contains("Ties are disabled"));
    }

    #[test]
    fn test_after_decision_error_stops_the_loop() {
        let mut s = session(&["A", "B", "C"], SessionConfig::default());
        let err = run_session(&mut s, &mut Cursor::new("1\n1\n"), &mut Vec::new(), |_| {
            anyhow::bail!("disk full")
        })
        .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(s.comparisons_made(), 1);
    }
}
