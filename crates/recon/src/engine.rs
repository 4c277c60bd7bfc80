use crate::config::ReconConfig;
use crate::matcher::{match_answer_explain, normalize};
use crate::model::{
    Candidate, Correction, OptionLabel, QuestionOutcome, ReconBucket, ReconInput, ReconMeta,
    ReconResult, RowKind, StoredQuestion, MAX_OPTIONS,
};
use crate::pairing::{pair_by_question, Pairing};
use crate::summary::compute_summary;

/// Run reconciliation per config over pre-loaded input.
///
/// Pure and total: pairing misses, ambiguity, and unmatched answers are
/// outcomes, not errors. Mutations are only ever *planned* here; applying
/// the correction plan is the caller's business.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    let prefix_len = config.pairing.question_prefix_len;

    let mut outcomes = Vec::new();
    let mut corrections = Vec::new();

    for sq in &input.sheet_mcq {
        let mut outcome = QuestionOutcome {
            bucket: ReconBucket::NotInStore,
            kind: RowKind::Mcq,
            sheet_row: sq.row,
            question: sq.question.clone(),
            question_id: None,
            matched: None,
            detail: None,
        };

        match pair_by_question(&sq.question, &input.store_mcq, |q| &q.text, prefix_len) {
            Pairing::NoMatch => {}
            Pairing::Ambiguous(found) => {
                let ids: Vec<i64> = found.iter().map(|q| q.id).collect();
                outcome.bucket = ReconBucket::Ambiguous;
                outcome.detail = Some(format!("stored questions {ids:?} share this text"));
            }
            Pairing::Unique(stored) => {
                outcome.question_id = Some(stored.id);

                if stored.options.is_empty() {
                    outcome.bucket = ReconBucket::MissingOptions;
                    outcome.detail = Some(format!(
                        "store has no option rows; sheet lists {}",
                        sq.options.len()
                    ));
                } else {
                    let candidates = candidates_from(stored);
                    match match_answer_explain(&sq.correct_answer, &candidates) {
                        None => {
                            outcome.bucket = ReconBucket::Unresolved;
                            outcome.detail = Some(format!(
                                "cannot match correct answer '{}' against {} stored options",
                                sq.correct_answer,
                                stored.options.len()
                            ));
                        }
                        Some(m) => {
                            outcome.matched = Some(m);
                            let target = &stored.options[m.label.index()];
                            let in_sync = stored
                                .options
                                .iter()
                                .all(|o| o.is_correct == (o.id == target.id));

                            if in_sync {
                                outcome.bucket = ReconBucket::InSync;
                            } else {
                                outcome.bucket = ReconBucket::NeedsFix;
                                corrections.push(Correction::SetCorrectOption {
                                    question_id: stored.id,
                                    option_id: target.id,
                                    label: m.label,
                                });
                            }
                        }
                    }
                }
            }
        }

        outcomes.push(outcome);
    }

    for fr in &input.sheet_fill {
        let mut outcome = QuestionOutcome {
            bucket: ReconBucket::NotInStore,
            kind: RowKind::Fill,
            sheet_row: fr.row,
            question: fr.question.clone(),
            question_id: None,
            matched: None,
            detail: None,
        };

        match pair_by_question(&fr.question, &input.store_fill, |a| &a.question, prefix_len) {
            Pairing::NoMatch => {}
            Pairing::Ambiguous(found) => {
                let ids: Vec<i64> = found.iter().map(|a| a.question_id).collect();
                outcome.bucket = ReconBucket::Ambiguous;
                outcome.detail = Some(format!("stored questions {ids:?} share this text"));
            }
            Pairing::Unique(stored) => {
                outcome.question_id = Some(stored.question_id);

                if normalize(&stored.answer) == normalize(&fr.answer) {
                    outcome.bucket = ReconBucket::InSync;
                } else if fr.answer.trim().is_empty() {
                    // Never blank out a stored answer from an empty cell.
                    outcome.bucket = ReconBucket::Unresolved;
                    outcome.detail = Some("sheet answer cell is empty".into());
                } else {
                    outcome.bucket = ReconBucket::NeedsFix;
                    outcome.detail = Some(format!(
                        "stored answer '{}' != sheet answer '{}'",
                        stored.answer,
                        fr.answer.trim()
                    ));
                    corrections.push(Correction::RewriteFillAnswer {
                        answer_id: stored.id,
                        question_id: stored.question_id,
                        answer: fr.answer.trim().to_string(),
                    });
                }
            }
        }

        outcomes.push(outcome);
    }

    let summary = compute_summary(&outcomes);

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        outcomes,
        corrections,
    }
}

/// Labeled candidates from a stored question's options, 0-based position →
/// 'A' + position. Options beyond D (bad data) are not matchable.
fn candidates_from(stored: &StoredQuestion) -> Vec<Candidate> {
    stored
        .options
        .iter()
        .take(MAX_OPTIONS)
        .enumerate()
        .filter_map(|(i, o)| {
            OptionLabel::from_index(i).map(|label| Candidate { label, text: o.text.clone() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchTier, SheetFillRow, SheetQuestion, StoredFillAnswer, StoredOption};

    fn test_config() -> ReconConfig {
        ReconConfig::from_toml(
            r#"
name = "Engine Test"

[workbook]
file = "export.xlsx"

[store]
database = "quiz.db"
"#,
        )
        .unwrap()
    }

    fn stored_question(id: i64, text: &str, options: &[(&str, bool)]) -> StoredQuestion {
        StoredQuestion {
            id,
            text: text.to_string(),
            options: options
                .iter()
                .enumerate()
                .map(|(i, (t, correct))| StoredOption {
                    id: id * 100 + i as i64,
                    position: i,
                    text: t.to_string(),
                    is_correct: *correct,
                })
                .collect(),
        }
    }

    fn sheet_question(row: u32, text: &str, options: &[&str], correct: &str) -> SheetQuestion {
        SheetQuestion {
            row,
            question: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn in_sync_question_plans_nothing() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(
                2,
                "Capital of Mauritius?",
                &["Port Louis", "Curepipe", "Rose Hill", "Vacoas"],
                "Port Louis",
            )],
            store_mcq: vec![stored_question(
                7,
                "Capital of Mauritius?",
                &[("Port Louis", true), ("Curepipe", false), ("Rose Hill", false), ("Vacoas", false)],
            )],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::InSync);
        assert_eq!(result.outcomes[0].question_id, Some(7));
        let m = result.outcomes[0].matched.unwrap();
        assert_eq!(m.label, OptionLabel::A);
        assert_eq!(m.tier, MatchTier::Exact);
        assert!(result.corrections.is_empty());
        assert!(result.summary.is_clean());
    }

    #[test]
    fn wrong_flag_plans_a_correction() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(
                2,
                "Independence year?",
                &["1965", "1968", "1970", "1972"],
                "B",
            )],
            store_mcq: vec![stored_question(
                3,
                "Independence year?",
                &[("1965", true), ("1968", false), ("1970", false), ("1972", false)],
            )],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::NeedsFix);
        assert_eq!(
            result.corrections,
            vec![Correction::SetCorrectOption {
                question_id: 3,
                option_id: 301,
                label: OptionLabel::B,
            }]
        );
    }

    #[test]
    fn no_flag_set_also_needs_fix() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(2, "Q?", &["a", "b"], "a")],
            store_mcq: vec![stored_question(1, "Q?", &[("a", false), ("b", false)])],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::NeedsFix);
        assert_eq!(result.corrections.len(), 1);
    }

    #[test]
    fn double_flag_needs_fix_even_when_target_is_flagged() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(2, "Q?", &["a", "b"], "a")],
            store_mcq: vec![stored_question(1, "Q?", &[("a", true), ("b", true)])],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::NeedsFix);
    }

    #[test]
    fn unmatched_answer_is_unresolved_not_defaulted() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(2, "Q?", &["a", "b"], "zzz")],
            store_mcq: vec![stored_question(1, "Q?", &[("a", true), ("b", false)])],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::Unresolved);
        assert!(result.corrections.is_empty());
        assert!(result.outcomes[0].detail.as_ref().unwrap().contains("zzz"));
    }

    #[test]
    fn missing_question_and_missing_options() {
        let input = ReconInput {
            sheet_mcq: vec![
                sheet_question(2, "Not in store?", &["a"], "a"),
                sheet_question(3, "No options?", &["a", "b"], "a"),
            ],
            store_mcq: vec![stored_question(1, "No options?", &[])],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::NotInStore);
        assert_eq!(result.outcomes[1].bucket, ReconBucket::MissingOptions);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn ambiguous_pairing_is_skipped() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(2, "Twin question?", &["a"], "a")],
            store_mcq: vec![
                stored_question(1, "Twin question?", &[("a", true)]),
                stored_question(2, "Twin question?", &[("a", false)]),
            ],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::Ambiguous);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn prefix_paired_question_still_reconciles() {
        let input = ReconInput {
            sheet_mcq: vec![sheet_question(
                2,
                // Sheet cell truncated relative to the stored text.
                "Who was the first governor of Mauritius under the",
                &["Denis de Nyon", "Mahé de La Bourdonnais"],
                "a",
            )],
            store_mcq: vec![stored_question(
                9,
                "Who was the first governor of Mauritius under the French crown?",
                &[("Denis de Nyon", false), ("Mahé de La Bourdonnais", true)],
            )],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].question_id, Some(9));
        assert_eq!(result.outcomes[0].bucket, ReconBucket::NeedsFix);
        let m = result.outcomes[0].matched.unwrap();
        assert_eq!(m.tier, MatchTier::Letter);
        assert_eq!(m.label, OptionLabel::A);
    }

    #[test]
    fn fill_rows_reconcile_by_text() {
        let input = ReconInput {
            sheet_fill: vec![
                SheetFillRow { row: 2, question: "First governor ____".into(), answer: "Denis de Nyon".into() },
                SheetFillRow { row: 3, question: "Highest peak ____".into(), answer: "Piton de la Petite Rivière Noire".into() },
                SheetFillRow { row: 4, question: "Largest island ____".into(), answer: "".into() },
            ],
            store_fill: vec![
                StoredFillAnswer { id: 10, question_id: 100, question: "First governor ____".into(), answer: "denis de nyon".into() },
                StoredFillAnswer { id: 11, question_id: 101, question: "Highest peak ____".into(), answer: "Le Pouce".into() },
                StoredFillAnswer { id: 12, question_id: 102, question: "Largest island ____".into(), answer: "Mauritius".into() },
            ],
            ..Default::default()
        };

        let result = run(&test_config(), &input);
        assert_eq!(result.outcomes[0].bucket, ReconBucket::InSync);
        assert_eq!(result.outcomes[1].bucket, ReconBucket::NeedsFix);
        assert_eq!(result.outcomes[2].bucket, ReconBucket::Unresolved);
        assert_eq!(
            result.corrections,
            vec![Correction::RewriteFillAnswer {
                answer_id: 11,
                question_id: 101,
                answer: "Piton de la Petite Rivière Noire".into(),
            }]
        );
    }

    #[test]
    fn second_pass_after_applying_plan_is_clean() {
        let mut input = ReconInput {
            sheet_mcq: vec![
                sheet_question(2, "Q one?", &["a", "b"], "b"),
                sheet_question(3, "Q two?", &["x", "y"], "x"),
            ],
            store_mcq: vec![
                stored_question(1, "Q one?", &[("a", true), ("b", false)]),
                stored_question(2, "Q two?", &[("x", false), ("y", true)]),
            ],
            ..Default::default()
        };

        let first = run(&test_config(), &input);
        assert_eq!(first.corrections.len(), 2);

        // Apply the plan to the model the way the store would.
        for c in &first.corrections {
            if let Correction::SetCorrectOption { question_id, option_id, .. } = c {
                for q in &mut input.store_mcq {
                    if q.id == *question_id {
                        for o in &mut q.options {
                            o.is_correct = o.id == *option_id;
                        }
                    }
                }
            }
        }

        let second = run(&test_config(), &input);
        assert!(second.corrections.is_empty());
        assert!(second.summary.is_clean());
    }
}
