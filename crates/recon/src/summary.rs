use std::collections::HashMap;

use crate::model::{QuestionOutcome, ReconBucket, ReconSummary};

/// Compute summary statistics from classified outcomes.
pub fn compute_summary(outcomes: &[QuestionOutcome]) -> ReconSummary {
    let mut bucket_counts: HashMap<String, usize> = HashMap::new();
    let mut in_sync = 0;
    let mut needs_fix = 0;
    let mut unresolved = 0;
    let mut not_in_store = 0;
    let mut ambiguous = 0;
    let mut missing_options = 0;

    for o in outcomes {
        *bucket_counts.entry(o.bucket.to_string()).or_insert(0) += 1;

        match o.bucket {
            ReconBucket::InSync => in_sync += 1,
            ReconBucket::NeedsFix => needs_fix += 1,
            ReconBucket::Unresolved => unresolved += 1,
            ReconBucket::NotInStore => not_in_store += 1,
            ReconBucket::Ambiguous => ambiguous += 1,
            ReconBucket::MissingOptions => missing_options += 1,
        }
    }

    ReconSummary {
        total_rows: outcomes.len(),
        in_sync,
        needs_fix,
        unresolved,
        not_in_store,
        ambiguous,
        missing_options,
        bucket_counts,
    }
}
