// src/dedupe.rs
use std::collections::HashSet;

use crate::engine::types::Record;

/// Titles of an earlier run, for [`filter_new`].
pub fn titles(records: &[Record]) -> HashSet<String> {
    records.iter().map(|r| r.title.clone()).collect()
}

/// Records whose title is not in `existing`, in input order.
/// Sequence numbers are kept as crawled.
pub fn filter_new(records: &[Record], existing: &HashSet<String>) -> Vec<Record> {
    records
        .iter()
        .filter(|r| !existing.contains(&r.title))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(seq: usize, title: &str) -> Record {
        Record { seq, title: s!(title), ..Default::default() }
    }

    #[test]
    fn keeps_order_and_numbering() {
        let recs = vec![rec(1, "a"), rec(2, "b"), rec(3, "c")];
        let known: HashSet<String> = [s!("b")].into_iter().collect();
        let out = filter_new(&recs, &known);
        assert_eq!(out.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn idempotent_and_empty_set_is_identity() {
        let recs = vec![rec(1, "a"), rec(2, "a"), rec(3, "x")];
        let known: HashSet<String> = [s!("x")].into_iter().collect();
        let once = filter_new(&recs, &known);
        assert_eq!(filter_new(&once, &known), once);
        assert_eq!(filter_new(&recs, &HashSet::new()), recs);
    }

    #[test]
    fn second_run_over_own_titles_is_empty() {
        let recs = vec![rec(1, "a"), rec(2, "b")];
        assert!(filter_new(&recs, &titles(&recs)).is_empty());
    }
}
