// Score aggregation: put tables from different approaches on one scale and
// combine them.
//
// Each table is min-max normalized on its own, so a buzzword similarity and
// an axis loadedness both land in [0, 1]. A table whose scores are all equal
// has no range; every row maps to 0 instead of NaN. Rows for the same term
// are then averaged and their source terms unioned.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::scored::{by_score_then_term, RankedTable, ScoredTerm};

/// Min-max normalize one table's scores into [0, 1], keeping row order.
pub fn normalize(table: &RankedTable) -> RankedTable {
    let Some((min, max)) = table.score_range() else {
        return RankedTable::new();
    };
    // Halve everything when max - min overflows f64
    let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
    let (lo, hi) = (min * scale, max * scale);
    let span = hi - lo;
    if span <= 0.0 {
        debug!(rows = table.len(), "Zero score range, normalizing to 0");
    }

    table
        .rows()
        .iter()
        .map(|row| ScoredTerm {
            term: row.term.clone(),
            score: if span > 0.0 {
                ((row.score * scale - lo) / span).clamp(0.0, 1.0)
            } else {
                0.0
            },
            source_terms: row.source_terms.clone(),
        })
        .collect()
}

/// Merge two tables: normalize each, then average per term.
pub fn merge(a: &RankedTable, b: &RankedTable) -> RankedTable {
    merge_all([a, b])
}

/// Merge any number of tables. The result is sorted by score descending,
/// ties by term ascending.
pub fn merge_all<'a, I>(tables: I) -> RankedTable
where
    I: IntoIterator<Item = &'a RankedTable>,
{
    struct Acc {
        term: String,
        total: f64,
        count: usize,
        sources: BTreeSet<String>,
    }

    let mut accs: Vec<Acc> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for table in tables {
        for row in normalize(table).into_rows() {
            let slot = *index.entry(row.term.clone()).or_insert_with(|| {
                accs.push(Acc {
                    term: row.term.clone(),
                    total: 0.0,
                    count: 0,
                    sources: BTreeSet::new(),
                });
                accs.len() - 1
            });
            let acc = &mut accs[slot];
            acc.total += row.score;
            acc.count += 1;
            acc.sources.extend(row.source_terms);
        }
    }

    let mut rows: Vec<ScoredTerm> = accs
        .into_iter()
        .map(|acc| ScoredTerm {
            term: acc.term,
            score: acc.total / acc.count as f64,
            source_terms: acc.sources,
        })
        .collect();
    rows.sort_by(by_score_then_term);
    rows.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, f64, &str)]) -> RankedTable {
        rows.iter()
            .map(|(t, s, src)| ScoredTerm::new(*t, *s, *src))
            .collect()
    }

    #[test]
    fn test_normalize_range() {
        let t = normalize(&table(&[("a", 2.0, "s"), ("b", 6.0, "s"), ("c", 4.0, "s")]));
        assert_eq!(t.get("a").unwrap().score, 0.0);
        assert_eq!(t.get("b").unwrap().score, 1.0);
        assert!((t.get("c").unwrap().score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_scores_normalize_to_zero() {
        let t = normalize(&table(&[("a", 5.0, "s"), ("b", 5.0, "s"), ("c", 5.0, "s")]));
        assert!(t.rows().iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_normalize_extreme_range_keeps_every_row() {
        let t = normalize(&table(&[("lo", -1e308, "s"), ("mid", 0.0, "s"), ("hi", 1e308, "s")]));
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("lo").unwrap().score, 0.0);
        assert!((t.get("mid").unwrap().score - 0.5).abs() < 1e-12);
        assert_eq!(t.get("hi").unwrap().score, 1.0);
    }

    #[test]
    fn test_merge_example() {
        let a = table(&[("x", 10.0, "seed_a"), ("y", 0.0, "seed_a")]);
        let b = table(&[("x", 0.0, "seed_b"), ("z", 5.0, "seed_b")]);
        let merged = merge(&a, &b);
        assert_eq!(merged.len(), 3);

        let x = merged.get("x").unwrap();
        assert!((x.score - 0.5).abs() < 1e-12);
        assert_eq!(x.sources_joined(), "seed_a, seed_b");
        assert_eq!(merged.get("y").unwrap().score, 0.0);
        assert_eq!(merged.get("z").unwrap().score, 1.0);

        let order: Vec<_> = merged.rows().iter().map(|r| r.term.as_str()).collect();
        assert_eq!(order, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_merge_all_three_tables() {
        let a = table(&[("x", 1.0, "a"), ("y", 0.0, "a")]);
        let b = table(&[("x", 0.0, "b"), ("y", 1.0, "b")]);
        let c = table(&[("x", 3.0, "c"), ("y", 2.0, "c")]);
        let merged = merge_all([&a, &b, &c]);
        assert!((merged.get("x").unwrap().score - 2.0 / 3.0).abs() < 1e-12);
        assert!((merged.get("y").unwrap().score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(&RankedTable::new(), &RankedTable::new()).is_empty());
    }
}
