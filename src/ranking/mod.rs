// Ranking: turn seed terms into scored, comparable candidate tables.
//
// Two independent approaches produce RankedTables (neighbor ranking along
// the calibrated axis, and buzzword similarity), and the aggregator merges
// them onto one normalized scale.

pub mod aggregate;
pub mod buzzword;
pub mod neighbor;
pub mod scored;

pub use aggregate::{merge, merge_all, normalize};
pub use buzzword::{BuzzwordOptions, BuzzwordReport, BuzzwordScorer};
pub use neighbor::{rank, NeighborRanker, RankOptions, RankReport};
pub use scored::{RankedTable, ScoredTerm};
