//! Ranking metrics - ordinal position within a partition.

pub mod store_ranking;

pub use store_ranking::{StoreRanking, StoreRankingConfig};
