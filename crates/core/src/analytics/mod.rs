//! Read-only analytic queries over a [`crate::snapshot::CatalogSnapshot`].

pub mod competition;
pub mod counts;
pub mod diversification;
pub mod leaderboard;
pub mod similarity;
pub mod tfidf;
pub mod trending;

pub use competition::CompetitionLevel;
pub use diversification::{parse_owned_products, recommend_new_categories, Recommendation};
pub use leaderboard::{top_products_by_department, LeaderboardRow};
pub use similarity::{similar_products, SimilarProduct, SimilarityLookup};
pub use trending::{
    trending_products, trending_products_with_competition, LabeledTrendingProduct,
    TrendingProduct,
};
