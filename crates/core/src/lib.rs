pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod frames;
pub mod snapshot;

pub use analytics::{
    CompetitionLevel, LabeledTrendingProduct, LeaderboardRow, Recommendation, SimilarProduct,
    SimilarityLookup, TrendingProduct,
};
pub use dashboard::{Dashboard, DataState};
pub use domain::order::{EnrichedOrderLine, Order, OrderId, OrderLine, UserId};
pub use domain::product::{
    Aisle, AisleId, CatalogProduct, Department, DepartmentId, Product, ProductId,
};
pub use errors::{ApplicationError, InterfaceError};
pub use frames::FrameError;
pub use snapshot::{normalize_name, CatalogSnapshot, SnapshotSummary, SourceTables};
