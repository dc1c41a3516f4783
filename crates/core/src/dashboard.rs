use std::fmt::Display;

use tracing::{info, warn};

use crate::{
    analytics::{
        diversification::recommend_new_categories, leaderboard::top_products_by_department,
        similarity::similar_products, trending::trending_products_with_competition,
        LabeledTrendingProduct, LeaderboardRow, Recommendation, SimilarityLookup,
    },
    config::AnalyticsConfig,
    errors::ApplicationError,
    snapshot::{CatalogSnapshot, SnapshotSummary},
};

#[derive(Debug)]
pub enum DataState {
    Ready(CatalogSnapshot),
    Unavailable { reason: String },
}

/// Entry point for the presentation layer.
///
/// Owns the loaded snapshot, or the reason loading failed. While unavailable
/// every operation returns [`ApplicationError::DataUnavailable`].
#[derive(Debug)]
pub struct Dashboard {
    state: DataState,
    limits: AnalyticsConfig,
}

impl Dashboard {
    pub fn ready(snapshot: CatalogSnapshot, limits: AnalyticsConfig) -> Self {
        Self { state: DataState::Ready(snapshot), limits }
    }

    pub fn unavailable(reason: impl Into<String>, limits: AnalyticsConfig) -> Self {
        Self { state: DataState::Unavailable { reason: reason.into() }, limits }
    }

    /// Wraps the outcome of a load attempt. A failure is logged once here.
    pub fn from_load<E: Display>(
        result: Result<CatalogSnapshot, E>,
        limits: AnalyticsConfig,
    ) -> Self {
        match result {
            Ok(snapshot) => {
                let summary = snapshot.summary();
                info!(
                    event_name = "dashboard.ready",
                    products = summary.products,
                    order_lines = summary.order_lines,
                    unmatched_order_lines = summary.unmatched_order_lines,
                    "dashboard data loaded"
                );
                Self::ready(snapshot, limits)
            }
            Err(error) => {
                let reason = error.to_string();
                warn!(
                    event_name = "dashboard.unavailable",
                    reason = %reason,
                    "dashboard data unavailable"
                );
                Self::unavailable(reason, limits)
            }
        }
    }

    pub fn state(&self) -> &DataState {
        &self.state
    }

    pub fn limits(&self) -> AnalyticsConfig {
        self.limits
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, DataState::Ready(_))
    }

    pub fn snapshot(&self) -> Result<&CatalogSnapshot, ApplicationError> {
        match &self.state {
            DataState::Ready(snapshot) => Ok(snapshot),
            DataState::Unavailable { reason } => {
                Err(ApplicationError::unavailable(reason.clone()))
            }
        }
    }

    pub fn summary(&self) -> Result<SnapshotSummary, ApplicationError> {
        self.snapshot().map(CatalogSnapshot::summary)
    }

    pub fn list_departments(&self) -> Result<Vec<String>, ApplicationError> {
        self.snapshot().map(CatalogSnapshot::department_names)
    }

    pub fn list_top_by_department(
        &self,
        department: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardRow>, ApplicationError> {
        let snapshot = self.snapshot()?;
        let limit = limit.unwrap_or(self.limits.leaderboard_limit);
        Ok(top_products_by_department(snapshot, department, limit)?)
    }

    pub fn find_similar_products(
        &self,
        product_name: &str,
        limit: Option<usize>,
    ) -> Result<SimilarityLookup, ApplicationError> {
        let snapshot = self.snapshot()?;
        let limit = limit.unwrap_or(self.limits.similar_limit);
        Ok(similar_products(snapshot, product_name, limit))
    }

    pub fn recommend_new_categories<S: AsRef<str>>(
        &self,
        owned_products: &[S],
        limit: Option<usize>,
        per_department_cap: Option<usize>,
    ) -> Result<Vec<Recommendation>, ApplicationError> {
        let snapshot = self.snapshot()?;
        let limit = limit.unwrap_or(self.limits.recommendation_limit);
        let cap = per_department_cap.unwrap_or(self.limits.per_department_cap);
        Ok(recommend_new_categories(snapshot, owned_products, limit, cap)?)
    }

    pub fn list_trending(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<LabeledTrendingProduct>, ApplicationError> {
        let snapshot = self.snapshot()?;
        let limit = limit.unwrap_or(self.limits.trending_limit);
        Ok(trending_products_with_competition(snapshot, limit)?)
    }
}
