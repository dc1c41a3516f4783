use serde::Serialize;

use crate::{
    analytics::{competition::CompetitionLevel, counts::count_by_product_name},
    frames::FrameError,
    snapshot::CatalogSnapshot,
};

/// Home page default.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendingProduct {
    pub product_name: String,
    pub department: Option<String>,
    pub aisle: Option<String>,
    pub order_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledTrendingProduct {
    #[serde(flatten)]
    pub product: TrendingProduct,
    pub competition: CompetitionLevel,
}

/// Most ordered products across the whole marketplace, by raw order count.
pub fn trending_products(
    snapshot: &CatalogSnapshot,
    limit: usize,
) -> Result<Vec<TrendingProduct>, FrameError> {
    Ok(count_by_product_name(snapshot, snapshot.fact())?
        .into_iter()
        .take(limit)
        .map(|count| {
            let product = snapshot.product_at(count.first_row);
            TrendingProduct {
                product_name: count.product_name.to_string(),
                department: product.and_then(|item| item.department.clone()),
                aisle: product.and_then(|item| item.aisle.clone()),
                order_count: count.order_count,
            }
        })
        .collect())
}

pub fn trending_products_with_competition(
    snapshot: &CatalogSnapshot,
    limit: usize,
) -> Result<Vec<LabeledTrendingProduct>, FrameError> {
    Ok(trending_products(snapshot, limit)?
        .into_iter()
        .map(|product| LabeledTrendingProduct {
            competition: CompetitionLevel::from_order_count(product.order_count),
            product,
        })
        .collect())
}
