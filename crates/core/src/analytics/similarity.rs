use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::{
    analytics::tfidf::TfidfMatrix, domain::product::CatalogProduct, snapshot::CatalogSnapshot,
};

pub const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// Text that stands in for an absent aisle or department name.
const MISSING_NAME: &str = "nan";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarProduct {
    pub product_name: String,
    pub aisle: Option<String>,
    pub department: Option<String>,
    pub similarity_score: f64,
}

/// Result of a similarity lookup. `NotFound` is distinct from a match with no neighbours.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "products", rename_all = "snake_case")]
pub enum SimilarityLookup {
    Found(Vec<SimilarProduct>),
    NotFound,
}

impl SimilarityLookup {
    pub fn products(&self) -> Option<&[SimilarProduct]> {
        match self {
            Self::Found(products) => Some(products),
            Self::NotFound => None,
        }
    }
}

/// `"<name> <aisle> <department>"`, lowercased.
pub fn product_document(product: &CatalogProduct) -> String {
    format!(
        "{} {} {}",
        product.name(),
        product.aisle.as_deref().unwrap_or(MISSING_NAME),
        product.department.as_deref().unwrap_or(MISSING_NAME),
    )
    .to_lowercase()
}

/// Catalog products whose text is closest to `product_name`.
///
/// The TF-IDF matrix is fitted over the whole catalog on every call; nothing is
/// cached between lookups. When several rows share the queried name the first
/// one is the query vector, which may hide a duplicate-name data problem.
/// Ties keep catalog order and the queried row itself is never returned.
pub fn similar_products(
    snapshot: &CatalogSnapshot,
    product_name: &str,
    limit: usize,
) -> SimilarityLookup {
    let Some(target) = snapshot.rows_matching(product_name).next() else {
        return SimilarityLookup::NotFound;
    };

    let documents: Vec<String> = snapshot.catalog().iter().map(product_document).collect();
    let matrix = TfidfMatrix::fit(&documents);
    debug!(
        event_name = "analytics.similarity.refit",
        documents = documents.len(),
        vocabulary = matrix.vocabulary_len(),
        target_row = target,
        "fitted tf-idf matrix for similarity lookup"
    );

    let mut ranked: Vec<(usize, f64)> = matrix
        .cosine_against_all(target)
        .into_iter()
        .enumerate()
        .filter(|(row, _)| *row != target)
        .collect();
    ranked.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);

    let products = ranked
        .into_iter()
        .filter_map(|(row, score)| {
            snapshot.product_at(row).map(|product| SimilarProduct {
                product_name: product.name().to_string(),
                aisle: product.aisle.clone(),
                department: product.department.clone(),
                similarity_score: round_score(score),
            })
        })
        .collect();

    SimilarityLookup::Found(products)
}

fn round_score(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}
