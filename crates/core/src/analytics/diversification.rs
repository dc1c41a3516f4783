use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    analytics::{competition::CompetitionLevel, counts::count_by_product_name},
    domain::product::DepartmentId,
    frames::FrameError,
    snapshot::{normalize_name, CatalogSnapshot},
};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
pub const DEFAULT_PER_DEPARTMENT_CAP: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub product_name: String,
    pub department: String,
    pub order_count: u64,
    pub competition: CompetitionLevel,
}

/// Splits a comma separated product list, trimming entries and dropping blanks.
pub fn parse_owned_products(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Departments the seller already sells in, from catalog rows matching `owned_products`.
///
/// Names that match nothing in the catalog are ignored.
pub fn owned_departments<S: AsRef<str>>(
    snapshot: &CatalogSnapshot,
    owned_products: &[S],
) -> BTreeSet<DepartmentId> {
    let keys: BTreeSet<String> = owned_products
        .iter()
        .map(|name| normalize_name(name.as_ref()))
        .filter(|key| !key.is_empty())
        .collect();

    snapshot
        .rows_matching_any(&keys)
        .filter_map(|row| snapshot.product_at(row))
        .map(|product| product.department_id())
        .collect()
}

/// Best sellers from departments the seller has not entered yet.
///
/// At most `per_department_cap` products come from any single department and at
/// most `limit` overall. An owned list that matches nothing yields no
/// recommendations.
pub fn recommend_new_categories<S: AsRef<str>>(
    snapshot: &CatalogSnapshot,
    owned_products: &[S],
    limit: usize,
    per_department_cap: usize,
) -> Result<Vec<Recommendation>, FrameError> {
    let owned = owned_departments(snapshot, owned_products);
    if owned.is_empty() {
        return Ok(Vec::new());
    }

    let lines = snapshot
        .fact()
        .iter()
        .filter(|line| snapshot.department_id_for_line(line).map_or(true, |id| !owned.contains(&id)));
    let counts = count_by_product_name(snapshot, lines)?;

    let mut candidates: Vec<Recommendation> = counts
        .into_iter()
        .filter_map(|count| {
            let joined = snapshot.product_at(count.first_row)?;
            // Duplicate names can join back onto a row in an owned department.
            if owned.contains(&joined.department_id()) {
                return None;
            }
            let department = joined.department.clone()?;
            Some(Recommendation {
                product_name: count.product_name.to_string(),
                department,
                order_count: count.order_count,
                competition: CompetitionLevel::from_order_count(count.order_count),
            })
        })
        .collect();

    candidates.sort_by(|left, right| {
        left.department.cmp(&right.department).then_with(|| right.order_count.cmp(&left.order_count))
    });

    let mut taken_per_department: HashMap<String, usize> = HashMap::new();
    let mut capped: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|candidate| {
            let taken = taken_per_department.entry(candidate.department.clone()).or_insert(0);
            *taken += 1;
            *taken <= per_department_cap
        })
        .collect();

    capped.sort_by(|left, right| right.order_count.cmp(&left.order_count));
    capped.truncate(limit);
    Ok(capped)
}
