use serde::Serialize;

use crate::{
    analytics::{competition::CompetitionLevel, counts::count_by_product_name},
    frames::FrameError,
    snapshot::CatalogSnapshot,
};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub product_name: String,
    pub order_count: u64,
    pub competition: CompetitionLevel,
}

/// Best-selling products inside one department.
///
/// The department name must match a stored department exactly. An unknown
/// department yields an empty leaderboard.
pub fn top_products_by_department(
    snapshot: &CatalogSnapshot,
    department: &str,
    limit: usize,
) -> Result<Vec<LeaderboardRow>, FrameError> {
    let lines = snapshot.fact().iter().filter(|line| {
        snapshot
            .product_for_line(line)
            .and_then(|product| product.department.as_deref())
            .is_some_and(|name| name == department)
    });

    Ok(count_by_product_name(snapshot, lines)?
        .into_iter()
        .take(limit)
        .map(|count| LeaderboardRow {
            product_name: count.product_name.to_string(),
            order_count: count.order_count,
            competition: CompetitionLevel::from_order_count(count.order_count),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::{analytics::competition::CompetitionLevel, snapshot::tests::grocery_snapshot};

    use super::top_products_by_department;

    #[test]
    fn ranks_department_products_by_order_count() {
        let snapshot = grocery_snapshot();
        let rows = top_products_by_department(&snapshot, "produce", 10).expect("leaderboard");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Banana");
        assert_eq!(rows[0].order_count, 6);
        assert_eq!(rows[0].competition, CompetitionLevel::Low);
        assert_eq!(rows[1].product_name, "Organic Banana");
    }

    #[test]
    fn never_exceeds_limit_and_is_non_increasing() {
        let snapshot = grocery_snapshot();
        for department in snapshot.department_names() {
            for limit in 0..4 {
                let rows =
                    top_products_by_department(&snapshot, &department, limit).expect("leaderboard");
                assert!(rows.len() <= limit);
                assert!(rows.windows(2).all(|pair| pair[0].order_count >= pair[1].order_count));
            }
        }
    }

    #[test]
    fn unknown_department_is_empty_not_an_error() {
        let snapshot = grocery_snapshot();
        assert_eq!(top_products_by_department(&snapshot, "Nonexistent", 10).ok(), Some(Vec::new()));
        assert_eq!(top_products_by_department(&snapshot, "Produce", 10).ok(), Some(Vec::new()));
    }
}
