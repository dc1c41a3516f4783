use crate::{
    domain::order::EnrichedOrderLine,
    frames::{self, FrameError},
    snapshot::CatalogSnapshot,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameCount<'a> {
    pub product_name: &'a str,
    /// First catalog row carrying `product_name`.
    pub first_row: usize,
    pub order_count: u64,
}

/// Counts order lines per product name, most frequent first.
///
/// Ties keep the order in which names first appear in `lines`. Lines without a
/// catalog product have no name and are skipped.
pub fn count_by_product_name<'a>(
    snapshot: &'a CatalogSnapshot,
    lines: impl IntoIterator<Item = &'a EnrichedOrderLine>,
) -> Result<Vec<NameCount<'a>>, FrameError> {
    let name_rows: Vec<u32> = lines
        .into_iter()
        .filter_map(|line| line.catalog_row)
        .filter_map(|row| snapshot.first_row_named_like(row))
        .filter_map(|row| u32::try_from(row).ok())
        .collect();

    Ok(frames::value_counts(name_rows)?
        .into_iter()
        .filter_map(|(first_row, order_count)| {
            snapshot.product_at(first_row).map(|product| NameCount {
                product_name: product.name(),
                first_row,
                order_count,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::snapshot::{
        tests::{grocery_snapshot, line, product},
        CatalogSnapshot, SourceTables,
    };

    use super::count_by_product_name;

    #[test]
    fn counts_are_descending_and_skip_unmatched_lines() {
        let snapshot = grocery_snapshot();
        let counts = count_by_product_name(&snapshot, snapshot.fact()).expect("counts");

        let names: Vec<&str> = counts.iter().map(|count| count.product_name).collect();
        assert_eq!(
            names,
            vec![
                "Banana",
                "Whole Milk",
                "Organic Banana",
                "Sourdough Bread",
                "Greek Yogurt",
                "Bagels"
            ]
        );
        assert_eq!(counts.iter().map(|count| count.order_count).sum::<u64>(), 21);
    }

    #[test]
    fn same_named_products_share_one_count() {
        let snapshot = CatalogSnapshot::build(SourceTables {
            products: vec![product(1, "Banana", 24, 1), product(2, "Banana", 24, 2)],
            order_lines: vec![line(1, 2), line(2, 1), line(3, 2)],
            ..SourceTables::default()
        })
        .expect("snapshot builds");

        let counts = count_by_product_name(&snapshot, snapshot.fact()).expect("counts");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].product_name, "Banana");
        assert_eq!(counts[0].first_row, 0);
        assert_eq!(counts[0].order_count, 3);
    }
}
