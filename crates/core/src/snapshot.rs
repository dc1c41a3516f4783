use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    domain::{
        order::{EnrichedOrderLine, Order, OrderLine},
        product::{Aisle, CatalogProduct, Department, DepartmentId, Product},
    },
    frames::{self, CatalogColumns, FrameError},
};

/// The five raw tables as read from disk, before any joins.
#[derive(Clone, Debug, Default)]
pub struct SourceTables {
    pub orders: Vec<Order>,
    pub order_lines: Vec<OrderLine>,
    pub products: Vec<Product>,
    pub aisles: Vec<Aisle>,
    pub departments: Vec<Department>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub orders: usize,
    pub order_lines: usize,
    pub products: usize,
    pub aisles: usize,
    pub departments: usize,
    pub unmatched_order_lines: usize,
}

/// Lowercases and trims a user-supplied name so it can be compared against
/// catalog keys.
pub fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Read-only view over the loaded dataset.
///
/// Built once from [`SourceTables`]; every analytic operation borrows it and
/// never mutates it. Products are left-joined to their aisle and department,
/// and order lines are left-joined to the resulting catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    orders: Vec<Order>,
    aisles: Vec<Aisle>,
    departments: Vec<Department>,
    catalog: Vec<CatalogProduct>,
    fact: Vec<EnrichedOrderLine>,
    name_keys: Vec<String>,
    name_row: Vec<usize>,
    first_row_by_name: HashMap<String, usize>,
}

impl CatalogSnapshot {
    pub fn build(tables: SourceTables) -> Result<Self, FrameError> {
        let SourceTables { orders, order_lines, products, aisles, departments } = tables;

        let CatalogColumns { aisle, department, name_row } =
            frames::join_catalog(&products, &aisles, &departments)?;
        let catalog_rows = frames::join_order_lines(&order_lines, &products)?;

        let catalog: Vec<CatalogProduct> = products
            .into_iter()
            .zip(aisle.into_iter().zip(department))
            .map(|(product, (aisle, department))| CatalogProduct { product, aisle, department })
            .collect();

        let fact = order_lines
            .into_iter()
            .zip(catalog_rows)
            .map(|(line, catalog_row)| EnrichedOrderLine { line, catalog_row })
            .collect();

        let name_keys = catalog.iter().map(|item| normalize_name(item.name())).collect();
        let first_row_by_name = catalog
            .iter()
            .enumerate()
            .filter(|(row, _)| name_row.get(*row) == Some(row))
            .map(|(row, item)| (item.name().to_string(), row))
            .collect();

        Ok(Self {
            orders,
            aisles,
            departments,
            catalog,
            fact,
            name_keys,
            name_row,
            first_row_by_name,
        })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn aisles(&self) -> &[Aisle] {
        &self.aisles
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn catalog(&self) -> &[CatalogProduct] {
        &self.catalog
    }

    pub fn fact(&self) -> &[EnrichedOrderLine] {
        &self.fact
    }

    pub fn product_at(&self, row: usize) -> Option<&CatalogProduct> {
        self.catalog.get(row)
    }

    pub fn product_for_line(&self, line: &EnrichedOrderLine) -> Option<&CatalogProduct> {
        line.catalog_row.and_then(|row| self.catalog.get(row))
    }

    /// First catalog row whose display name matches `name` exactly.
    pub fn first_product_named(&self, name: &str) -> Option<&CatalogProduct> {
        self.first_row_by_name.get(name).and_then(|row| self.catalog.get(*row))
    }

    /// First catalog row sharing the display name of row `row`.
    pub fn first_row_named_like(&self, row: usize) -> Option<usize> {
        self.name_row.get(row).copied()
    }

    /// Rows whose normalized name equals the normalized `name`, in catalog order.
    pub fn rows_matching(&self, name: &str) -> impl Iterator<Item = usize> + '_ {
        let key = normalize_name(name);
        self.name_keys
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| !key.is_empty() && **candidate == key)
            .map(|(row, _)| row)
    }

    /// Catalog rows whose normalized name appears in `normalized_keys`.
    pub fn rows_matching_any<'a>(
        &'a self,
        normalized_keys: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = usize> + 'a {
        self.name_keys
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| normalized_keys.contains(candidate.as_str()))
            .map(|(row, _)| row)
    }

    pub fn department_id_for_line(&self, line: &EnrichedOrderLine) -> Option<DepartmentId> {
        self.product_for_line(line).map(CatalogProduct::department_id)
    }

    /// Sorted, de-duplicated department names.
    pub fn department_names(&self) -> Vec<String> {
        self.departments
            .iter()
            .map(|department| department.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            orders: self.orders.len(),
            order_lines: self.fact.len(),
            products: self.catalog.len(),
            aisles: self.aisles.len(),
            departments: self.departments.len(),
            unmatched_order_lines: self.fact.iter().filter(|line| line.catalog_row.is_none()).count(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeSet;

    use crate::domain::{
        order::{Order, OrderId, OrderLine, UserId},
        product::{Aisle, AisleId, Department, DepartmentId, Product, ProductId},
    };

    use super::{normalize_name, CatalogSnapshot, SourceTables};

    pub(crate) fn product(id: i32, name: &str, aisle: i16, department: i8) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            aisle_id: AisleId(aisle),
            department_id: DepartmentId(department),
        }
    }

    pub(crate) fn line(order: i32, product: i32) -> OrderLine {
        OrderLine {
            order_id: OrderId(order),
            product_id: ProductId(product),
            add_to_cart_order: 1,
            reordered: false,
        }
    }

    /// Produce/Dairy/Bakery fixture. Banana sells most, then Whole Milk.
    pub(crate) fn grocery_snapshot() -> CatalogSnapshot {
        let mut order_lines = Vec::new();
        let mut push = |product_id: i32, times: i32| {
            for order in 0..times {
                order_lines.push(line(order + 1, product_id));
            }
        };
        push(1, 6);
        push(2, 4);
        push(3, 5);
        push(4, 2);
        push(5, 3);
        push(6, 1);
        push(99, 2);

        CatalogSnapshot::build(SourceTables {
            orders: vec![Order {
                id: OrderId(1),
                user_id: UserId(7),
                order_number: 1,
                day_of_week: 2,
                hour_of_day: 9,
            }],
            order_lines,
            products: vec![
                product(1, "Banana", 24, 4),
                product(2, "Organic Banana", 24, 4),
                product(3, "Whole Milk", 84, 16),
                product(4, "Greek Yogurt", 120, 16),
                product(5, "Sourdough Bread", 112, 3),
                product(6, "Bagels", 112, 3),
            ],
            aisles: vec![
                Aisle { id: AisleId(24), name: "fresh fruits".to_string() },
                Aisle { id: AisleId(84), name: "milk".to_string() },
                Aisle { id: AisleId(112), name: "bread".to_string() },
                Aisle { id: AisleId(120), name: "yogurt".to_string() },
            ],
            departments: vec![
                Department { id: DepartmentId(4), name: "produce".to_string() },
                Department { id: DepartmentId(16), name: "dairy eggs".to_string() },
                Department { id: DepartmentId(3), name: "bakery".to_string() },
            ],
        })
        .expect("snapshot builds")
    }

    #[test]
    fn fact_table_keeps_every_order_line() {
        let snapshot = grocery_snapshot();
        let summary = snapshot.summary();

        assert_eq!(summary.order_lines, 23);
        assert_eq!(summary.unmatched_order_lines, 2);
        assert_eq!(summary.products, 6);
    }

    #[test]
    fn unknown_dimension_ids_leave_names_empty() {
        let snapshot = CatalogSnapshot::build(SourceTables {
            products: vec![product(1, "Mystery Item", 9, 9)],
            ..SourceTables::default()
        })
        .expect("snapshot builds");

        let item = snapshot.product_at(0).expect("catalog row");
        assert_eq!(item.aisle, None);
        assert_eq!(item.department, None);
    }

    #[test]
    fn name_lookup_is_trimmed_and_case_insensitive() {
        let snapshot = grocery_snapshot();

        let rows: Vec<usize> = snapshot.rows_matching("  bAnAnA ").collect();
        assert_eq!(rows, vec![0]);
        assert_eq!(snapshot.rows_matching("").count(), 0);

        let keys: BTreeSet<String> =
            ["whole milk", "bagels"].iter().map(|name| normalize_name(name)).collect();
        let rows: Vec<usize> = snapshot.rows_matching_any(&keys).collect();
        assert_eq!(rows, vec![2, 5]);
    }

    #[test]
    fn duplicate_names_resolve_to_their_first_row() {
        let snapshot = CatalogSnapshot::build(SourceTables {
            products: vec![
                product(1, "Banana", 24, 1),
                product(2, "Banana", 24, 2),
                product(3, "Apple", 24, 1),
            ],
            order_lines: vec![line(1, 2), line(2, 1)],
            ..SourceTables::default()
        })
        .expect("snapshot builds");

        assert_eq!(snapshot.first_row_named_like(1), Some(0));
        assert_eq!(snapshot.first_row_named_like(2), Some(2));
        assert_eq!(
            snapshot.first_product_named("Banana").map(|item| item.product.id),
            Some(ProductId(1))
        );
        let rows: Vec<Option<usize>> =
            snapshot.fact().iter().map(|line| line.catalog_row).collect();
        assert_eq!(rows, vec![Some(1), Some(0)]);
    }

    #[test]
    fn department_names_are_sorted_and_unique() {
        let snapshot = grocery_snapshot();
        assert_eq!(snapshot.department_names(), vec!["bakery", "dairy eggs", "produce"]);
    }
}
