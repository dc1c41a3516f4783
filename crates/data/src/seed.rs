use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shelfscope_core::config::DataConfig;
use thiserror::Error;
use tracing::info;

use crate::records::{AisleRecord, DepartmentRecord, OrderLineRecord, ProductRecord};

const SEED_ORDER_COUNT: i32 = 60;

const DEPARTMENTS: &[(i8, &str)] =
    &[(3, "bakery"), (4, "produce"), (7, "beverages"), (16, "dairy eggs"), (19, "snacks")];

const AISLES: &[(i16, &str)] = &[
    (24, "fresh fruits"),
    (77, "soft drinks"),
    (83, "fresh vegetables"),
    (84, "milk"),
    (107, "chips pretzels"),
    (112, "bread"),
    (120, "yogurt"),
];

/// `(product_id, name, aisle_id, department_id, order lines)`.
const PRODUCTS: &[(i32, &str, i16, i8, i32)] = &[
    (1, "Banana", 24, 4, 40),
    (2, "Organic Banana", 24, 4, 34),
    (3, "Bag of Organic Bananas", 24, 4, 30),
    (4, "Organic Strawberries", 24, 4, 22),
    (5, "Organic Baby Spinach", 83, 4, 18),
    (6, "Whole Milk", 84, 16, 27),
    (7, "Organic Whole Milk", 84, 16, 12),
    (8, "Greek Yogurt", 120, 16, 9),
    (9, "Sourdough Bread", 112, 3, 15),
    (10, "Bagels", 112, 3, 8),
    (11, "Sparkling Water Grapefruit", 77, 7, 20),
    (12, "Lime Sparkling Water", 77, 7, 14),
    (13, "Sea Salt Potato Chips", 107, 19, 11),
    (14, "Pretzel Crisps", 107, 19, 6),
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not create seed directory `{path}`: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("could not write seed table `{path}`: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub dir: PathBuf,
    pub orders: usize,
    pub order_lines: usize,
    pub products: usize,
    pub aisles: usize,
    pub departments: usize,
}

/// Orders as exported upstream, including columns the loader ignores.
#[derive(Serialize)]
struct SeedOrderRow {
    order_id: i32,
    user_id: i32,
    eval_set: &'static str,
    order_number: i16,
    order_dow: i8,
    order_hour_of_day: i8,
    days_since_prior_order: Option<f32>,
}

/// Writes the demo dataset into `config.dir` using the configured file names.
///
/// Output depends only on the constants above, so repeated runs produce
/// byte-identical files.
pub fn write_demo_dataset(config: &DataConfig) -> Result<SeedReport, SeedError> {
    fs::create_dir_all(&config.dir)
        .map_err(|source| SeedError::CreateDir { path: config.dir.clone(), source })?;

    let orders: Vec<SeedOrderRow> = (1..=SEED_ORDER_COUNT)
        .map(|order_id| SeedOrderRow {
            order_id,
            user_id: order_id % 12 + 1,
            eval_set: "prior",
            order_number: (order_id / 12 + 1) as i16,
            order_dow: (order_id % 7) as i8,
            order_hour_of_day: (8 + order_id % 12) as i8,
            days_since_prior_order: (order_id > 12).then_some(7.0),
        })
        .collect();

    let order_lines: Vec<OrderLineRecord> = PRODUCTS
        .iter()
        .flat_map(|(product_id, _, _, _, lines)| {
            (0..*lines).map(move |slot| OrderLineRecord {
                order_id: (slot * 7 + product_id) % SEED_ORDER_COUNT + 1,
                product_id: *product_id,
                add_to_cart_order: (slot % 5 + 1) as i16,
                reordered: i8::from(slot % 3 == 0),
            })
        })
        .collect();

    let products: Vec<ProductRecord> = PRODUCTS
        .iter()
        .map(|(product_id, name, aisle_id, department_id, _)| ProductRecord {
            product_id: *product_id,
            product_name: (*name).to_string(),
            aisle_id: *aisle_id,
            department_id: *department_id,
        })
        .collect();

    let aisles: Vec<AisleRecord> = AISLES
        .iter()
        .map(|(aisle_id, name)| AisleRecord { aisle_id: *aisle_id, aisle: (*name).to_string() })
        .collect();

    let departments: Vec<DepartmentRecord> = DEPARTMENTS
        .iter()
        .map(|(department_id, name)| DepartmentRecord {
            department_id: *department_id,
            department: (*name).to_string(),
        })
        .collect();

    write_table(&config.orders_path(), &orders)?;
    write_table(&config.order_lines_path(), &order_lines)?;
    write_table(&config.products_path(), &products)?;
    write_table(&config.aisles_path(), &aisles)?;
    write_table(&config.departments_path(), &departments)?;

    let report = SeedReport {
        dir: config.dir.clone(),
        orders: orders.len(),
        order_lines: order_lines.len(),
        products: products.len(),
        aisles: aisles.len(),
        departments: departments.len(),
    };
    info!(
        event_name = "data.seed.complete",
        dir = %report.dir.display(),
        order_lines = report.order_lines,
        "demo dataset written"
    );
    Ok(report)
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), SeedError> {
    let to_error = |source| SeedError::Write { path: path.to_path_buf(), source };

    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    for row in rows {
        writer.serialize(row).map_err(to_error)?;
    }
    writer.flush().map_err(|source| to_error(csv::Error::from(source)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use shelfscope_core::config::DataConfig;
    use tempfile::TempDir;

    use super::write_demo_dataset;

    #[test]
    fn writes_all_five_tables() {
        let dir = TempDir::new().expect("tempdir");
        let config = DataConfig::default().with_dir(dir.path());

        let report = write_demo_dataset(&config).expect("seed");
        assert_eq!(report.orders, 60);
        assert_eq!(report.products, 14);
        assert_eq!(report.departments, 5);
        assert_eq!(report.order_lines, 266);

        for path in [
            config.orders_path(),
            config.order_lines_path(),
            config.products_path(),
            config.aisles_path(),
            config.departments_path(),
        ] {
            assert!(path.exists(), "{} should exist", path.display());
        }

        let header = fs::read_to_string(config.orders_path()).expect("orders");
        assert!(header.starts_with(
            "order_id,user_id,eval_set,order_number,order_dow,order_hour_of_day,days_since_prior_order"
        ));
    }

    #[test]
    fn reseeding_is_byte_identical() {
        let dir = TempDir::new().expect("tempdir");
        let config = DataConfig::default().with_dir(dir.path());

        write_demo_dataset(&config).expect("first seed");
        let first = fs::read(config.order_lines_path()).expect("read");
        write_demo_dataset(&config).expect("second seed");
        let second = fs::read(config.order_lines_path()).expect("read");

        assert_eq!(first, second);
    }
}
