//! Dataframe joins and group-bys behind [`crate::snapshot::CatalogSnapshot`].
//!
//! The typed tables stay the source of truth; polars only resolves keys. Every
//! function here returns positions into the slices it was given.

use polars::prelude::*;
use thiserror::Error;

use crate::domain::{
    order::OrderLine,
    product::{Aisle, Department, Product},
};

const CATALOG_ROW: &str = "catalog_row";
const LINE_ROW: &str = "line_row";
const NAME_ROW: &str = "name_row";
const ORDER_COUNT: &str = "order_count";

#[derive(Debug, Error)]
#[error("dataframe operation failed: {0}")]
pub struct FrameError(#[from] PolarsError);

/// Per catalog row, in catalog order.
#[derive(Debug, Default)]
pub(crate) struct CatalogColumns {
    pub aisle: Vec<Option<String>>,
    pub department: Vec<Option<String>>,
    /// First catalog row carrying the same display name.
    pub name_row: Vec<usize>,
}

fn product_frame(products: &[Product]) -> Result<LazyFrame, FrameError> {
    let frame = DataFrame::new(vec![
        Series::new("product_id", products.iter().map(|item| item.id.0).collect::<Vec<i32>>()),
        Series::new(
            "product_name",
            products.iter().map(|item| item.name.as_str()).collect::<Vec<&str>>(),
        ),
        Series::new(
            "aisle_id",
            products.iter().map(|item| i32::from(item.aisle_id.0)).collect::<Vec<i32>>(),
        ),
        Series::new(
            "department_id",
            products.iter().map(|item| i32::from(item.department_id.0)).collect::<Vec<i32>>(),
        ),
    ])?;
    Ok(frame.lazy().with_row_index(CATALOG_ROW, None))
}

/// `(key, name)` lookup keeping the first row per key.
fn name_lookup(
    key: &str,
    name: &str,
    ids: Vec<i32>,
    names: Vec<&str>,
) -> Result<LazyFrame, FrameError> {
    let frame = DataFrame::new(vec![Series::new(key, ids), Series::new(name, names)])?;
    Ok(frame.lazy().unique_stable(Some(vec![key.to_string()]), UniqueKeepStrategy::First))
}

/// Left-joins products to their aisle and department names.
///
/// Unknown ids leave the name empty. Duplicate aisle or department ids resolve
/// to the first row carrying that id.
pub(crate) fn join_catalog(
    products: &[Product],
    aisles: &[Aisle],
    departments: &[Department],
) -> Result<CatalogColumns, FrameError> {
    let aisle_names = name_lookup(
        "aisle_id",
        "aisle",
        aisles.iter().map(|aisle| i32::from(aisle.id.0)).collect(),
        aisles.iter().map(|aisle| aisle.name.as_str()).collect(),
    )?;
    let department_names = name_lookup(
        "department_id",
        "department",
        departments.iter().map(|department| i32::from(department.id.0)).collect(),
        departments.iter().map(|department| department.name.as_str()).collect(),
    )?;

    let catalog = product_frame(products)?;
    let first_by_name = catalog
        .clone()
        .select([col("product_name"), col(CATALOG_ROW).alias(NAME_ROW)])
        .unique_stable(Some(vec!["product_name".to_string()]), UniqueKeepStrategy::First);

    let joined = catalog
        .left_join(aisle_names, col("aisle_id"), col("aisle_id"))
        .left_join(department_names, col("department_id"), col("department_id"))
        .left_join(first_by_name, col("product_name"), col("product_name"))
        .sort([CATALOG_ROW], SortMultipleOptions::new())
        .collect()?;

    let aisle = joined
        .column("aisle")?
        .str()?
        .into_iter()
        .map(|name| name.map(str::to_string))
        .collect();
    let department = joined
        .column("department")?
        .str()?
        .into_iter()
        .map(|name| name.map(str::to_string))
        .collect();
    let name_row = joined
        .column(NAME_ROW)?
        .idx()?
        .into_iter()
        .enumerate()
        .map(|(row, first)| first.map_or(row, |first| first as usize))
        .collect();

    Ok(CatalogColumns { aisle, department, name_row })
}

/// Catalog row for each order line, `None` when its product id is unknown.
///
/// Duplicate product ids resolve to the first catalog row carrying that id.
pub(crate) fn join_order_lines(
    order_lines: &[OrderLine],
    products: &[Product],
) -> Result<Vec<Option<usize>>, FrameError> {
    let lines = DataFrame::new(vec![Series::new(
        "product_id",
        order_lines.iter().map(|line| line.product_id.0).collect::<Vec<i32>>(),
    )])?;
    let rows_by_id = product_frame(products)?
        .select([col("product_id"), col(CATALOG_ROW)])
        .unique_stable(Some(vec!["product_id".to_string()]), UniqueKeepStrategy::First);

    let joined = lines
        .lazy()
        .with_row_index(LINE_ROW, None)
        .left_join(rows_by_id, col("product_id"), col("product_id"))
        .sort([LINE_ROW], SortMultipleOptions::new())
        .collect()?;

    Ok(joined
        .column(CATALOG_ROW)?
        .idx()?
        .into_iter()
        .map(|row| row.map(|row| row as usize))
        .collect())
}

/// Occurrences of each value, most frequent first.
///
/// Ties keep the order in which values first appear.
pub(crate) fn value_counts(name_rows: Vec<u32>) -> Result<Vec<(usize, u64)>, FrameError> {
    let counted = DataFrame::new(vec![Series::new(NAME_ROW, name_rows)])?
        .lazy()
        .group_by_stable([col(NAME_ROW)])
        .agg([len().cast(DataType::UInt64).alias(ORDER_COUNT)])
        .sort(
            [ORDER_COUNT],
            SortMultipleOptions::new().with_order_descending(true).with_maintain_order(true),
        )
        .collect()?;

    let rows = counted.column(NAME_ROW)?.u32()?;
    let counts = counted.column(ORDER_COUNT)?.u64()?;
    Ok(rows
        .into_iter()
        .zip(counts)
        .filter_map(|(row, count)| Some((row? as usize, count?)))
        .collect())
}
