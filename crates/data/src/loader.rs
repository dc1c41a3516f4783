use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use shelfscope_core::{
    config::{AnalyticsConfig, DataConfig},
    dashboard::Dashboard,
    frames::FrameError,
    snapshot::{CatalogSnapshot, SourceTables},
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::records::{AisleRecord, DepartmentRecord, OrderLineRecord, OrderRecord, ProductRecord};

/// The single error surfaced when any table fails to load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {table} table `{path}`: {source}")]
    Open { table: &'static str, path: PathBuf, source: csv::Error },
    #[error("could not read {table} table `{path}`: {source}")]
    Parse { table: &'static str, path: PathBuf, source: csv::Error },
    #[error("could not join tables under `{dir}`: {source}")]
    Join { dir: PathBuf, source: FrameError },
}

impl LoadError {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Open { table, .. } | Self::Parse { table, .. } => table,
            Self::Join { .. } => "catalog",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Parse { path, .. } => path,
            Self::Join { dir, .. } => dir,
        }
    }
}

/// Reads one CSV table into typed rows. Header-based, extra columns ignored.
pub fn read_table<R, T>(table: &'static str, path: &Path) -> Result<Vec<T>, LoadError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| LoadError::Open { table, path: path.to_path_buf(), source })?;

    let rows = reader
        .deserialize::<R>()
        .map(|record| record.map(T::from))
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Parse { table, path: path.to_path_buf(), source })?;

    debug!(
        event_name = "data.load.table",
        table,
        rows = rows.len(),
        path = %path.display(),
        "table read"
    );
    Ok(rows)
}

pub fn load_tables(config: &DataConfig) -> Result<SourceTables, LoadError> {
    Ok(SourceTables {
        orders: read_table::<OrderRecord, _>("orders", &config.orders_path())?,
        order_lines: read_table::<OrderLineRecord, _>("order lines", &config.order_lines_path())?,
        products: read_table::<ProductRecord, _>("products", &config.products_path())?,
        aisles: read_table::<AisleRecord, _>("aisles", &config.aisles_path())?,
        departments: read_table::<DepartmentRecord, _>(
            "departments",
            &config.departments_path(),
        )?,
    })
}

/// Reads all five tables and builds the joined snapshot.
pub fn load_snapshot(config: &DataConfig) -> Result<CatalogSnapshot, LoadError> {
    info!(event_name = "data.load.start", dir = %config.dir.display(), "loading dataset");

    let loaded = load_tables(config).and_then(|tables| {
        CatalogSnapshot::build(tables)
            .map_err(|source| LoadError::Join { dir: config.dir.clone(), source })
    });

    match loaded {
        Ok(snapshot) => {
            let summary = snapshot.summary();
            info!(
                event_name = "data.load.complete",
                orders = summary.orders,
                order_lines = summary.order_lines,
                products = summary.products,
                aisles = summary.aisles,
                departments = summary.departments,
                "dataset loaded"
            );
            Ok(snapshot)
        }
        Err(load_error) => {
            error!(
                event_name = "data.load.failed",
                table = load_error.table(),
                path = %load_error.path().display(),
                error = %load_error,
                "dataset load failed"
            );
            Err(load_error)
        }
    }
}

/// Loads the dataset and wraps the outcome; a failure leaves the dashboard unavailable.
pub fn open_dashboard(data: &DataConfig, limits: AnalyticsConfig) -> Dashboard {
    Dashboard::from_load(load_snapshot(data), limits)
}
