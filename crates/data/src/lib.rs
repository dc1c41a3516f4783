pub mod loader;
pub mod records;
pub mod seed;

pub use loader::{load_snapshot, load_tables, open_dashboard, read_table, LoadError};
pub use seed::{write_demo_dataset, SeedError, SeedReport};
