use std::path::PathBuf;

use shelfscope_data::write_demo_dataset;

use crate::commands::{CommandContext, CommandResult};

/// Writes the deterministic demo dataset, to `dir` or the configured data dir.
pub fn run(context: &CommandContext, dir: Option<PathBuf>) -> CommandResult {
    let config = match context.load_config("seed") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let data = match dir {
        Some(dir) => config.data.with_dir(dir),
        None => config.data,
    };

    match write_demo_dataset(&data) {
        Ok(report) => CommandResult::success(
            "seed",
            format!(
                "demo dataset written to {}: {} orders, {} order lines, {} products, {} aisles, {} departments",
                report.dir.display(),
                report.orders,
                report.order_lines,
                report.products,
                report.aisles,
                report.departments
            ),
        ),
        Err(error) => CommandResult::failure("seed", "seed_write", error.to_string(), 5),
    }
}
