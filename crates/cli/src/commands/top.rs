use serde::Serialize;
use shelfscope_core::analytics::LeaderboardRow;

use crate::commands::{CommandContext, CommandResult};
use crate::render;

#[derive(Debug, Serialize)]
struct LeaderboardPayload<'a> {
    command: &'static str,
    status: &'static str,
    department: &'a str,
    products: &'a [LeaderboardRow],
}

/// Department leaderboard. The department must match a stored name exactly.
pub fn run(
    context: &CommandContext,
    department: &str,
    limit: Option<usize>,
    json: bool,
) -> CommandResult {
    let dashboard = match context.open_dashboard("top") {
        Ok(dashboard) => dashboard,
        Err(result) => return result,
    };

    let rows = match dashboard.list_top_by_department(department, limit) {
        Ok(rows) => rows,
        Err(error) => {
            return CommandResult::from_application_error("top", error, &context.correlation_id)
        }
    };

    if json {
        return CommandResult::json(
            "top",
            &LeaderboardPayload { command: "top", status: "ok", department, products: &rows },
        );
    }

    if rows.is_empty() {
        return CommandResult::text(format!(
            "No orders found for department `{department}`. Run `shelfscope departments` to list valid names."
        ));
    }

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![row.product_name.clone(), row.order_count.to_string(), row.competition.to_string()]
        })
        .collect();
    CommandResult::text(format!(
        "Best sellers in {department}\n\n{}",
        render::table(&["product", "orders", "competition"], &table_rows)
    ))
}
