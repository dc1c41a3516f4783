use serde::Serialize;
use shelfscope_core::analytics::LabeledTrendingProduct;

use crate::commands::{CommandContext, CommandResult};
use crate::render;

const CHART_WIDTH: usize = 40;

#[derive(Debug, Serialize)]
struct TrendingPayload<'a> {
    command: &'static str,
    status: &'static str,
    products: &'a [LabeledTrendingProduct],
}

pub fn run(
    context: &CommandContext,
    limit: Option<usize>,
    json: bool,
    chart: bool,
) -> CommandResult {
    let dashboard = match context.open_dashboard("trending") {
        Ok(dashboard) => dashboard,
        Err(result) => return result,
    };

    let products = match dashboard.list_trending(limit) {
        Ok(products) => products,
        Err(error) => {
            return CommandResult::from_application_error(
                "trending",
                error,
                &context.correlation_id,
            )
        }
    };

    if json {
        return CommandResult::json(
            "trending",
            &TrendingPayload { command: "trending", status: "ok", products: &products },
        );
    }

    let mut output = vec![
        format!("Top {} products across the marketplace", products.len()),
        String::new(),
        render_table(&products),
    ];
    if chart && !products.is_empty() {
        let entries: Vec<(String, u64)> = products
            .iter()
            .map(|item| (item.product.product_name.clone(), item.product.order_count))
            .collect();
        output.push(String::new());
        output.push(render::bar_chart(&entries, CHART_WIDTH));
    }
    CommandResult::text(output.join("\n"))
}

fn render_table(products: &[LabeledTrendingProduct]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|item| {
            vec![
                item.product.product_name.clone(),
                render::optional(item.product.department.as_deref()),
                render::optional(item.product.aisle.as_deref()),
                item.product.order_count.to_string(),
                item.competition.to_string(),
            ]
        })
        .collect();
    render::table(&["product", "department", "aisle", "orders", "competition"], &rows)
}
