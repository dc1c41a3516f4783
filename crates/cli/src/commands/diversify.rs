use serde::Serialize;
use shelfscope_core::analytics::{parse_owned_products, Recommendation};

use crate::commands::{CommandContext, CommandResult};
use crate::render;

#[derive(Debug, Serialize)]
struct DiversifyPayload<'a> {
    command: &'static str,
    status: &'static str,
    owned_products: &'a [String],
    recommendations: &'a [Recommendation],
}

/// `owned` is the raw comma separated product list typed by the seller.
pub fn run(
    context: &CommandContext,
    owned: &str,
    limit: Option<usize>,
    per_department: Option<usize>,
    json: bool,
) -> CommandResult {
    let dashboard = match context.open_dashboard("diversify") {
        Ok(dashboard) => dashboard,
        Err(result) => return result,
    };

    let owned_products = parse_owned_products(owned);
    let recommendations =
        match dashboard.recommend_new_categories(&owned_products, limit, per_department) {
            Ok(recommendations) => recommendations,
            Err(error) => {
                return CommandResult::from_application_error(
                    "diversify",
                    error,
                    &context.correlation_id,
                )
            }
        };

    if json {
        return CommandResult::json(
            "diversify",
            &DiversifyPayload {
                command: "diversify",
                status: "ok",
                owned_products: &owned_products,
                recommendations: &recommendations,
            },
        );
    }

    if recommendations.is_empty() {
        return CommandResult::text(
            "No recommendations found. The listed products may be unknown, or you already sell in every department.",
        );
    }

    let rows: Vec<Vec<String>> = recommendations
        .iter()
        .map(|row| {
            vec![
                row.product_name.clone(),
                row.department.clone(),
                row.order_count.to_string(),
                row.competition.to_string(),
            ]
        })
        .collect();
    CommandResult::text(format!(
        "Top products in departments you have not entered yet\n\n{}",
        render::table(&["product", "department", "orders", "competition"], &rows)
    ))
}
