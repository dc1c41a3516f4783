use serde::Serialize;
use shelfscope_core::analytics::{SimilarProduct, SimilarityLookup};

use crate::commands::{CommandContext, CommandResult};
use crate::render;

#[derive(Debug, Serialize)]
struct SimilarPayload<'a> {
    command: &'static str,
    status: &'static str,
    product: &'a str,
    products: &'a [SimilarProduct],
}

pub fn run(
    context: &CommandContext,
    product: &str,
    limit: Option<usize>,
    json: bool,
) -> CommandResult {
    let dashboard = match context.open_dashboard("similar") {
        Ok(dashboard) => dashboard,
        Err(result) => return result,
    };

    let lookup = match dashboard.find_similar_products(product, limit) {
        Ok(lookup) => lookup,
        Err(error) => {
            return CommandResult::from_application_error("similar", error, &context.correlation_id)
        }
    };

    let (status, products): (&'static str, &[SimilarProduct]) = match &lookup {
        SimilarityLookup::Found(products) => ("ok", products.as_slice()),
        SimilarityLookup::NotFound => ("not_found", &[][..]),
    };

    if json {
        return CommandResult::json(
            "similar",
            &SimilarPayload { command: "similar", status, product, products },
        );
    }

    if matches!(lookup, SimilarityLookup::NotFound) {
        return CommandResult::text(format!("Product \"{product}\" was not found in the catalog."));
    }

    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|item| {
            vec![
                item.product_name.clone(),
                render::optional(item.aisle.as_deref()),
                render::optional(item.department.as_deref()),
                format!("{:.2}", item.similarity_score),
            ]
        })
        .collect();
    CommandResult::text(format!(
        "Products similar to {product}\n\n{}",
        render::table(&["product", "aisle", "department", "similarity"], &rows)
    ))
}
