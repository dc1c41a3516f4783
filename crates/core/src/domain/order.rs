use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i32);

/// A purchase event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_number: i16,
    pub day_of_week: i8,
    pub hour_of_day: i8,
}

/// One product purchased within an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub add_to_cart_order: i16,
    pub reordered: bool,
}

/// An order line joined against the catalog.
///
/// `catalog_row` is `None` when the line references a product that is not in
/// the catalog; such lines are kept so the fact table row count always equals
/// the order line row count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedOrderLine {
    pub line: OrderLine,
    pub catalog_row: Option<usize>,
}
