//! Row shapes of the five CSV tables, with compact numeric typing.
//!
//! Columns not named here are ignored when reading.

use serde::{Deserialize, Serialize};
use shelfscope_core::domain::{
    order::{Order, OrderId, OrderLine, UserId},
    product::{Aisle, AisleId, Department, DepartmentId, Product, ProductId},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: i32,
    pub user_id: i32,
    pub order_number: i16,
    pub order_dow: i8,
    pub order_hour_of_day: i8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub order_id: i32,
    pub product_id: i32,
    pub add_to_cart_order: i16,
    pub reordered: i8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: i32,
    pub product_name: String,
    pub aisle_id: i16,
    pub department_id: i8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AisleRecord {
    pub aisle_id: i16,
    pub aisle: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub department_id: i8,
    pub department: String,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: OrderId(record.order_id),
            user_id: UserId(record.user_id),
            order_number: record.order_number,
            day_of_week: record.order_dow,
            hour_of_day: record.order_hour_of_day,
        }
    }
}

impl From<OrderLineRecord> for OrderLine {
    fn from(record: OrderLineRecord) -> Self {
        Self {
            order_id: OrderId(record.order_id),
            product_id: ProductId(record.product_id),
            add_to_cart_order: record.add_to_cart_order,
            reordered: record.reordered != 0,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: ProductId(record.product_id),
            name: record.product_name,
            aisle_id: AisleId(record.aisle_id),
            department_id: DepartmentId(record.department_id),
        }
    }
}

impl From<AisleRecord> for Aisle {
    fn from(record: AisleRecord) -> Self {
        Self { id: AisleId(record.aisle_id), name: record.aisle }
    }
}

impl From<DepartmentRecord> for Department {
    fn from(record: DepartmentRecord) -> Self {
        Self { id: DepartmentId(record.department_id), name: record.department }
    }
}
