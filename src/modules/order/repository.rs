use crate::modules::user::repository::Role;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgExecutor};
use std::str::FromStr;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    #[sqlx(rename = "PENDING")]
    Pending,
    #[serde(rename = "COOKING")]
    #[sqlx(rename = "COOKING")]
    Cooking,
    #[serde(rename = "COOKED")]
    #[sqlx(rename = "COOKED")]
    Cooked,
    #[serde(rename = "PICKED_UP")]
    #[sqlx(rename = "PICKED_UP")]
    PickedUp,
    #[serde(rename = "DELIVERED")]
    #[sqlx(rename = "DELIVERED")]
    Delivered,
}

impl ToString for OrderStatus {
    fn to_string(&self) -> String {
        match self {
            OrderStatus::Pending => String::from("PENDING"),
            OrderStatus::Cooking => String::from("COOKING"),
            OrderStatus::Cooked => String::from("COOKED"),
            OrderStatus::PickedUp => String::from("PICKED_UP"),
            OrderStatus::Delivered => String::from("DELIVERED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "COOKING" => Ok(OrderStatus::Cooking),
            "COOKED" => Ok(OrderStatus::Cooked),
            "PICKED_UP" => Ok(OrderStatus::PickedUp),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            _ => Err(format!("'{}' is not a valid OrderStatus", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub customer_id: Option<String>,
    pub driver_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A chosen customization on an ordered item, by name.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderItemOption {
    pub name: String,
    pub choice: Option<String>,
}

/// Snapshot of a dish at the moment it was ordered. Later menu edits don't
/// rewrite history.
#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub dish_id: Option<String>,
    pub dish_name: String,
    pub unit_price: BigDecimal,
    pub options: Json<Vec<OrderItemOption>>,
}

pub struct CreateOrderPayload {
    pub customer_id: String,
    pub restaurant_id: String,
    pub total: BigDecimal,
}

pub struct CreateOrderItemPayload {
    pub order_id: String,
    pub dish_id: String,
    pub dish_name: String,
    pub unit_price: BigDecimal,
    pub options: Vec<OrderItemOption>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateOrderPayload,
) -> Result<Order, Error> {
    sqlx::query_as::<_, Order>(
        "
        INSERT INTO orders (id, customer_id, restaurant_id, total)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.customer_id)
    .bind(payload.restaurant_id)
    .bind(payload.total)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create an order: {}", err);
        Error::UnexpectedError
    })
}

pub async fn create_item<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateOrderItemPayload,
) -> Result<OrderItem, Error> {
    sqlx::query_as::<_, OrderItem>(
        "
        INSERT INTO order_items (id, order_id, dish_id, dish_name, unit_price, options)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.order_id)
    .bind(payload.dish_id)
    .bind(payload.dish_name)
    .bind(payload.unit_price)
    .bind(Json(payload.options))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create an order item: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Order>, Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch order by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_items_by_order_id<'e, E: PgExecutor<'e>>(
    e: E,
    order_id: String,
) -> Result<Vec<OrderItem>, Error> {
    sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch order items: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_many_for_customer<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: String,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, Error> {
    sqlx::query_as::<_, Order>(
        "
        SELECT * FROM orders
        WHERE customer_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC
        ",
    )
    .bind(customer_id)
    .bind(status.map(|s| s.to_string()))
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch orders for customer: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_many_for_driver<'e, E: PgExecutor<'e>>(
    e: E,
    driver_id: String,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, Error> {
    sqlx::query_as::<_, Order>(
        "
        SELECT * FROM orders
        WHERE driver_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC
        ",
    )
    .bind(driver_id)
    .bind(status.map(|s| s.to_string()))
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch orders for driver: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_many_for_owner<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, Error> {
    sqlx::query_as::<_, Order>(
        "
        SELECT o.* FROM orders o
        JOIN restaurants r ON r.id = o.restaurant_id
        WHERE r.owner_id = $1 AND ($2::TEXT IS NULL OR o.status = $2)
        ORDER BY o.created_at DESC
        ",
    )
    .bind(owner_id)
    .bind(status.map(|s| s.to_string()))
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch orders for owner: {}", err);
        Error::UnexpectedError
    })
}

pub async fn update_status<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    status: OrderStatus,
) -> Result<Order, Error> {
    sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to update order status: {}", err);
        Error::UnexpectedError
    })
}

/// Assigns a driver to an order that has none yet. Returns `None` when the
/// order was already claimed by another driver.
pub async fn set_driver<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    driver_id: String,
) -> Result<Option<Order>, Error> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET driver_id = $2, updated_at = NOW()
        WHERE id = $1 AND driver_id IS NULL
        RETURNING *
        ",
    )
    .bind(id)
    .bind(driver_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to assign a driver: {}", err);
        Error::UnexpectedError
    })
}

/// Whether a user is a party to an order: its customer, its driver, or the
/// owner of the restaurant it was placed against.
pub fn can_access(user_id: &str, order: &Order, restaurant_owner_id: Option<&str>) -> bool {
    order.customer_id.as_deref() == Some(user_id)
        || order.driver_id.as_deref() == Some(user_id)
        || restaurant_owner_id == Some(user_id)
}

/// Which statuses each role is allowed to move an order into.
pub fn allowed_status_change(role: Role, status: OrderStatus) -> bool {
    match role {
        Role::Owner => matches!(status, OrderStatus::Cooking | OrderStatus::Cooked),
        Role::Delivery => matches!(status, OrderStatus::PickedUp | OrderStatus::Delivered),
        Role::Client => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn order(customer: Option<&str>, driver: Option<&str>) -> Order {
        Order {
            id: String::from("01HZX0000000000000000000G0"),
            customer_id: customer.map(String::from),
            driver_id: driver.map(String::from),
            restaurant_id: Some(String::from("01HZX0000000000000000000R0")),
            total: BigDecimal::from(10),
            status: OrderStatus::Pending,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn parties_to_an_order_can_access_it() {
        let order = order(Some("customer"), Some("driver"));
        assert!(can_access("customer", &order, Some("owner")));
        assert!(can_access("driver", &order, Some("owner")));
        assert!(can_access("owner", &order, Some("owner")));
    }

    #[test]
    fn strangers_cannot_access_an_order() {
        let order = order(Some("customer"), None);
        assert!(!can_access("someone-else", &order, Some("owner")));
        assert!(!can_access("someone-else", &order, None));
    }

    #[test]
    fn owners_only_move_orders_through_the_kitchen() {
        assert!(allowed_status_change(Role::Owner, OrderStatus::Cooking));
        assert!(allowed_status_change(Role::Owner, OrderStatus::Cooked));
        assert!(!allowed_status_change(Role::Owner, OrderStatus::PickedUp));
        assert!(!allowed_status_change(Role::Owner, OrderStatus::Delivered));
    }

    #[test]
    fn drivers_only_move_orders_on_the_road() {
        assert!(allowed_status_change(Role::Delivery, OrderStatus::PickedUp));
        assert!(allowed_status_change(Role::Delivery, OrderStatus::Delivered));
        assert!(!allowed_status_change(Role::Delivery, OrderStatus::Cooking));
    }

    #[test]
    fn clients_never_change_order_status() {
        assert!(!allowed_status_change(Role::Client, OrderStatus::Cooking));
        assert!(!allowed_status_change(Role::Client, OrderStatus::Delivered));
    }
}
