pub mod request {
    use crate::modules::order::repository::OrderItemOption;
    use serde::{Deserialize, Serialize};
    use validator::Validate;

    // The length validator reports the offending value back, so items must
    // serialize as well.
    #[derive(Serialize, Deserialize)]
    pub struct Item {
        pub dish_id: String,
        #[serde(default)]
        pub options: Vec<OrderItemOption>,
    }

    #[derive(Deserialize, Validate)]
    pub struct Payload {
        pub restaurant_id: String,
        #[validate(length(min = 1))]
        pub items: Vec<Item>,
    }
}

pub mod response {
    use crate::modules::order::repository::{Order, OrderItem};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        OrderCreated(Order, Vec<OrderItem>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderCreated(order, items) => (
                    StatusCode::CREATED,
                    Json(json!({ "order": order, "items": items })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        RestaurantNotFound,
        DishNotFound(String),
        FailedToCreateOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => {
                    crate::utils::validation::into_response(errors).into_response()
                }
                Self::RestaurantNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Restaurant not found" })),
                )
                    .into_response(),
                Self::DishNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": format!("Dish not found: {}", id) })),
                )
                    .into_response(),
                Self::FailedToCreateOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Could not create order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

#[cfg(test)]
mod tests {
    use super::request;
    use validator::Validate;

    #[test]
    fn an_order_needs_at_least_one_item() {
        let payload = request::Payload {
            restaurant_id: "01HZX0000000000000000000R0".to_string(),
            items: vec![],
        };

        assert!(payload.validate().is_err());
    }

    #[test]
    fn a_single_item_order_is_valid() {
        let payload = request::Payload {
            restaurant_id: "01HZX0000000000000000000R0".to_string(),
            items: vec![request::Item {
                dish_id: "01HZX0000000000000000000D0".to_string(),
                options: vec![],
            }],
        };

        assert!(payload.validate().is_ok());
    }
}
