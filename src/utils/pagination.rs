use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginatedMeta,
}

#[derive(Serialize, Clone)]
pub struct PaginatedMeta {
    pub total: u32,
    pub total_pages: u32,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u32, page: u32, per_page: u32) -> Paginated<T> {
        Self {
            items,
            meta: PaginatedMeta {
                total,
                total_pages: total.div_ceil(per_page.max(1)),
                page,
                per_page,
            },
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        // Both values come straight from the query string, so widen before
        // multiplying.
        (self.page.max(1) as i64 - 1) * self.per_page as i64
    }
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extract::<Query<Pagination>>().await {
            Ok(Query(pagination)) => Ok(pagination),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid pagination options" })),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let paginated = Paginated::new(vec![1, 2, 3], 11, 1, 5);
        assert_eq!(paginated.meta.total_pages, 3);
    }

    #[test]
    fn offset_is_zero_based() {
        let pagination = Pagination { page: 3, per_page: 5 };
        assert_eq!(pagination.offset(), 10);
        assert_eq!(pagination.limit(), 5);
    }

    #[test]
    #[allow(arithmetic_overflow)]
    fn offset_survives_extreme_page_numbers() {
        let pagination = Pagination {
            page: u32::MAX,
            per_page: u32::MAX,
        };

        assert_eq!(
            pagination.offset(),
            (u32::MAX as i64 - 1) * u32::MAX as i64
        );
    }
}
