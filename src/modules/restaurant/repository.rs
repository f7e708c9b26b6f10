use crate::utils::pagination::{Paginated, Pagination};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub cover_image: Option<String>,
    pub owner_id: String,
    pub category_id: Option<String>,
    pub is_promoted: bool,
    pub promoted_until: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateRestaurantPayload {
    pub name: String,
    pub address: String,
    pub cover_image: Option<String>,
    pub owner_id: String,
    pub category_id: String,
}

#[derive(Default)]
pub struct UpdateRestaurantPayload {
    pub name: Option<String>,
    pub address: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateRestaurantPayload,
) -> Result<Restaurant, Error> {
    sqlx::query_as::<_, Restaurant>(
        "
        INSERT INTO restaurants (id, name, address, cover_image, owner_id, category_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.address)
    .bind(payload.cover_image)
    .bind(payload.owner_id)
    .bind(payload.category_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create a restaurant: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
) -> Result<Option<Restaurant>, Error> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch restaurant by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
) -> Result<Paginated<Restaurant>, Error> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM restaurants")
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to count restaurants: {}", err);
            Error::UnexpectedError
        })?;

    let restaurants = sqlx::query_as::<_, Restaurant>(
        "
        SELECT * FROM restaurants
        ORDER BY is_promoted DESC, created_at DESC
        LIMIT $1 OFFSET $2
        ",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch restaurants: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        restaurants,
        total as u32,
        pagination.page,
        pagination.per_page,
    ))
}

pub async fn search_by_name<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    query: String,
    pagination: Pagination,
) -> Result<Paginated<Restaurant>, Error> {
    let pattern = format!("%{}%", query);

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM restaurants WHERE name ILIKE $1")
            .bind(pattern.clone())
            .fetch_one(e)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while trying to count restaurants: {}", err);
                Error::UnexpectedError
            })?;

    let restaurants = sqlx::query_as::<_, Restaurant>(
        "
        SELECT * FROM restaurants
        WHERE name ILIKE $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(pattern)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to search restaurants: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        restaurants,
        total as u32,
        pagination.page,
        pagination.per_page,
    ))
}

pub async fn find_many_by_owner_id<'e, E: PgExecutor<'e>>(
    e: E,
    owner_id: String,
) -> Result<Vec<Restaurant>, Error> {
    sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch restaurants by owner: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_many_by_category_id<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    category_id: String,
    pagination: Pagination,
) -> Result<Paginated<Restaurant>, Error> {
    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM restaurants WHERE category_id = $1")
            .bind(category_id.clone())
            .fetch_one(e)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while trying to count restaurants: {}", err);
                Error::UnexpectedError
            })?;

    let restaurants = sqlx::query_as::<_, Restaurant>(
        "
        SELECT * FROM restaurants
        WHERE category_id = $1
        ORDER BY is_promoted DESC, created_at DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(category_id)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch restaurants by category: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        restaurants,
        total as u32,
        pagination.page,
        pagination.per_page,
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateRestaurantPayload,
) -> Result<Restaurant, Error> {
    sqlx::query_as::<_, Restaurant>(
        "
        UPDATE restaurants SET
            name = COALESCE($2, name),
            address = COALESCE($3, address),
            cover_image = COALESCE($4, cover_image),
            category_id = COALESCE($5, category_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.address)
    .bind(payload.cover_image)
    .bind(payload.category_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to update restaurant: {}", err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<(), Error> {
    sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while trying to delete restaurant: {}", err);
            Error::UnexpectedError
        })
}
