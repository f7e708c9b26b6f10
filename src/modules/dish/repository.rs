use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgExecutor};
use ulid::Ulid;

/// A selectable choice under a dish option, optionally carrying its own
/// surcharge.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DishChoice {
    pub name: String,
    pub extra: Option<BigDecimal>,
}

/// A customization a dish offers. An option either carries a flat surcharge
/// itself or defers to the surcharges of its choices.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DishOption {
    pub name: String,
    pub extra: Option<BigDecimal>,
    pub choices: Option<Vec<DishChoice>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub photo: Option<String>,
    pub restaurant_id: String,
    pub options: Json<Vec<DishOption>>,
}

pub struct CreateDishPayload {
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub photo: Option<String>,
    pub restaurant_id: String,
    pub options: Vec<DishOption>,
}

#[derive(Default)]
pub struct UpdateDishPayload {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub options: Option<Vec<DishOption>>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateDishPayload) -> Result<Dish, Error> {
    sqlx::query_as::<_, Dish>(
        "
        INSERT INTO dishes (id, name, price, description, photo, restaurant_id, options)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.description)
    .bind(payload.photo)
    .bind(payload.restaurant_id)
    .bind(Json(payload.options))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to create a dish: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Dish>, Error> {
    sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch dish by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_many_by_restaurant_id<'e, E: PgExecutor<'e>>(
    e: E,
    restaurant_id: String,
) -> Result<Vec<Dish>, Error> {
    sqlx::query_as::<_, Dish>("SELECT * FROM dishes WHERE restaurant_id = $1 ORDER BY name")
        .bind(restaurant_id)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch dishes by restaurant: {}", err);
            Error::UnexpectedError
        })
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateDishPayload,
) -> Result<Dish, Error> {
    sqlx::query_as::<_, Dish>(
        "
        UPDATE dishes SET
            name = COALESCE($2, name),
            price = COALESCE($3, price),
            description = COALESCE($4, description),
            photo = COALESCE($5, photo),
            options = COALESCE($6, options)
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.description)
    .bind(payload.photo)
    .bind(payload.options.map(Json))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to update dish: {}", err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<(), Error> {
    sqlx::query("DELETE FROM dishes WHERE id = $1")
        .bind(id)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while trying to delete dish: {}", err);
            Error::UnexpectedError
        })
}
