use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Verification {
    pub id: String,
    pub code: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

/// Creates a fresh one-time code for the user, replacing any outstanding one.
pub async fn create_for_user<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
) -> Result<Verification, Error> {
    sqlx::query_as::<_, Verification>(
        "
        INSERT INTO verifications (id, code, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id)
        DO UPDATE SET code = EXCLUDED.code, created_at = NOW()
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(Ulid::new().to_string())
    .bind(user_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to create a verification: {}",
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_code<'e, E: PgExecutor<'e>>(
    e: E,
    code: String,
) -> Result<Option<Verification>, Error> {
    sqlx::query_as::<_, Verification>("SELECT * FROM verifications WHERE code = $1")
        .bind(code)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to fetch verification by code: {}",
                err
            );
            Error::UnexpectedError
        })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<(), Error> {
    sqlx::query("DELETE FROM verifications WHERE id = $1")
        .bind(id)
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to delete verification: {}",
                err
            );
            Error::UnexpectedError
        })
}
