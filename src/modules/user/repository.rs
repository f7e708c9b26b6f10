use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::str::FromStr;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
pub enum Role {
    #[serde(rename = "OWNER")]
    #[sqlx(rename = "OWNER")]
    Owner,
    #[serde(rename = "CLIENT")]
    #[sqlx(rename = "CLIENT")]
    Client,
    #[serde(rename = "DELIVERY")]
    #[sqlx(rename = "DELIVERY")]
    Delivery,
}

impl ToString for Role {
    fn to_string(&self) -> String {
        match self {
            Role::Owner => String::from("OWNER"),
            Role::Client => String::from("CLIENT"),
            Role::Delivery => String::from("DELIVERY"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Role::Owner),
            "CLIENT" => Ok(Role::Client),
            "DELIVERY" => Ok(Role::Delivery),
            _ => Err(format!("'{}' is not a valid Role", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateUserPayload {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Default)]
pub struct UpdateUserPayload {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_verified: Option<bool>,
}

#[derive(Debug)]
pub enum Error {
    DuplicateEmail,
    UnexpectedError,
}

/// A pre-flight existence check still races with a concurrent insert, so the
/// unique index on email is the authority.
fn map_write_error(err: sqlx::Error) -> Error {
    if err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        return Error::DuplicateEmail;
    }

    tracing::error!("Error occurred while trying to write a user: {}", err);
    Error::UnexpectedError
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateUserPayload) -> Result<User, Error> {
    sqlx::query_as::<_, User>(
        "
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.email)
    .bind(payload.password_hash)
    .bind(payload.role)
    .fetch_one(e)
    .await
    .map_err(map_write_error)
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<User>, Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch user by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(
    e: E,
    email: String,
) -> Result<Option<User>, Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch user by email: {}", err);
            Error::UnexpectedError
        })
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateUserPayload,
) -> Result<User, Error> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash),
            is_verified = COALESCE($4, is_verified),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(payload.email)
    .bind(payload.password_hash)
    .bind(payload.is_verified)
    .fetch_one(e)
    .await
    .map_err(map_write_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_errors_stay_unexpected() {
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            Error::UnexpectedError
        ));
        assert!(matches!(
            map_write_error(sqlx::Error::PoolClosed),
            Error::UnexpectedError
        ));
    }
}
