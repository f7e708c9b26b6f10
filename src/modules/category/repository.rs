use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct CategoryWithRestaurantCount {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub restaurant_count: i64,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

/// Collapses a display name into its canonical form: trimmed, lowercased,
/// spaces turned into hyphens.
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

pub async fn get_or_create<'e, E: PgExecutor<'e>>(e: E, name: String) -> Result<Category, Error> {
    let slug = slugify(name.as_str());
    let name = name.trim().to_lowercase();

    sqlx::query_as::<_, Category>(
        "
        INSERT INTO categories (id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = categories.name
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(name)
    .bind(slug)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to get or create category: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_all<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<CategoryWithRestaurantCount>, Error> {
    sqlx::query_as::<_, CategoryWithRestaurantCount>(
        "
        SELECT c.*, COUNT(r.id) AS restaurant_count
        FROM categories c
        LEFT JOIN restaurants r ON r.category_id = c.id
        GROUP BY c.id
        ORDER BY c.name
        ",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch categories: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_slug<'e, E: PgExecutor<'e>>(
    e: E,
    slug: String,
) -> Result<Option<Category>, Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch category by slug: {}", err);
            Error::UnexpectedError
        })
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_trims_and_lowercases() {
        assert_eq!(slugify("  Korean BBQ "), "korean-bbq");
    }

    #[test]
    fn slugify_keeps_embedded_runs_of_spaces() {
        assert_eq!(slugify(" fast   food"), "fast---food");
    }

    #[test]
    fn slugify_is_idempotent_on_slugs() {
        assert_eq!(slugify("fast-food"), "fast-food");
    }
}
