use super::service;
use crate::{
    modules::user::{self, repository::Role, repository::User},
    types::Context,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::{request::Parts, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub const TOKEN_HEADER: &str = "x-auth-token";

/// What a route demands of its caller. Routes absent from the permission
/// table are public.
#[derive(Clone, Copy, Debug)]
pub enum Requirement {
    Public,
    Any,
    Roles(&'static [Role]),
}

/// The declared permission of every non-public operation, keyed by method
/// and matched route path.
static PERMISSIONS: &[(Method, &str, Requirement)] = &[
    (Method::GET, "/api/users/profile", Requirement::Any),
    (Method::PATCH, "/api/users/profile", Requirement::Any),
    (Method::GET, "/api/users/:id", Requirement::Any),
    (
        Method::POST,
        "/api/restaurants",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::PATCH,
        "/api/restaurants/:id",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::DELETE,
        "/api/restaurants/:id",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::GET,
        "/api/restaurants/mine",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::POST,
        "/api/dishes",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::PATCH,
        "/api/dishes/:id",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::DELETE,
        "/api/dishes/:id",
        Requirement::Roles(&[Role::Owner]),
    ),
    (
        Method::POST,
        "/api/orders",
        Requirement::Roles(&[Role::Client]),
    ),
    (Method::GET, "/api/orders", Requirement::Any),
    (
        Method::GET,
        "/api/orders/subscriptions/pending",
        Requirement::Roles(&[Role::Owner]),
    ),
    (Method::GET, "/api/orders/:id", Requirement::Any),
    (Method::GET, "/api/orders/:id/subscription", Requirement::Any),
    (
        Method::PATCH,
        "/api/orders/:id/status",
        Requirement::Roles(&[Role::Owner, Role::Delivery]),
    ),
    (
        Method::POST,
        "/api/orders/:id/take",
        Requirement::Roles(&[Role::Delivery]),
    ),
    (Method::POST, "/api/media/upload", Requirement::Any),
];

pub fn requirement_for(method: &Method, path: &str) -> Requirement {
    PERMISSIONS
        .iter()
        .find(|(m, p, _)| m == method && *p == path)
        .map(|(_, _, requirement)| *requirement)
        .unwrap_or(Requirement::Public)
}

/// The single gate deciding whether a resolved caller satisfies a
/// requirement. `None` means the request carried no usable identity.
pub fn evaluate(requirement: Requirement, user: Option<&User>) -> bool {
    match (requirement, user) {
        (Requirement::Public, _) => true,
        (_, None) => false,
        (Requirement::Any, Some(_)) => true,
        (Requirement::Roles(roles), Some(user)) => roles.contains(&user.role),
    }
}

/// A denial never reveals whether the token was missing, invalid or merely
/// carried the wrong role.
fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Forbidden" })),
    )
        .into_response()
}

async fn resolve_user(ctx: &Arc<Context>, headers: &HeaderMap) -> Option<User> {
    let token = headers.get(TOKEN_HEADER)?.to_str().ok()?;
    let claims = service::token::verify(ctx.auth.token_secret.as_str(), token).ok()?;

    user::repository::find_by_id(&ctx.db_conn.pool, claims.id)
        .await
        .ok()
        .flatten()
}

pub async fn guard(
    State(ctx): State<Arc<Context>>,
    mut req: Request,
    next: Next,
) -> Response {
    let requirement = match req.extensions().get::<MatchedPath>() {
        Some(matched) => requirement_for(req.method(), matched.as_str()),
        None => Requirement::Public,
    };

    if let Requirement::Public = requirement {
        return next.run(req).await;
    }

    let user = match resolve_user(&ctx, req.headers()).await {
        Some(user) => user,
        None => return forbidden(),
    };

    if !evaluate(requirement, Some(&user)) {
        return forbidden();
    }

    req.extensions_mut().insert(Auth { user });
    next.run(req).await
}

/// The identity the guard attached to the request. Extracting it from a
/// route the permission table does not cover is a wiring mistake and is
/// answered with the same uniform denial.
#[derive(Serialize, Clone)]
pub struct Auth {
    pub user: User,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Auth>()
            .cloned()
            .ok_or_else(forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: Role) -> User {
        User {
            id: "01J5K3ZY7M".to_string(),
            email: "user@example.com".to_string(),
            password_hash: String::new(),
            role,
            is_verified: true,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn public_operations_allow_anonymous_callers() {
        assert!(evaluate(Requirement::Public, None));
        assert!(evaluate(
            Requirement::Public,
            Some(&user_with_role(Role::Client))
        ));
    }

    #[test]
    fn any_allows_every_authenticated_role() {
        for role in [Role::Owner, Role::Client, Role::Delivery] {
            assert!(evaluate(Requirement::Any, Some(&user_with_role(role))));
        }
        assert!(!evaluate(Requirement::Any, None));
    }

    #[test]
    fn role_requirements_deny_outsiders() {
        let requirement = Requirement::Roles(&[Role::Owner, Role::Delivery]);

        assert!(evaluate(requirement, Some(&user_with_role(Role::Owner))));
        assert!(evaluate(requirement, Some(&user_with_role(Role::Delivery))));
        assert!(!evaluate(requirement, Some(&user_with_role(Role::Client))));
        assert!(!evaluate(requirement, None));
    }

    #[test]
    fn unlisted_routes_are_public() {
        assert!(matches!(
            requirement_for(&Method::GET, "/api/restaurants"),
            Requirement::Public
        ));
        assert!(matches!(
            requirement_for(&Method::POST, "/api/auth/sign-in"),
            Requirement::Public
        ));
    }

    #[test]
    fn listed_routes_carry_their_declared_requirement() {
        assert!(matches!(
            requirement_for(&Method::POST, "/api/orders"),
            Requirement::Roles(roles) if roles == [Role::Client]
        ));
        assert!(matches!(
            requirement_for(&Method::GET, "/api/orders/:id"),
            Requirement::Any
        ));
        // Same path, different method: creation is owner-only, listing is open.
        assert!(matches!(
            requirement_for(&Method::GET, "/api/restaurants"),
            Requirement::Public
        ));
        assert!(matches!(
            requirement_for(&Method::POST, "/api/restaurants"),
            Requirement::Roles(roles) if roles == [Role::Owner]
        ));
    }
}
