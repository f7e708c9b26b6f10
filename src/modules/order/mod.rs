pub mod pricing;
pub mod repository;
pub mod routes;

pub use routes::get_router;
