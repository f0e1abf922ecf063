//! HTTP chat surface: a single chat page plus the JSON endpoints it calls.

pub mod assets;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
