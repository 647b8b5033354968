mod error;
mod middleware;
mod routes;
mod server;
mod state;
pub mod ws;

pub use error::ApiError;
pub use routes::router;
pub use server::serve;
pub use state::AppState;
