pub mod middleware;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;

pub use state::AppState;
