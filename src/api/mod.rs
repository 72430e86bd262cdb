// HTTP API module
// Serves the storefront endpoints consumed by the web front-end

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
