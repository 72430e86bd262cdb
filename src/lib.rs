pub mod api;
pub mod catalog;
pub mod env_boot;
pub mod sellauth;
pub mod tracing;

pub mod util {
    pub mod env;
}
