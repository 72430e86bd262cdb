//! SellAuth provider integration: configuration, HTTP client, payload
//! normalization, and storefront snapshot assembly.

pub mod checkout;
pub mod client;
pub mod config;
pub mod normalize;
pub mod storefront;
pub mod types;
