// Catalog reconciliation: curated banners, alias matching, and the
// placeholder data that keeps every category visually populated.

pub mod alias;
pub mod assign;
pub mod banners;
pub mod mock;
pub mod reviews;
pub mod samples;
pub mod slug;
