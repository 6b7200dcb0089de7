//! URL handling module
//!
//! Builds the listing URLs of a locality and resolves the links found on
//! listing and pagination markup.

mod resolve;
mod target;

// Re-export main functions
pub use resolve::resolve_link;
pub use target::{
    listing_page_url, locality_url, LOCALITY_PLACEHOLDER, PAGE_PARAM, REGION_PLACEHOLDER,
};
