//! Response formatting: listing headers and pagination URLs.

pub mod headers;
pub mod pagination;

pub use pagination::next_page_url;
