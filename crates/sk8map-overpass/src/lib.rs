pub mod client;
pub mod error;
pub mod parse;
pub mod query;

pub use client::{OverpassClient, DEFAULT_ENDPOINT};
pub use error::OverpassError;
pub use parse::parse_elements;
pub use query::{build_query, encode_form_body, FORM_CONTENT_TYPE};
