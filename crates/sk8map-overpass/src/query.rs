//! Overpass QL query construction and form encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sk8map_core::Coordinate;

/// Content type the Overpass interpreter expects for form-posted queries.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Server-side evaluation limit written into the query header, in seconds.
pub const SERVER_TIMEOUT_SECS: u32 = 25;

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the areal query for skateparks around `center`.
///
/// Selects nodes, ways, and relations tagged `leisure=skatepark` within
/// `radius_meters`, and asks for tags plus a representative center point for
/// non-node geometries.
#[must_use]
pub fn build_query(center: Coordinate, radius_meters: u32) -> String {
    let around = format!("around:{radius_meters},{},{}", center.lat, center.lon);
    format!(
        "[out:json][timeout:{SERVER_TIMEOUT_SECS}];\n\
         (\n  \
           node({around})[\"leisure\"=\"skatepark\"];\n  \
           way({around})[\"leisure\"=\"skatepark\"];\n  \
           relation({around})[\"leisure\"=\"skatepark\"];\n\
         );\n\
         out center tags;\n"
    )
}

/// Encode a query as the `data=` form body.
#[must_use]
pub fn encode_form_body(query: &str) -> String {
    format!("data={}", utf8_percent_encode(query, URI_COMPONENT))
}
