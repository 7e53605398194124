//! # Routing Module
//!
//! Maps incoming requests to handlers.
//!
//! - `pattern`: path patterns with `{param}` and trailing `{*wildcard}` segments
//! - `matcher`: header predicates used for content negotiation
//! - `table`: the ordered, immutable route table and its resolution rules
//! - `params`: extractors for the parameters a route captured
//! - `router`: the axum router that dispatches through the table

pub mod matcher;
pub mod params;
pub mod pattern;
pub mod router;
pub mod table;

pub use router::create_router;
pub use table::{Endpoint, Resolution, Route, RouteTable, RouteTableError, Verb, create_route_table};
