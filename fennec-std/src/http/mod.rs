//! HTTP dispatch: route matching, body extraction, and the dispatcher itself.

pub mod body;
pub mod dispatch;
pub mod router;

pub use body::request_body;
pub use dispatch::Dispatcher;
pub use router::{RouteEntry, RouteMatch, RouteTable, RouteTemplate, url_decode};
