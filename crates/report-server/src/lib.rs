//! Backend for stock-report
//!
//! Two endpoints, both consumed by `report-core`'s HTTP gateways:
//!
//! - `GET /api/agg/:ticker?start=YYYY-MM-DD&end=YYYY-MM-DD` relays Polygon's
//!   daily aggregates, status and body untouched
//! - `POST /api/report` takes `{ "messages": [...] }` and answers with the
//!   generated `{ "role", "content" }` message
//!
//! API keys stay on the server; clients only ever see this backend.

pub mod config;
pub mod error;
pub mod routes;
pub mod upstream;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::{AppState, router};
pub use upstream::{PolygonClient, UpstreamResponse};
