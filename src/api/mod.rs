//! API Module
//!
//! HTTP handlers and routing exposing the chunked cache.
//!
//! # Endpoints
//! - `PUT /cache/:key` - Cache a JSON value
//! - `GET /cache/:key` - Read a cached value
//! - `DELETE /cache/:key` - Drop a cached value
//! - `POST /clear` - Purge every registry key
//! - `GET /stats` - Memory store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
