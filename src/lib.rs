//! # rosterd
//!
//! An in-memory student directory service over async HTTP/1.1, built
//! from the wire up: request parsing, routing, validation, a middleware
//! pipeline, and a tokio accept loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rosterd::directory::StudentDirectory;
//! use rosterd::server::Server;
//! use rosterd::service::Api;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(Api::new(Arc::new(StudentDirectory::seeded())));
//!     let server = Server::bind("127.0.0.1:8000").await?;
//!     server
//!         .run(move |request| {
//!             let api = Arc::clone(&api);
//!             async move { api.handle(request).await }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod directory;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
pub mod service;
pub mod validate;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
