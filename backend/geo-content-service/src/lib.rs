/// Geo Content Service Library
///
/// Location-tagged posts, threads, events and comments, with likes and
/// polling-based incremental sync.
///
/// # Modules
///
/// - `entity`: Capability contract shared by every content kind
/// - `models`: Data structures and request payloads
/// - `geo`: Bounding-box proximity filter
/// - `sync`: Watermark parsing for incremental sync
/// - `db`: Storage seam with PostgreSQL and in-memory implementations
/// - `services`: Generic resource engine, like toggling, comments
/// - `handlers`: HTTP request handlers and route table
/// - `middleware`: Caller identity extraction
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod sync;

pub use config::Config;
pub use entity::{Resource, ResourceKind};
pub use error::{AppError, Result};
