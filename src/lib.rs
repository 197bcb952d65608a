//! segmock - a mock customer-segmentation HTTP API
//!
//! Serves canned demographic, preference and RFM segmentation results:
//! - `GET /` liveness message
//! - `POST /api/segment/comprehensive` all distributions plus customer count
//! - `POST /api/segment/{kind}` a single distribution
//!
//! The `segmock-debug` binary wraps the same application with debug logging
//! and panic traces in 500 responses.

pub mod api;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod server;
pub mod types;

pub use error::{Error, Result};
