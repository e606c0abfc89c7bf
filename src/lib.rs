//! Watchlist analytics: month-of-year seasonality statistics, analyst
//! consensus aggregation and indicator-based alert evaluation over
//! already-fetched market data.

pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;

pub use errors::{AnalyticsError, Result};
