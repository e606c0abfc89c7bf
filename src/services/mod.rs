pub mod alert_service;
pub mod analyst_service;
pub mod import_service;
pub mod indicators;
pub mod ratings;
pub mod seasonality_service;
pub mod statistics;
