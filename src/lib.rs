//! Client and view-model layer for the diet management admin dashboard.
//!
//! [`client::DashboardClient`] talks to the backend; [`stats`] turns payloads into
//! chart-ready view-models; [`lists`] holds the paginated user and report lists.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lists;
pub mod models;
pub mod state;
pub mod stats;

pub use client::DashboardClient;
pub use config::Config;
pub use error::{DashboardError, Result};
