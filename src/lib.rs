//! Transparency dashboard backend
//!
//! Role-aware reporting service for an NGO skilling program: CSR and
//! government funds, the student pipeline, and the derived metrics
//! (utilization, S-ROI, district rollups) that each stakeholder's
//! dashboard renders. Narrative reports degrade to literal fallbacks
//! whenever the generative service is unavailable.

pub mod api;
pub mod audit;
pub mod auth;
pub mod error;
pub mod intake;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod seed;
pub mod views;
pub mod workspace;

pub use error::{DashboardError, Result};
