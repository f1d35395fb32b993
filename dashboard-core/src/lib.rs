//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Fetching and normalizing forecasts (`client`)
//! - Rule-based health/travel/activity advisories (`advisory`)
//! - Per-page render descriptors, including chart series (`planner`)
//! - Last-issued-wins delivery of rendered pages (`coordinator`)
//! - Configuration stored on disk (`config`)
//!
//! It is used by `dashboard-cli`, but the render descriptors are front-end agnostic.

pub mod advisory;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod planner;

pub use client::{UnconfiguredSource, WeatherApiClient, WeatherSource, source_from_config};
pub use config::Config;
pub use coordinator::{Delivery, DeliveryOutcome, RequestCoordinator, RequestToken};
pub use error::WeatherError;
pub use model::{
    Advisory, ChartKind, ChartSeries, DailyPoint, HourlyPoint, InfoPanel, PageKind,
    RenderDescriptor, WeatherSnapshot,
};
pub use planner::PageRenderPlanner;
