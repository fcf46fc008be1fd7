//! pjmlake core — windowed range fetches against the PJM Data Miner API.
//!
//! This crate contains:
//! - Window planner: splits a date range into API-sized, contiguous windows
//! - Fetch-merge executor: one sequential request per window, merged in order
//! - Feed schemas for load forecasts, real-time LMPs, solar and wind forecasts
//! - CSV table writer with atomic writes
//! - TOML configuration with environment override for the subscription key

pub mod config;
pub mod data;

pub use config::{Config, ConfigError};
