//! HTTP client for the weather forecast API.
//!
//! This module provides the `WeatherClient` for fetching the 3-hourly
//! forecast payload, and the `WeatherError` taxonomy it surfaces. The
//! client never retries; recovery lives in the sync engine.

pub mod client;
pub mod error;

pub use client::WeatherClient;
pub use error::WeatherError;
