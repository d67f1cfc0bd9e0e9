//! Data service integration
//!
//! Downloads the export for a date range from the data-export endpoint.

pub mod client;

pub use client::ExportFetcher;
