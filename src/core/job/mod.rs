//! Export job orchestration and reporting

pub mod report;
pub mod runner;

pub use report::{JobReport, JobStage};
pub use runner::{ExportJob, JobSettings};
