//! Operator notification abstraction

use crate::domain::Result;
use async_trait::async_trait;

/// A message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
}

impl Notice {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivers failure notices
///
/// Delivery errors are returned to the caller, which decides whether they
/// matter; the job runner only logs them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name for logging (`email`, `log`)
    fn channel(&self) -> &'static str;

    async fn notify(&self, notice: &Notice) -> Result<()>;
}
