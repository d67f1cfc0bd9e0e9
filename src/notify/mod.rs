//! Failure notifications
//!
//! Every failed run produces a [`Notice`]. With `notification.enabled` the
//! notice is emailed over SMTP; otherwise it is written to the log.

pub mod email;
pub mod factory;
pub mod log;
pub mod messages;
pub mod traits;

pub use email::EmailNotifier;
pub use factory::create_notifier;
pub use log::LogNotifier;
pub use messages::{FailureMessages, NoticeKind};
pub use traits::{Notice, Notifier};
