//! SharePoint Online upload destination
//!
//! Signs in with the claims-based handshake and writes files into a
//! document library over the REST API.

pub mod auth;
pub mod cookies;
pub mod envelope;
pub mod store;
pub mod xml;

pub use auth::{AuthSession, SharePointAuthenticator};
pub use cookies::SessionCookies;
pub use store::SharePointStore;
