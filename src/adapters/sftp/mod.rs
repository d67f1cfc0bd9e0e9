//! SFTP upload destination

pub mod store;

pub use store::SftpStore;
