//! External system integrations.
//!
//! - [`dataservice`] - data-export HTTP endpoint
//! - [`storage`] - upload destination abstraction (trait-based) and factory
//! - [`sftp`] - SFTP destination
//! - [`sharepoint`] - SharePoint Online destination and sign-in handshake
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies so the job runner can be tested
//! with in-memory doubles. Upload destinations sit behind the
//! [`storage::FileStore`] trait and are chosen from `upload.target`:
//!
//! ```rust,no_run
//! use dataexport::adapters::storage::create_file_store;
//! use dataexport::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dataexport.toml")?;
//! let store = create_file_store(&config)?;
//! store.store("20240115.csv", b"id,value\n1,2\n").await?;
//! # Ok(())
//! # }
//! ```

pub mod dataservice;
pub mod sftp;
pub mod sharepoint;
pub mod storage;
