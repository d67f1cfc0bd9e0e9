//! Upload destination abstraction and factory

pub mod factory;
pub mod traits;

pub use factory::create_file_store;
pub use traits::FileStore;
