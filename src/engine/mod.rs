//! Gateway operations

pub mod files;
pub mod gateway;

pub use files::{list_directory, DirectoryEntry};
pub use gateway::{Gateway, ResultData};
