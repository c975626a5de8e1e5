//! # shici Common Library
//!
//! Shared code for the shici poetry services:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Durable key/value slots (local storage mirror)
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod storage;
pub mod time;

pub use error::{Error, Result};
