//! Shared library for the marketing dashboard Lambda functions.
//!
//! This crate provides the calendar feed resolution core plus the common
//! utilities, types, and external-API clients used across all handlers.

pub mod calendar;
pub mod config;
pub mod error;
pub mod http;
pub mod meta;
pub mod models;
pub mod oauth;
pub mod sheets;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Post, PostStatus, PostType};
