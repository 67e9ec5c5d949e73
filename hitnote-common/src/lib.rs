//! # HitNote Common Library
//!
//! Shared code for the HitNote backend services including:
//! - Connection provider and schema bootstrap
//! - Entity stores (users, musics, reviews, lists, follows, likes)
//! - Credential and token engines
//! - Activity feed aggregation
//! - Configuration loading

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;

pub use error::{Error, Result};
