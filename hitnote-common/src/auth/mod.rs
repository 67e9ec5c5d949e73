//! Credential and token engines

pub mod password;
pub mod token;
