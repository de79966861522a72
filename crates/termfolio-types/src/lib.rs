//! Foundation types for termfolio.
//!
//! This crate contains the types shared by the engine and its hosts: the
//! error enum, platform-agnostic input events, and the TOML configuration
//! model.

pub mod config;
pub mod error;
pub mod input;
