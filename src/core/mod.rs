//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! abstraction and the analysis gateway.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod logging;
pub mod provider;
pub mod providers;

#[cfg(test)]
pub mod test_support;
