//! Customer-portal transfer client.
//!
//! A four-step transfer wizard backed by the bank's REST API, with a transfer PIN gate,
//! fee estimation and account selection.

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;
