//! BMI Calculator Host Library
//!
//! The native host for the widget core: configuration, the file-backed
//! store, the session service and the terminal presenter. Exposed as a
//! library for the binary and the integration tests.

pub mod commands;
pub mod config;
pub mod error;
pub mod presenter;
pub mod services;
pub mod state;
pub mod storage;
