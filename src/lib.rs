//! Civic Eye: report civic issues to the Hubli-Dharwad Municipal Corporation
//! from the terminal.

pub mod actions;
pub mod app;
pub mod backend;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod geocoding;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod report;
pub mod session;
pub mod tasks;
pub mod ui;
