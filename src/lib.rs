//! HR analytics dashboard.
//!
//! The [`data`] module is the core: it loads the employee table, applies
//! [`data::filter::FilterCriteria`] and summarises the result. Everything
//! else renders that core with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod format;
pub mod state;
pub mod ui;
