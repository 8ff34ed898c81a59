//! Rendering layer: every function here reads [`crate::state::AppState`] and
//! draws egui widgets; filter edits go back through the state's setters.

pub mod charts;
pub mod panels;
pub mod table;
