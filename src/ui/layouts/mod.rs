// src/ui/layouts/mod.rs
//! Containers that position and scroll child widgets

pub mod panel;

pub use panel::{ChildId, ScrollPanel};
