// src/ui/components/mod.rs
//! Leaf widgets that can live inside a scroll panel

pub mod button;
pub mod text;

pub use button::Button;
pub use text::{Label, TextSize};
