//! Tunable widget settings
//!
//! Stored as a postcard blob next to the rest of the device settings.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::ui::error::{UiError, UiResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    /// Pen travel in pixels before a press turns into a drag-scroll
    pub drag_threshold: u16,
    /// Added to the font height to size the expand icon and row hit box
    pub icon_padding: u16,
    /// Vertical gap between consecutive tree rows
    pub row_gap: u16,
    /// Horizontal gap between a row's icon and its label
    pub text_gap: u16,
    pub scrollbar_width: u16,
    pub min_scrollbar_length: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4,
            icon_padding: 8,
            row_gap: 4,
            text_gap: 4,
            scrollbar_width: 4,
            min_scrollbar_length: 20,
        }
    }
}

impl UiConfig {
    pub fn from_bytes(bytes: &[u8]) -> UiResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| {
            log::warn!("Discarding stored UI config: {:?}", e);
            UiError::InvalidConfig
        })
    }

    pub fn to_bytes(&self) -> UiResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| UiError::InvalidConfig)
    }
}
