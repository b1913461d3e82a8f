//! Session view state.
//!
//! Which view a session runs under (admin or visitor) and whether it is
//! simulating a mobile device. This is deliberately a plain value that
//! gets constructed at session start and passed down explicitly, not
//! ambient process state: setters exist, but only the owner of the
//! context can call them.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Who the session is rendering for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Full editing surface
    Admin,

    /// Read-only visitor surface
    Visitor,
}

/// Device class being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Phone,
    Tablet,
}

/// Screen orientation of the simulated device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// An active device simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePreview {
    pub device: DeviceKind,
    pub orientation: Orientation,
}

impl DevicePreview {
    pub fn new(device: DeviceKind, orientation: Orientation) -> Self {
        Self {
            device,
            orientation,
        }
    }
}

/// View state for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContext {
    mode: ViewMode,
    preview: Option<DevicePreview>,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::admin()
    }
}

impl ViewContext {
    /// Admin session, no device simulation
    pub fn admin() -> Self {
        Self {
            mode: ViewMode::Admin,
            preview: None,
        }
    }

    /// Visitor session, no device simulation
    pub fn visitor() -> Self {
        Self {
            mode: ViewMode::Visitor,
            preview: None,
        }
    }

    /// Current view mode
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Current device simulation, if any
    pub fn preview(&self) -> Option<DevicePreview> {
        self.preview
    }

    /// Switch the view mode
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Flip between admin and visitor view
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Admin => ViewMode::Visitor,
            ViewMode::Visitor => ViewMode::Admin,
        };
    }

    /// Start simulating a device
    pub fn set_preview(&mut self, preview: DevicePreview) {
        self.preview = Some(preview);
    }

    /// Stop simulating a device
    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// True when the session can edit content
    pub fn is_admin(&self) -> bool {
        self.mode == ViewMode::Admin
    }

    /// True when listings should render in the narrow single-column form
    pub fn compact_output(&self) -> bool {
        matches!(
            self.preview,
            Some(DevicePreview {
                device: DeviceKind::Phone,
                orientation: Orientation::Portrait,
            })
        )
    }

    /// Reject the operation unless the session is in admin view
    pub fn require_admin(&self, operation: &str) -> Result<()> {
        if !self.is_admin() {
            anyhow::bail!("'{}' requires the admin view", operation);
        }
        Ok(())
    }
}
