use serde::{Deserialize, Serialize};

use crate::types::*;

/// Trait for types that can handle error messages
///
/// This allows HTTP helper functions to work with Model without directly depending on it.
pub trait ModelErrorHandler {
    fn set_error(&mut self, error: String);
}

/// Status poller bookkeeping
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollerState {
    pub started: bool,
    /// A poll timer is pending; never more than one
    pub timer_pending: bool,
    /// Stopped for good by a reload or teardown
    pub stopped: bool,
    pub consecutive_failures: u32,
}

/// Application Model - the complete session state
///
/// Created when the page loads, dropped when it reloads or unloads.
/// Also serves as the ViewModel.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    // Configuration sync state
    pub config: Option<Configuration>,
    pub firmware_version: Option<String>,
    pub form: FormState,
    pub sync_state: SyncState,
    pub is_submitting: bool,
    /// Next successful status poll reloads the page
    pub reload_on_status: bool,

    // Status poller state
    pub poller: PollerState,
    pub restart_timer_pending: bool,
    pub reconnect_timer_pending: bool,
    pub status: Option<StatusSnapshot>,
    pub status_view: Option<StatusView>,

    // WiFi scan state
    pub wifi_scan: WifiScanState,

    // UI state
    pub uart_advanced_visible: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub overlay_spinner: OverlaySpinnerState,
}

impl Model {
    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        log::error!("{error}");
        self.error_message = Some(error);
    }

    /// Set an error message and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    /// Clear the error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

impl ModelErrorHandler for Model {
    fn set_error(&mut self, error: String) {
        Model::set_error(self, error)
    }
}
