use serde::{Deserialize, Serialize};

use crate::commands::shell::ShellOutput;
use crate::types::*;

/// Configuration sync events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    Load,
    Submit,
    /// Reload now instead of waiting for the device
    ManualReload,
    #[serde(skip)]
    LoadResponse(Result<Configuration, RequestError>),
    #[serde(skip)]
    SubmitResponse(Result<(), RequestError>),
    #[serde(skip)]
    RestartGraceElapsed,
    #[serde(skip)]
    ReconnectTimeoutElapsed,
}

/// Status poller events, driven by the poll timer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    PollTick,
    #[serde(skip)]
    PollResponse(Result<StatusSnapshot, RequestError>),
}

/// WiFi scan events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    Scan,
    Select { ssid: String },
    #[serde(skip)]
    ScanResponse(Result<Vec<WifiNetwork>, RequestError>),
}

/// Form editing events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Register { layout: FormLayout },
    SetValue {
        name: String,
        index: usize,
        value: String,
    },
    SetChecked {
        name: String,
        value: String,
        checked: bool,
    },
    Reset,
}

/// UI events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
    ToggleUartAdvanced,
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    /// Page loaded
    Initialize,
    /// Page about to unload
    Teardown,

    Config(ConfigEvent),
    Status(StatusEvent),
    Wifi(WifiEvent),
    Form(FormEvent),
    Ui(UiEvent),

    // Shell operation results (internal events)
    #[serde(skip)]
    ShellResponse(ShellOutput),
}
