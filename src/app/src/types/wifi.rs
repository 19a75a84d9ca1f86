use serde::{Deserialize, Serialize};

/// Authentication mode as reported by the device's WiFi scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMode {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Wpa2Enterprise,
    Wpa3Psk,
    Wpa2Wpa3Psk,
    #[serde(other)]
    Unknown,
}

/// Signal quality bucket, named after the colour class shown for it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RssiClass {
    Primary,
    Success,
    Warning,
    Danger,
}

impl RssiClass {
    pub fn from_rssi(rssi: i32) -> Self {
        match rssi {
            r if r > -50 => Self::Primary,
            r if r > -60 => Self::Success,
            r if r > -70 => Self::Warning,
            _ => Self::Danger,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// One entry of `GET /wifi/scan`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    /// Signal strength in dBm
    pub rssi: i32,
    pub authmode: AuthMode,
}

impl WifiNetwork {
    pub fn is_open(&self) -> bool {
        self.authmode == AuthMode::Open
    }

    pub fn rssi_class(&self) -> RssiClass {
        RssiClass::from_rssi(self.rssi)
    }

    /// List entry text, e.g. `base (-61dBm) 🔒`.
    pub fn label(&self) -> String {
        if self.is_open() {
            format!("{} ({}dBm)", self.ssid, self.rssi)
        } else {
            format!("{} ({}dBm) 🔒", self.ssid, self.rssi)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WifiScanState {
    /// Scan in flight; the scan control is disabled meanwhile.
    pub scanning: bool,
    pub networks: Vec<WifiNetwork>,
    pub list_visible: bool,
}
