use serde::{Deserialize, Serialize};

const BYTE_UNITS: [&str; 8] = ["kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const BYTE_DIVISOR: f64 = 1000.0;

/// Render seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Render a byte count with SI-like units and one decimal place.
///
/// The unit is the largest one keeping the magnitude below 1000, e.g.
/// `999B`, `1.0kB`, `1.5MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{bytes}B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    value /= BYTE_DIVISOR;
    while value >= BYTE_DIVISOR && unit < BYTE_UNITS.len() - 1 {
        value /= BYTE_DIVISOR;
        unit += 1;
    }
    format!("{value:.1}{}", BYTE_UNITS[unit])
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeapInfo {
    pub free: u64,
    pub total: u64,
}

impl HeapInfo {
    /// Free heap in percent, rounded. `None` for an empty heap report.
    pub fn percent_free(&self) -> Option<u64> {
        (self.total > 0).then(|| (self.free as f64 / self.total as f64 * 100.0).round() as u64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StationStatus {
    pub active: bool,
    pub connected: bool,
    pub ssid: String,
    pub ip4: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessPointStatus {
    pub active: bool,
    pub ssid: String,
    pub devices: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WifiStatus {
    pub sta: Option<StationStatus>,
    pub ap: Option<AccessPointStatus>,
}

impl WifiStatus {
    pub fn station_summary(&self) -> String {
        match &self.sta {
            Some(sta) if sta.active && sta.connected => format!("{} - {}", sta.ssid, sta.ip4),
            Some(sta) if sta.active => "Not connected".to_string(),
            _ => "Inactive".to_string(),
        }
    }

    pub fn access_point_summary(&self) -> String {
        match &self.ap {
            Some(ap) if ap.active => format!("{} - {} devices", ap.ssid, ap.devices),
            _ => "Inactive".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ByteTotals {
    #[serde(rename = "in")]
    pub bytes_in: u64,
    #[serde(rename = "out")]
    pub bytes_out: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamStats {
    pub total: ByteTotals,
}

/// Byte counters per NTRIP stream role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Streams {
    pub ntrip_server: Option<StreamStats>,
    pub ntrip_server_2: Option<StreamStats>,
    pub ntrip_client: Option<StreamStats>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StreamRole {
    PrimaryServer,
    SecondaryServer,
    Client,
}

impl Streams {
    pub fn iter(&self) -> impl Iterator<Item = (StreamRole, &StreamStats)> {
        [
            (StreamRole::PrimaryServer, &self.ntrip_server),
            (StreamRole::SecondaryServer, &self.ntrip_server_2),
            (StreamRole::Client, &self.ntrip_client),
        ]
        .into_iter()
        .filter_map(|(role, stats)| stats.as_ref().map(|s| (role, s)))
    }
}

/// Telemetry returned by `GET /status`. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatusSnapshot {
    pub uptime: u64,
    pub heap: Option<HeapInfo>,
    pub wifi: Option<WifiStatus>,
    pub streams: Option<Streams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamView {
    pub role: StreamRole,
    pub traffic: String,
}

/// Display strings derived from a [`StatusSnapshot`].
///
/// Parts missing from the snapshot stay `None` so the shell keeps showing
/// its previous text for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub uptime: Option<String>,
    pub memory: Option<String>,
    pub wifi_station: Option<String>,
    pub wifi_access_point: Option<String>,
    pub streams: Vec<StreamView>,
}

impl From<&StatusSnapshot> for StatusView {
    fn from(status: &StatusSnapshot) -> Self {
        Self {
            uptime: (status.uptime > 0).then(|| format_uptime(status.uptime)),
            memory: status
                .heap
                .and_then(|heap| heap.percent_free())
                .map(|percent| format!("{percent}% free")),
            wifi_station: status.wifi.as_ref().map(WifiStatus::station_summary),
            wifi_access_point: status.wifi.as_ref().map(WifiStatus::access_point_summary),
            streams: status
                .streams
                .iter()
                .flat_map(|streams| streams.iter())
                .map(|(role, stats)| StreamView {
                    role,
                    traffic: format!(
                        "{} in / {} out",
                        format_bytes(stats.total.bytes_in),
                        format_bytes(stats.total.bytes_out)
                    ),
                })
                .collect(),
        }
    }
}
