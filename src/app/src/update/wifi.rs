use crux_core::{render::render, Command};

use crate::device_get;
use crate::events::{Event, WifiEvent};
use crate::model::Model;
use crate::types::{WifiNetwork, STA_SSID_FIELD};
use crate::Effect;

/// Handle WiFi scan events
pub fn handle(event: WifiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        WifiEvent::Scan => {
            if model.wifi_scan.scanning {
                return Command::done();
            }
            model.wifi_scan.scanning = true;
            Command::all([
                render(),
                device_get!(Wifi, WifiEvent, "/wifi/scan", ScanResponse, Vec<WifiNetwork>),
            ])
        }

        WifiEvent::ScanResponse(result) => {
            model.wifi_scan.scanning = false;
            match result {
                Ok(networks) => {
                    log::debug!("wifi scan found {} networks", networks.len());
                    model.wifi_scan.networks = networks;
                    model.wifi_scan.list_visible = true;
                    render()
                }
                Err(e) => model.set_error_and_render(format!("WiFi scan failed: {e}")),
            }
        }

        WifiEvent::Select { ssid } => {
            if ssid.is_empty() {
                return Command::done();
            }
            model.form.set_value(STA_SSID_FIELD, 0, ssid);
            model.wifi_scan.list_visible = false;
            render()
        }
    }
}
