use crux_core::{render::render, Command};

use crate::events::{ConfigEvent, Event};
use crate::model::Model;
use crate::types::{Configuration, OverlaySpinnerState, SyncState};
use crate::{device_get, device_post};
use crate::{Effect, ShellCmd, TimerId};

use super::status;

/// Delay between a successful submission and arming the reload latch.
/// The device is expected to go down for its restart within this window.
pub const RESTART_GRACE_MS: u64 = 2500;

/// How long to wait for the device once the reload latch is armed before
/// reloading anyway. The device may come back at an address the poller
/// cannot reach, e.g. after a static IP change.
pub const RECONNECT_TIMEOUT_MS: u64 = 10_000;

/// Page start: load the configuration, the poller follows once it is in
pub fn initialize(model: &mut Model) -> Command<Effect, Event> {
    if model.sync_state != SyncState::Idle {
        log::debug!("already initialized ({:?})", model.sync_state);
        return Command::done();
    }
    log::info!("NTRIP Duo control panel initializing");
    load(model)
}

fn load(model: &mut Model) -> Command<Effect, Event> {
    model.sync_state = SyncState::Loading;
    Command::all([
        render(),
        device_get!(Config, ConfigEvent, "/config", LoadResponse, Configuration),
    ])
}

/// Handle configuration sync events
pub fn handle(event: ConfigEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ConfigEvent::Load => match model.sync_state {
            SyncState::Idle | SyncState::Loaded => load(model),
            state => {
                log::debug!("ignoring configuration reload while {state:?}");
                Command::done()
            }
        },

        ConfigEvent::LoadResponse(result) => {
            match result {
                Ok(config) => {
                    model.firmware_version = config.version();
                    model.form.populate(&config);
                    model.config = Some(config);
                }
                Err(e) => model.set_error(format!("Failed to load configuration: {e}")),
            }
            model.sync_state = SyncState::Loaded;
            Command::all([render(), status::start(model)])
        }

        ConfigEvent::Submit => submit(model),

        ConfigEvent::SubmitResponse(result) => {
            model.is_submitting = false;
            match result {
                Ok(()) => {
                    log::info!("configuration saved, device is restarting");
                    model.sync_state = SyncState::AwaitingRestart;
                    model.success_message = Some("Configuration saved".to_string());
                    model.overlay_spinner = OverlaySpinnerState::new("Restarting device")
                        .with_text("The device applies the new configuration and restarts.");
                    model.restart_timer_pending = true;
                    Command::all([
                        render(),
                        ShellCmd::start_timer(TimerId::RestartGrace, RESTART_GRACE_MS)
                            .build()
                            .then_send(Event::ShellResponse),
                    ])
                }
                Err(e) => {
                    model.sync_state = SyncState::Loaded;
                    model.set_error_and_render(format!("Failed to save configuration: {e}"))
                }
            }
        }

        ConfigEvent::RestartGraceElapsed => {
            if !std::mem::take(&mut model.restart_timer_pending) {
                return Command::done();
            }
            model.reload_on_status = true;
            model.sync_state = SyncState::Reconnecting;
            model
                .overlay_spinner
                .set_text("Waiting for the device to come back online...");
            model.reconnect_timer_pending = true;
            Command::all([
                render(),
                ShellCmd::start_timer(TimerId::ReconnectTimeout, RECONNECT_TIMEOUT_MS)
                    .build()
                    .then_send(Event::ShellResponse),
            ])
        }

        ConfigEvent::ReconnectTimeoutElapsed => {
            if !std::mem::take(&mut model.reconnect_timer_pending) || model.poller.stopped {
                return Command::done();
            }
            log::warn!("device did not answer within {RECONNECT_TIMEOUT_MS} ms, reloading");
            model
                .overlay_spinner
                .set_text("The device did not answer in time. Reloading...");
            model.overlay_spinner.set_timed_out();
            reload(model)
        }

        ConfigEvent::ManualReload => {
            log::info!("manual reload requested");
            reload(model)
        }
    }
}

/// End the session; the shell starts a fresh one.
fn reload(model: &mut Model) -> Command<Effect, Event> {
    model.poller.stopped = true;
    model.sync_state = SyncState::Idle;
    Command::all([
        render(),
        ShellCmd::reload_page()
            .build()
            .then_send(Event::ShellResponse),
    ])
}

fn submit(model: &mut Model) -> Command<Effect, Event> {
    if model.is_submitting {
        log::debug!("submission already in flight");
        return Command::done();
    }
    if matches!(
        model.sync_state,
        SyncState::AwaitingRestart | SyncState::Reconnecting
    ) {
        log::debug!("ignoring submit while the device restarts");
        return Command::done();
    }

    let errors = model.form.validate();
    if !errors.is_empty() {
        for error in &errors {
            log::warn!("invalid field {error}");
        }
        model.form.errors = errors;
        model.form.was_validated = true;
        model.sync_state = SyncState::Loaded;
        return render();
    }

    model.form.errors.clear();
    model.clear_error();
    model.is_submitting = true;
    model.sync_state = SyncState::Submitting;

    let payload = model.form.serialize();
    log::debug!("submitting {} configuration fields", payload.len());

    Command::all([
        render(),
        device_post!(Config, ConfigEvent, model, "/config", SubmitResponse, "Save configuration",
            body_json: &payload
        ),
    ])
}
