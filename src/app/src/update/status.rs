use crux_core::{render::render, Command};

use crate::device_get;
use crate::events::{Event, StatusEvent};
use crate::model::Model;
use crate::types::{StatusSnapshot, StatusView, SyncState};
use crate::{Effect, ShellCmd, TimerId};

/// Delay between the end of one poll and the start of the next.
pub const POLL_INTERVAL_MS: u64 = 2500;

/// Start the poller with an immediate poll. Only the first call counts.
pub fn start(model: &mut Model) -> Command<Effect, Event> {
    if model.poller.started || model.poller.stopped {
        return Command::done();
    }
    model.poller.started = true;
    log::debug!("status poller started");
    poll(model)
}

fn poll(model: &mut Model) -> Command<Effect, Event> {
    if model.poller.stopped {
        return Command::done();
    }
    device_get!(Status, StatusEvent, "/status", PollResponse, StatusSnapshot)
}

/// Arm the next poll unless one is already pending or polling has ended
fn schedule_next(model: &mut Model) -> Command<Effect, Event> {
    if model.poller.stopped || model.poller.timer_pending {
        return Command::done();
    }
    model.poller.timer_pending = true;
    ShellCmd::start_timer(TimerId::StatusPoll, POLL_INTERVAL_MS)
        .build()
        .then_send(Event::ShellResponse)
}

/// Handle status poller events
pub fn handle(event: StatusEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        StatusEvent::PollTick => {
            if !std::mem::take(&mut model.poller.timer_pending) {
                log::debug!("ignoring poll tick without a pending timer");
                return Command::done();
            }
            poll(model)
        }

        StatusEvent::PollResponse(Ok(snapshot)) => {
            if model.poller.stopped {
                return Command::done();
            }

            if model.reload_on_status {
                log::info!("device is back online, reloading");
                model.poller.stopped = true;
                model.sync_state = SyncState::Idle;
                return ShellCmd::reload_page()
                    .build()
                    .then_send(Event::ShellResponse);
            }

            if model.poller.consecutive_failures > 0 {
                log::info!(
                    "status available again after {} failed polls",
                    model.poller.consecutive_failures
                );
            }
            model.poller.consecutive_failures = 0;
            model.status_view = Some(StatusView::from(&snapshot));
            model.status = Some(snapshot);

            Command::all([render(), schedule_next(model)])
        }

        StatusEvent::PollResponse(Err(e)) => {
            model.poller.consecutive_failures = model.poller.consecutive_failures.saturating_add(1);
            if e.is_connection_error() {
                log::debug!("status poll failed: {e}");
            } else {
                log::warn!("status poll failed: {e}");
            }
            schedule_next(model)
        }
    }
}
