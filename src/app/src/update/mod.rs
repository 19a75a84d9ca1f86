mod config;
mod form;
mod status;
mod ui;
mod wifi;

pub use config::{RECONNECT_TIMEOUT_MS, RESTART_GRACE_MS};
pub use status::POLL_INTERVAL_MS;

use crux_core::Command;

use crate::commands::shell::{ShellOutput, TimerId};
use crate::events::{ConfigEvent, Event, StatusEvent};
use crate::model::Model;
use crate::{Effect, ShellCmd};

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize => config::initialize(model),
        Event::Teardown => teardown(model),
        Event::Config(event) => config::handle(event, model),
        Event::Status(event) => status::handle(event, model),
        Event::Wifi(event) => wifi::handle(event, model),
        Event::Form(event) => form::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
        Event::ShellResponse(output) => handle_shell_response(output, model),
    }
}

fn handle_shell_response(output: ShellOutput, model: &mut Model) -> Command<Effect, Event> {
    match output {
        ShellOutput::TimerElapsed {
            id: TimerId::StatusPoll,
        } => status::handle(StatusEvent::PollTick, model),
        ShellOutput::TimerElapsed {
            id: TimerId::RestartGrace,
        } => config::handle(ConfigEvent::RestartGraceElapsed, model),
        ShellOutput::TimerElapsed {
            id: TimerId::ReconnectTimeout,
        } => config::handle(ConfigEvent::ReconnectTimeoutElapsed, model),
        ShellOutput::TimerCancelled { id } => {
            log::debug!("timer {id:?} cancelled");
            Command::done()
        }
        ShellOutput::Acknowledged => Command::done(),
    }
}

/// Page unload: stop polling and cancel whatever timer is pending
fn teardown(model: &mut Model) -> Command<Effect, Event> {
    model.poller.stopped = true;

    let mut commands = Vec::new();
    if std::mem::take(&mut model.poller.timer_pending) {
        commands.push(
            ShellCmd::cancel_timer(TimerId::StatusPoll)
                .build()
                .then_send(Event::ShellResponse),
        );
    }
    if std::mem::take(&mut model.restart_timer_pending) {
        commands.push(
            ShellCmd::cancel_timer(TimerId::RestartGrace)
                .build()
                .then_send(Event::ShellResponse),
        );
    }
    if std::mem::take(&mut model.reconnect_timer_pending) {
        commands.push(
            ShellCmd::cancel_timer(TimerId::ReconnectTimeout)
                .build()
                .then_send(Event::ShellResponse),
        );
    }

    Command::all(commands)
}
