//! Hosts the core and carries out its effects
//!
//! The core runs on a single task. HTTP requests and timers run as spawned
//! tasks that report back over a channel; their requests stay here until the
//! outcome arrives, so nothing but plain data crosses tasks.

use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use log::{debug, error, info, warn};
use ntrip_duo_core::{
    App, Configuration, Effect, Event, FieldKind, Model, ShellOperation, ShellOutput, SyncState,
    TimerId,
    events::{ConfigEvent, FormEvent, WifiEvent},
};
use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};
use tokio::{sync::mpsc, task::AbortHandle};

use crate::http::DeviceClient;

/// Work to do once the configuration is in
#[derive(Debug, Default)]
pub struct Script {
    pub edits: Option<Configuration>,
    pub scan: bool,
}

enum Outcome {
    Http { key: u64, result: HttpResult },
    Timer { key: u64, id: TimerId },
}

struct PendingTimer {
    key: u64,
    handle: AbortHandle,
}

pub struct Runtime {
    core: Core<App>,
    client: DeviceClient,
    script: Script,
    next_key: u64,
    http: HashMap<u64, Request<HttpRequest>>,
    shell: HashMap<u64, Request<ShellOperation>>,
    timers: HashMap<TimerId, PendingTimer>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    last_view: Model,
    reloads: u32,
}

impl Runtime {
    pub fn new(client: DeviceClient, script: Script) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            core: Core::new(),
            client,
            script,
            next_key: 0,
            http: HashMap::new(),
            shell: HashMap::new(),
            timers: HashMap::new(),
            outcome_tx,
            outcome_rx,
            last_view: Model::default(),
            reloads: 0,
        }
    }

    /// Current view model
    pub fn view(&self) -> Model {
        self.core.view()
    }

    /// How often the page was reloaded after a restart
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    /// Feed one event into the core and carry out everything that follows
    /// synchronously.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let effects = self.core.process_event(event);
        self.process(effects)
    }

    /// Wait for the next HTTP or timer outcome and resolve it.
    ///
    /// Returns `false` once nothing can arrive anymore.
    pub async fn step(&mut self) -> Result<bool> {
        let Some(outcome) = self.outcome_rx.recv().await else {
            return Ok(false);
        };

        match outcome {
            Outcome::Http { key, result } => {
                let Some(mut request) = self.http.remove(&key) else {
                    debug!("dropping response for a previous session");
                    return Ok(true);
                };
                let effects = self
                    .core
                    .resolve(&mut request, result)
                    .context("failed to resolve http request")?;
                self.process(effects)?;
            }
            Outcome::Timer { key, id } => {
                if self.timers.get(&id).is_some_and(|timer| timer.key == key) {
                    self.timers.remove(&id);
                }
                self.resolve_shell(key, ShellOutput::TimerElapsed { id })?;
            }
        }

        Ok(true)
    }

    /// Page unload: let the core cancel its timers
    pub fn teardown(&mut self) -> Result<()> {
        self.dispatch(Event::Teardown)
    }

    fn process(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut queue = VecDeque::from(effects);
        let mut deferred = Vec::new();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Render(_) => deferred.extend(self.render()),
                Effect::Http(request) => self.spawn_http(request),
                Effect::Shell(request) => queue.extend(self.handle_shell(request)?),
            }
        }

        for event in deferred {
            self.dispatch(event)?;
        }

        Ok(())
    }

    fn key(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }

    fn spawn_http(&mut self, request: Request<HttpRequest>) {
        let key = self.key();
        let operation = request.operation.clone();
        self.http.insert(key, request);

        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = client.execute(&operation).await;
            // receiver is gone when the shell shuts down
            let _ = outcome_tx.send(Outcome::Http { key, result });
        });
    }

    fn handle_shell(&mut self, mut request: Request<ShellOperation>) -> Result<Vec<Effect>> {
        match request.operation.clone() {
            ShellOperation::StartTimer { id, millis } => {
                let effects = self.cancel_timer(id)?;

                let key = self.key();
                self.shell.insert(key, request);

                let outcome_tx = self.outcome_tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    let _ = outcome_tx.send(Outcome::Timer { key, id });
                })
                .abort_handle();
                self.timers.insert(id, PendingTimer { key, handle });

                Ok(effects)
            }
            ShellOperation::CancelTimer { id } => {
                let mut effects = self.cancel_timer(id)?;
                effects.extend(
                    self.core
                        .resolve(&mut request, ShellOutput::Acknowledged)
                        .context("failed to acknowledge timer cancellation")?,
                );
                Ok(effects)
            }
            ShellOperation::ReloadPage => {
                self.reload()?;
                Ok(Vec::new())
            }
        }
    }

    /// Abort the pending timer `id` and resolve its request as cancelled.
    fn cancel_timer(&mut self, id: TimerId) -> Result<Vec<Effect>> {
        let Some(timer) = self.timers.remove(&id) else {
            return Ok(Vec::new());
        };
        timer.handle.abort();

        let Some(mut request) = self.shell.remove(&timer.key) else {
            return Ok(Vec::new());
        };
        self.core
            .resolve(&mut request, ShellOutput::TimerCancelled { id })
            .context("failed to resolve cancelled timer")
    }

    fn resolve_shell(&mut self, key: u64, output: ShellOutput) -> Result<()> {
        let Some(mut request) = self.shell.remove(&key) else {
            debug!("dropping shell output for a previous session");
            return Ok(());
        };
        let effects = self
            .core
            .resolve(&mut request, output)
            .context("failed to resolve shell request")?;
        self.process(effects)
    }

    /// Start over with a fresh core, as a browser reload would.
    fn reload(&mut self) -> Result<()> {
        info!("reloading");
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
        self.http.clear();
        self.shell.clear();
        self.core = Core::new();
        self.last_view = Model::default();
        self.reloads += 1;

        self.dispatch(Event::Initialize)
    }

    /// Report what changed since the last render; returns scripted follow-ups.
    fn render(&mut self) -> Vec<Event> {
        let view = self.core.view();
        report(&self.last_view, &view);

        let mut events = Vec::new();
        if view.sync_state == SyncState::Loaded && !view.is_submitting {
            if let Some(edits) = self.script.edits.take() {
                events.extend(edit_events(&view, &edits));
                events.push(Event::Config(ConfigEvent::Submit));
            }
            if std::mem::take(&mut self.script.scan) {
                events.push(Event::Wifi(WifiEvent::Scan));
            }
        }

        self.last_view = view;
        events
    }
}

/// Form events that apply `edits` to the inputs of `view`.
pub fn edit_events(view: &Model, edits: &Configuration) -> Vec<Event> {
    let mut events = Vec::new();

    for (name, value) in edits.fields() {
        let inputs: Vec<_> = view.form.fields.iter().filter(|f| &f.name == name).collect();
        if inputs.is_empty() {
            warn!("no input named {name}, skipping");
            continue;
        }

        let mut index = 0;
        for input in inputs {
            let event = match input.kind {
                FieldKind::Checkbox => FormEvent::SetChecked {
                    name: name.clone(),
                    value: input.value.clone(),
                    checked: value.selects(&input.value),
                },
                FieldKind::Radio => {
                    if !value.selects(&input.value) {
                        continue;
                    }
                    FormEvent::SetChecked {
                        name: name.clone(),
                        value: input.value.clone(),
                        checked: true,
                    }
                }
                _ => {
                    let event = FormEvent::SetValue {
                        name: name.clone(),
                        index,
                        value: value.at(index),
                    };
                    index += 1;
                    event
                }
            };
            events.push(Event::Form(event));
        }
    }

    events
}

fn report(previous: &Model, view: &Model) {
    if previous.sync_state != view.sync_state {
        info!("configuration: {:?}", view.sync_state);
    }
    if previous.firmware_version != view.firmware_version {
        if let Some(version) = &view.firmware_version {
            info!("firmware version {version}");
        }
    }
    if previous.error_message != view.error_message {
        if let Some(message) = &view.error_message {
            error!("{message}");
        }
    }
    if previous.success_message != view.success_message {
        if let Some(message) = &view.success_message {
            info!("{message}");
        }
    }
    if previous.form.errors != view.form.errors {
        for field_error in &view.form.errors {
            warn!("{field_error}");
        }
    }
    if previous.overlay_spinner != view.overlay_spinner && view.overlay_spinner.is_visible() {
        match view.overlay_spinner.text() {
            Some(text) => info!("{}: {text}", view.overlay_spinner.title()),
            None => info!("{}", view.overlay_spinner.title()),
        }
    }
    if previous.status_view != view.status_view {
        if let Some(status) = &view.status_view {
            let unknown = || "-".to_string();
            info!(
                "uptime {} | memory {} | station {} | access point {}",
                status.uptime.clone().unwrap_or_else(unknown),
                status.memory.clone().unwrap_or_else(unknown),
                status.wifi_station.clone().unwrap_or_else(unknown),
                status.wifi_access_point.clone().unwrap_or_else(unknown),
            );
            for stream in &status.streams {
                info!("  {:?}: {}", stream.role, stream.traffic);
            }
        }
    }
    if previous.wifi_scan.networks != view.wifi_scan.networks && view.wifi_scan.list_visible {
        info!("{} networks found", view.wifi_scan.networks.len());
        for network in &view.wifi_scan.networks {
            info!("  {} [{}]", network.label(), network.rssi_class().as_str());
        }
    }
}
