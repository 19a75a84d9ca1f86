use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use ntrip_duo::{
    config::{ShellConfig, load_edits},
    http::DeviceClient,
    runtime::{Runtime, Script},
};
use ntrip_duo_core::Event;
use std::io::Write;
use tokio::signal::unix::{SignalKind, signal};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = ShellConfig::get();
    info!("control panel for {}", config.device_url);

    let edits = match &config.apply {
        Some(path) => Some(load_edits(path).await?),
        None => None,
    };
    let script = Script {
        edits,
        scan: config.scan,
    };

    let client =
        DeviceClient::new(config.device_url.clone()).context("failed to create device client")?;
    let mut runtime = Runtime::new(client, script);

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    runtime.dispatch(Event::Initialize)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("ctrl-c received");
                break;
            },
            _ = sigterm.recv() => {
                debug!("SIGTERM received");
                break;
            },
            progressed = runtime.step() => {
                if !progressed? {
                    break;
                }
            }
        }
    }

    runtime.teardown().context("failed to tear down")?;
    info!("shutdown complete");

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("ntrip-duo version: {}", env!("CARGO_PKG_VERSION"));
}
