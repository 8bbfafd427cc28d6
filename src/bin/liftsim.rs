use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use liftsched::{Call, Config, DelayTicker, Elevator, Notification, dispatcher};
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tower::{Service, ServiceExt};

const CONFIG_PATH: &str = "config.toml";
const CALLS_PER_ROUND: usize = 5;

/// Interactive demo: take five calls, set the car moving, take five more
/// while it travels, then wait for the queue to drain.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load(CONFIG_PATH)?;
    info!(
        "serviced floors {}-{}, {}ms per floor",
        config.lowest_floor, config.highest_floor, config.floor_travel_ms
    );

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();
    let elevator = Elevator::with_ticker(
        notify_tx,
        Arc::new(DelayTicker(config.floor_travel())),
    );
    let mut svc = dispatcher(elevator.clone(), &config);

    tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            println!("ELEVATOR: {notification}");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for _ in 0..CALLS_PER_ROUND {
        let floor = read_floor(&mut lines, &config).await?;
        dispatch(&mut svc, Call::Stop(floor)).await;
    }

    dispatch(&mut svc, Call::Travel).await;

    for _ in 0..CALLS_PER_ROUND {
        let floor = read_floor(&mut lines, &config).await?;
        dispatch(&mut svc, Call::Stop(floor)).await;
    }

    // Only one drain runs at a time, so once travel() hands back a worker
    // the earlier drain is done and the late calls are guaranteed served
    // before the process exits.
    let handle = loop {
        match elevator.travel().await {
            Some(handle) => break handle,
            None => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    };
    handle.await??;
    Ok(())
}

async fn dispatch(svc: &mut liftsched::Dispatcher, call: Call) {
    if let Err(e) = async {
        svc.ready().await?;
        svc.call(call).await
    }
    .await
    {
        error!("dispatch of {call:?} failed: {e}");
    }
}

/// Prompts until the resident supplies a floor number inside the serviced
/// range.
async fn read_floor(lines: &mut Lines<BufReader<Stdin>>, config: &Config) -> anyhow::Result<i32> {
    loop {
        println!("Press number: -");
        let line = lines
            .next_line()
            .await
            .context("reading from stdin")?
            .context("stdin closed")?;
        if line.trim().is_empty() {
            continue;
        }

        match Call::try_from(line.as_str()) {
            Ok(Call::Stop(floor))
                if (config.lowest_floor..=config.highest_floor).contains(&floor) =>
            {
                return Ok(floor);
            }
            Ok(Call::Stop(_)) | Ok(Call::Travel) => {
                println!(
                    "[HELP] Please select a floor between {}-{}.",
                    config.lowest_floor, config.highest_floor
                );
            }
            Err(_) => println!("NB: numbers only!"),
        }
    }
}
