use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::error::LiftError;
use crate::queue::DispatchQueue;
use crate::types::event::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rise,
    Fall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Traveling,
}

/// Source of the simulated inter-floor travel time. The drain awaits one
/// tick before each floor boundary it crosses.
#[async_trait]
pub trait Ticker: Send + Sync + 'static {
    async fn tick(&self);
}

/// Wall-clock ticker; with tokio's paused test clock the waits resolve
/// instantly, so tests stay deterministic.
pub struct DelayTicker(pub Duration);

#[async_trait]
impl Ticker for DelayTicker {
    async fn tick(&self) {
        tokio::time::sleep(self.0).await;
    }
}

#[derive(Debug)]
struct CarState {
    position: i32,
    direction: Direction,
    run_state: RunState,
    queue: DispatchQueue,
    draining: bool,
}

/// A single simulated car. No physical model beyond discrete one-floor
/// steps: the car visits whatever its queue schedules, one tick per floor.
///
/// All mutable state lives behind one mutex, so stop requests arriving
/// while a drain worker is running interleave with it safely, and a
/// `has_next` check and the pop that follows it happen under a single
/// lock acquisition.
#[derive(Clone)]
pub struct Elevator {
    state: Arc<Mutex<CarState>>,
    notify_tx: UnboundedSender<Notification>,
    ticker: Arc<dyn Ticker>,
}

impl Elevator {
    pub const DEFAULT_FLOOR_TRAVEL: Duration = Duration::from_millis(500);

    pub fn new(notify_tx: UnboundedSender<Notification>) -> Self {
        Self::with_ticker(notify_tx, Arc::new(DelayTicker(Self::DEFAULT_FLOOR_TRAVEL)))
    }

    pub fn with_ticker(notify_tx: UnboundedSender<Notification>, ticker: Arc<dyn Ticker>) -> Self {
        Elevator {
            state: Arc::new(Mutex::new(CarState {
                position: 0,
                direction: Direction::Rise,
                run_state: RunState::Stopped,
                queue: DispatchQueue::new(),
                draining: false,
            })),
            notify_tx,
            ticker,
        }
    }

    /// Adds another stop to the car's queue.
    pub async fn add_stop(&self, destination: i32) -> Result<(), LiftError> {
        let mut state = self.state.lock().await;
        if state.position == destination {
            return Err(LiftError::InvalidStop { floor: destination });
        }
        let current = state.position;
        state.queue.add_stop(current, destination);
        debug!("scheduled stop at floor {destination} (car at {current})");
        Ok(())
    }

    pub async fn position(&self) -> i32 {
        self.state.lock().await.position
    }

    pub async fn direction(&self) -> Direction {
        self.state.lock().await.direction
    }

    pub async fn run_state(&self) -> RunState {
        self.state.lock().await.run_state
    }

    /// Starts draining the queue and returns without waiting for it.
    ///
    /// At most one drain worker runs per car: a second call while a drain
    /// is active returns `None` instead of racing a sibling worker over
    /// the same queue. The handle resolves when the queue is exhausted, or
    /// with `WorkerInterrupted` if the observer disappears mid-leg.
    pub async fn travel(&self) -> Option<JoinHandle<anyhow::Result<()>>> {
        let mut state = self.state.lock().await;
        if state.draining {
            warn!("travel requested while a drain is already running");
            return None;
        }
        state.draining = true;
        drop(state);

        let state = Arc::clone(&self.state);
        let notify_tx = self.notify_tx.clone();
        let ticker = Arc::clone(&self.ticker);
        Some(tokio::spawn(async move {
            let result = drain(&state, &notify_tx, ticker.as_ref()).await;
            state.lock().await.draining = false;
            result.map_err(anyhow::Error::from)
        }))
    }
}

/// Serves queued stops until none remain. The run state is left at
/// whatever the last arrival set it to; an empty queue causes no further
/// transition.
async fn drain(
    state: &Mutex<CarState>,
    notify_tx: &UnboundedSender<Notification>,
    ticker: &dyn Ticker,
) -> Result<(), LiftError> {
    loop {
        let (target, step) = {
            let mut car = state.lock().await;
            if !car.queue.has_next() {
                return Ok(());
            }
            let target = car.queue.pop_next_stop()?;
            car.direction = if target > car.position {
                Direction::Rise
            } else {
                Direction::Fall
            };
            car.run_state = RunState::Traveling;
            debug!("next target: floor {target}, car at {}", car.position);
            let step = match car.direction {
                Direction::Rise => 1,
                Direction::Fall => -1,
            };
            (target, step)
        };

        loop {
            ticker.tick().await;
            let mut car = state.lock().await;
            car.position += step;
            let notification = if car.position != target {
                Notification::PassedFloor(car.position)
            } else {
                car.run_state = RunState::Stopped;
                Notification::Arrived(target)
            };
            notify_tx
                .send(notification)
                .map_err(|_| LiftError::WorkerInterrupted)?;
            if car.position == target {
                break;
            }
        }
    }
}
