pub mod config;
pub mod controller;
pub mod elevator;
pub mod error;
pub mod queue;
pub mod types;

pub use config::Config;
pub use controller::{Dispatcher, dispatcher};
pub use elevator::{DelayTicker, Direction, Elevator, RunState, Ticker};
pub use error::LiftError;
pub use queue::DispatchQueue;
pub use types::event::{Call, Notification};
