use anyhow::Context;
use std::fmt;
use std::fmt::Display;

/// Requests the dispatcher accepts from the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Schedule a stop at the given floor.
    Stop(i32),
    /// Begin draining the pending stops.
    Travel,
}

impl TryFrom<&str> for Call {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("go") {
            return Ok(Call::Travel);
        }
        let floor = trimmed
            .parse::<i32>()
            .context(format!("failed to parse '{trimmed}' as a floor number"))?;
        Ok(Call::Stop(floor))
    }
}

/// What the car reports back to its observer as it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PassedFloor(i32),
    Arrived(i32),
}

impl Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::PassedFloor(floor) => write!(f, "Passed {floor} floor"),
            Notification::Arrived(floor) => write!(f, "Arrived at {floor} floor"),
        }
    }
}
