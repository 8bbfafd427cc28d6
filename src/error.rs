use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiftError {
    /// The car was instructed to travel to the floor it is already on.
    #[error("already on floor {floor}, refusing to schedule it")]
    InvalidStop { floor: i32 },

    /// `pop_next_stop` was called without a `has_next` guard.
    #[error("popped an empty dispatch queue")]
    EmptyQueue,

    /// The drain worker lost its observer mid-leg; position/direction can
    /// no longer be reported consistently, so the drain dies instead of
    /// resuming.
    #[error("drain worker interrupted mid-leg")]
    WorkerInterrupted,
}
