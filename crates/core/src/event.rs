//! Messages delivered to the controller's event loop.
//!
//! User input and the completion of every piece of background work (script
//! fetches, timers, remote queries) arrive on one channel and are handled one
//! at a time, so controller state is never mutated concurrently.

use tokio::sync::mpsc;

use crate::error::{LoadError, QueryError};
use crate::types::{Dependency, ResultSet, UserInput};

#[derive(Debug)]
pub enum OverlayEvent {
    Input(UserInput),
    DependencyLoaded(Dependency),
    DependencyFailed(LoadError),
    /// The presentation delay for open attempt `generation` elapsed.
    PresentationDue { generation: u64 },
    /// The backdrop fade started under `generation` finished.
    BackdropFaded { generation: u64 },
    QueryFinished { seq: u64, outcome: Result<ResultSet, QueryError> },
    /// Page unload. Ends the event loop and tears down session state.
    Unload,
    /// No further input will arrive. Ends the event loop once no query or
    /// presentation is outstanding.
    Drain,
}

pub type EventSender = mpsc::UnboundedSender<OverlayEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<OverlayEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
