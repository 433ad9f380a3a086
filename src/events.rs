//! Recorder lifecycle events published by the bridge.

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::recorder::RecordingSummary;

/// Default capacity of the lifecycle broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BridgeOperation {
    Start,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecorderEvent {
    Started {
        path: PathBuf,
        sample_rate: u32,
    },
    Stopped {
        summary: RecordingSummary,
    },
    Failed {
        operation: BridgeOperation,
        code: i32,
        message: String,
    },
}

/// Broadcast fan-out; sending with no subscribers is not an error.
pub struct EventBroadcaster {
    tx: broadcast::Sender<RecorderEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: RecorderEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}
