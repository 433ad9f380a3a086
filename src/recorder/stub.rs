use std::sync::{Mutex, MutexGuard};

use super::{Recorder, RecordingRequest, RecordingSummary};
use crate::error::RecorderError;

/// A call observed by [`StubRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderCall {
    Start(RecordingRequest),
    Stop,
}

#[derive(Default)]
struct StubState {
    calls: Vec<RecorderCall>,
    active: Option<RecordingRequest>,
    fail_next_start: Option<RecorderError>,
    fail_next_stop: Option<RecorderError>,
}

/// Recorder stub used for deterministic testing and hardware-free harnesses.
///
/// Every call is logged before the stub applies its lifecycle rules, so a
/// rejected second `start` still shows up in [`StubRecorder::calls`].
#[derive(Default)]
pub struct StubRecorder {
    state: Mutex<StubState>,
    frames_per_recording: u64,
}

impl StubRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this many frames in every summary
    pub fn with_frames(frames_per_recording: u64) -> Self {
        Self {
            state: Mutex::default(),
            frames_per_recording,
        }
    }

    pub fn calls(&self) -> Vec<RecorderCall> {
        self.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    pub fn start_requests(&self) -> Vec<RecordingRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecorderCall::Start(request) => Some(request),
                RecorderCall::Stop => None,
            })
            .collect()
    }

    pub fn fail_next_start(&self, err: RecorderError) {
        if let Ok(mut state) = self.lock() {
            state.fail_next_start = Some(err);
        }
    }

    pub fn fail_next_stop(&self, err: RecorderError) {
        if let Ok(mut state) = self.lock() {
            state.fail_next_stop = Some(err);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StubState>, RecorderError> {
        self.state.lock().map_err(|_| RecorderError::LockPoisoned {
            component: "stub_recorder".to_string(),
        })
    }
}

impl Recorder for StubRecorder {
    fn start(&self, request: &RecordingRequest) -> Result<(), RecorderError> {
        let mut state = self.lock()?;
        state.calls.push(RecorderCall::Start(request.clone()));

        if let Some(err) = state.fail_next_start.take() {
            return Err(err);
        }
        if state.active.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        state.active = Some(request.clone());
        Ok(())
    }

    fn stop(&self) -> Result<RecordingSummary, RecorderError> {
        let mut state = self.lock()?;
        state.calls.push(RecorderCall::Stop);

        if let Some(err) = state.fail_next_stop.take() {
            return Err(err);
        }
        let request = state.active.take().ok_or(RecorderError::NotRecording)?;
        Ok(RecordingSummary::new(&request, self.frames_per_recording, 0))
    }

    fn is_recording(&self) -> bool {
        self.lock().map(|state| state.active.is_some()).unwrap_or(false)
    }
}
