//! Background height computation over a message channel.
//!
//! The consumer posts `HeightRequest`s and later picks up `HeightResponse`s.
//! Nothing is cancelled and there is no back-pressure: the worker skips any
//! request superseded while it was busy, and the consumer ignores replies
//! older than the buffer it already shows. If the channel dies the last good
//! buffer stays in place.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use super::displacement::compute_heights;
use crate::error::WaterResult;
use crate::noise::SimplexNoise;
use crate::params::WaveParams;

/// Work item sent to the height worker
#[derive(Debug, Clone)]
pub struct HeightRequest {
    pub id: u64,
    pub time_s: f32,
    pub rest_positions: Arc<[Vec3]>,
    pub wave: WaveParams,
}

/// Heights for `rest_positions` of the request with the same id
#[derive(Debug, Clone)]
pub struct HeightResponse {
    pub id: u64,
    pub heights: Vec<f32>,
}

/// Consumer side of the offloaded displacement
pub struct HeightWorker {
    requests: Option<mpsc::Sender<HeightRequest>>,
    responses: mpsc::Receiver<HeightResponse>,
    next_id: u64,
    applied_id: Option<u64>,
    heights: Vec<f32>,
    disconnected: bool,
    thread: Option<thread::JoinHandle<()>>,
}

impl HeightWorker {
    /// Start a worker thread sharing `noise` read-only
    pub fn spawn(noise: Arc<SimplexNoise>) -> WaterResult<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("height-worker".to_string())
            .spawn(move || run_worker(&noise, request_rx, response_tx))?;

        let mut worker = Self::connect(request_tx, response_rx);
        worker.thread = Some(handle);
        Ok(worker)
    }

    /// Wrap an existing channel pair (the remote end may be anything)
    pub(crate) fn connect(
        requests: mpsc::Sender<HeightRequest>,
        responses: mpsc::Receiver<HeightResponse>,
    ) -> Self {
        Self {
            requests: Some(requests),
            responses,
            next_id: 0,
            applied_id: None,
            heights: Vec::new(),
            disconnected: false,
            thread: None,
        }
    }

    /// Post a request and return its id
    pub fn submit(&mut self, time_s: f32, rest_positions: Arc<[Vec3]>, wave: &WaveParams) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let request = HeightRequest {
            id,
            time_s,
            rest_positions,
            wave: wave.clone(),
        };
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !sent {
            self.mark_disconnected();
        }
        id
    }

    /// Apply every reply that has arrived; true if the buffer changed
    pub fn poll(&mut self) -> bool {
        let mut updated = false;
        loop {
            match self.responses.try_recv() {
                Ok(response) => updated |= self.apply(response),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.mark_disconnected();
                    break;
                }
            }
        }
        updated
    }

    /// Block until a reply at least as new as `id` is applied, or `timeout` passes
    pub fn wait_for(&mut self, id: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.applied_id.map_or(true, |applied| applied < id) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(response) => {
                    self.apply(response);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => return false,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    self.mark_disconnected();
                    return false;
                }
            }
        }
        true
    }

    /// Newest heights received so far
    pub fn heights(&self) -> Option<&[f32]> {
        self.applied_id.map(|_| self.heights.as_slice())
    }

    /// Id of the request whose heights are currently held
    pub fn applied_id(&self) -> Option<u64> {
        self.applied_id
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn apply(&mut self, response: HeightResponse) -> bool {
        if self.applied_id.is_some_and(|applied| response.id <= applied) {
            log::trace!("Dropping stale heights #{}", response.id);
            return false;
        }
        self.applied_id = Some(response.id);
        self.heights = response.heights;
        true
    }

    fn mark_disconnected(&mut self) {
        if !self.disconnected {
            log::warn!("Height worker disconnected, keeping last buffer");
            self.disconnected = true;
            self.requests = None;
        }
    }
}

impl Drop for HeightWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests = None;
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("Height worker panicked");
            }
        }
    }
}

fn run_worker(
    noise: &SimplexNoise,
    requests: mpsc::Receiver<HeightRequest>,
    responses: mpsc::Sender<HeightResponse>,
) {
    log::debug!("Height worker started");

    while let Ok(mut request) = requests.recv() {
        // Latest wins
        let mut skipped = 0;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            skipped += 1;
        }
        if skipped > 0 {
            log::trace!("Skipped {} superseded height requests", skipped);
        }

        let heights = compute_heights(
            noise,
            request.time_s,
            &request.rest_positions,
            &request.wave,
        );
        if responses
            .send(HeightResponse {
                id: request.id,
                heights,
            })
            .is_err()
        {
            break;
        }
    }

    log::debug!("Height worker stopped");
}
