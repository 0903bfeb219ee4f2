//! FIFO recognition queue in front of a single engine instance.
//!
//! The engine is moved into a worker task that handles one job at a time.
//! Every job carries a request id and its own reply channel; the caller
//! checks the id on the response it receives. The worker bounds each engine
//! call with a timeout measured from dispatch and always answers, so the
//! queue moves on after a stuck request.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use image::GrayImage;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::error::OcrError;

use super::engine::TextRecognizer;
use super::{RecognitionOptions, RecognizedText};

struct Job {
    request_id: u64,
    image: GrayImage,
    options: RecognitionOptions,
    reply: oneshot::Sender<RecognitionResponse>,
}

/// A correlated engine response.
#[derive(Debug, Clone)]
pub struct RecognitionResponse {
    pub request_id: u64,
    pub outcome: Result<RecognizedText, OcrError>,
}

/// Serializes recognition requests against one engine.
pub struct RecognitionQueue {
    jobs: mpsc::UnboundedSender<Job>,
    next_id: AtomicU64,
    pending: Arc<AtomicUsize>,
    timeout: Duration,
}

impl RecognitionQueue {
    /// Move `engine` into a worker task and return the queue handle.
    ///
    /// Must be called from within a tokio runtime. The worker stops when the
    /// handle is dropped.
    pub fn spawn<E>(engine: E, timeout: Duration) -> Self
    where
        E: TextRecognizer + Send + 'static,
    {
        let (jobs, job_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_worker(engine, job_rx, pending.clone(), timeout));

        Self {
            jobs,
            next_id: AtomicU64::new(1),
            pending,
            timeout,
        }
    }

    /// Enqueue a raster and wait for its text.
    ///
    /// Fails with [`OcrError::Timeout`] if the engine does not answer within
    /// the queue timeout once the request is dispatched, and with
    /// [`OcrError::QueueClosed`] if the worker is gone.
    pub async fn submit(
        &self,
        image: GrayImage,
        options: RecognitionOptions,
    ) -> Result<RecognizedText, OcrError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();

        self.pending.fetch_add(1, Ordering::SeqCst);
        let job = Job {
            request_id,
            image,
            options,
            reply,
        };
        if self.jobs.send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(OcrError::QueueClosed);
        }
        trace!("Enqueued recognition request {}", request_id);

        let response = response.await.map_err(|_| OcrError::QueueClosed)?;
        if response.request_id != request_id {
            warn!(
                "Request {} received response for request {}",
                request_id, response.request_id
            );
            return Err(OcrError::Recognition(format!(
                "response for request {} delivered to request {}",
                response.request_id, request_id
            )));
        }
        response.outcome
    }

    /// Requests queued or in flight.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

async fn run_worker<E: TextRecognizer>(
    mut engine: E,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    pending: Arc<AtomicUsize>,
    timeout: Duration,
) {
    while let Some(job) = jobs.recv().await {
        debug!("Dispatching request {} to {}", job.request_id, engine.name());
        let started = Instant::now();

        let outcome =
            match tokio::time::timeout(timeout, engine.recognize(&job.image, &job.options)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "Request {} timed out after {:?}",
                        job.request_id, timeout
                    );
                    Err(OcrError::Timeout {
                        request_id: job.request_id,
                        seconds: timeout.as_secs(),
                    })
                }
            };

        match &outcome {
            Ok(text) => debug!(
                "Request {} completed in {:?} ({} chars)",
                job.request_id,
                started.elapsed(),
                text.text.chars().count()
            ),
            Err(e) => debug!("Request {} failed: {}", job.request_id, e),
        }

        pending.fetch_sub(1, Ordering::SeqCst);

        let response = RecognitionResponse {
            request_id: job.request_id,
            outcome,
        };
        if job.reply.send(response).is_err() {
            trace!("Caller of request {} went away", job.request_id);
        }
    }

    debug!("Recognition queue worker stopped");
}
