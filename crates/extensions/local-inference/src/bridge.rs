//! Channel bridge to a worker task hosting an inference engine.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use replysmith_protocols::error::ProviderError;
use replysmith_protocols::provider::{LocalInferenceBackend, LocalOptions};

use crate::current_runtime;

pub const LOCAL_WORKER_ID: &str = "local-worker";

/// A model that can run inside the worker task.
#[async_trait]
pub trait InferenceEngine: Send {
    async fn infer(&mut self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError>;
}

struct InferenceJob {
    prompt: String,
    options: LocalOptions,
    reply: oneshot::Sender<Result<String, ProviderError>>,
}

struct WorkerSlot {
    engine: Option<Box<dyn InferenceEngine>>,
    sender: Option<mpsc::Sender<InferenceJob>>,
}

/// Sends prompts to a single worker task that owns the engine.
///
/// The worker is spawned on the runtime of the first caller and handles
/// one job at a time; up to `queue` further jobs wait in the channel.
pub struct WorkerBridge {
    slot: Mutex<WorkerSlot>,
    queue: usize,
}

impl WorkerBridge {
    pub fn new(engine: Box<dyn InferenceEngine>, queue: usize) -> Self {
        Self {
            slot: Mutex::new(WorkerSlot {
                engine: Some(engine),
                sender: None,
            }),
            queue: queue.max(1),
        }
    }

    /// Whether the worker task has been started.
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .sender
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    fn sender(&self) -> Result<mpsc::Sender<InferenceJob>, ProviderError> {
        let handle = current_runtime(LOCAL_WORKER_ID)?;
        let mut slot = self.slot.lock();

        if let Some(tx) = slot.sender.as_ref().filter(|tx| !tx.is_closed()) {
            return Ok(tx.clone());
        }

        let engine = slot
            .engine
            .take()
            .ok_or_else(|| ProviderError::LocalBackend("inference worker stopped".to_string()))?;
        let (tx, rx) = mpsc::channel(self.queue);
        handle.spawn(run_worker(engine, rx));
        slot.sender = Some(tx.clone());
        Ok(tx)
    }
}

async fn run_worker(mut engine: Box<dyn InferenceEngine>, mut rx: mpsc::Receiver<InferenceJob>) {
    debug!("Local inference worker started");
    while let Some(job) = rx.recv().await {
        let result = engine.infer(&job.prompt, &job.options).await;
        if job.reply.send(result).is_err() {
            warn!("Local inference caller went away before the reply");
        }
    }
    debug!("Local inference worker stopped");
}

#[async_trait]
impl LocalInferenceBackend for WorkerBridge {
    fn id(&self) -> &str {
        LOCAL_WORKER_ID
    }

    async fn run(&self, prompt: &str, options: &LocalOptions) -> Result<String, ProviderError> {
        let sender = self.sender()?;
        let (reply, response) = oneshot::channel();
        sender
            .send(InferenceJob {
                prompt: prompt.to_string(),
                options: *options,
                reply,
            })
            .await
            .map_err(|_| ProviderError::LocalBackend("inference worker stopped".to_string()))?;

        response
            .await
            .map_err(|_| ProviderError::LocalBackend("inference worker dropped the request".to_string()))?
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
