//! On-device inference for replysmith.
//!
//! Two [`LocalInferenceBackend`]s are provided:
//!
//! - [`WorkerBridge`] forwards prompts over a channel to a worker task that
//!   owns an [`InferenceEngine`] and answers through a oneshot reply.
//! - [`ProcessBackend`] runs a command per prompt, writing the prompt to
//!   stdin and reading the answer from stdout.
//!
//! Both need a tokio runtime on the calling thread and report
//! `ProviderError::WrongContext` otherwise. [`LocalProvider`] adapts a
//! backend to `LLMProvider` and re-dispatches such calls onto its relay
//! runtime.

mod bridge;
mod process;
mod provider;

pub use bridge::{InferenceEngine, WorkerBridge, LOCAL_WORKER_ID};
pub use process::{ProcessBackend, LOCAL_PROCESS_ID};
pub use provider::{render_prompt, LocalProvider};

use replysmith_protocols::error::ProviderError;
use tokio::runtime::Handle;

pub(crate) fn current_runtime(backend: &str) -> Result<Handle, ProviderError> {
    Handle::try_current().map_err(|_| {
        ProviderError::WrongContext(format!("{} called outside a tokio runtime", backend))
    })
}
