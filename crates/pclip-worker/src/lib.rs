//! Clip processing orchestrator.
//!
//! Drives the per-clip pipeline (extract, detect, reframe, mux, caption,
//! publish) over a batch of candidate windows with bounded parallelism and
//! partial-failure isolation.

pub mod batch;
pub mod config;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod store;

pub use batch::{process_batch, BatchReport};
pub use config::{reframe_config_from_env, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use job::BatchJob;
pub use pipeline::{process_clip, ClipContext, ClipFailure, ClipStage, ClipSuccess};
pub use store::{clip_key, ClipStore, LocalDirStore};
