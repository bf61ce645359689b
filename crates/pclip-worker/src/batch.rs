//! Batch execution with bounded parallelism and partial-failure isolation.
//!
//! A batch processes every accepted clip window through its own pipeline;
//! one clip's failure never aborts its siblings. Concurrency is bounded by
//! a semaphore sized to the available codec capacity, and a single
//! wall-clock timeout covers the whole batch rather than individual stages.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{WorkerError, WorkerResult};
use crate::job::BatchJob;
use crate::pipeline::{process_clip, ClipContext, ClipFailure, ClipStage, ClipSuccess};

/// Outcome of a whole batch, distinguishing succeeded and failed clips.
#[derive(Debug, serde::Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: Vec<ClipSuccess>,
    pub failed: Vec<ClipFailure>,
}

impl BatchReport {
    /// Aggregate per-clip outcomes into a report, ordered by clip index.
    pub fn from_outcomes(
        run_id: String,
        started_at: DateTime<Utc>,
        outcomes: Vec<Result<ClipSuccess, ClipFailure>>,
    ) -> Self {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(s) => succeeded.push(s),
                Err(f) => failed.push(f),
            }
        }
        succeeded.sort_by_key(|s| s.index);
        failed.sort_by_key(|f| f.index);

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed,
        }
    }
}

/// Process a batch job end-to-end.
///
/// Accepts at most `max_clips_per_batch` windows (extra windows are dropped
/// with a warning, matching the upstream contract). Returns a report of
/// per-clip outcomes; only batch-level problems (setup, timeout) are hard
/// errors.
pub async fn process_batch(ctx: &ClipContext, job: &BatchJob) -> WorkerResult<BatchReport> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();

    let cap = ctx.worker.max_clips_per_batch.max(1);
    let windows = if job.windows.len() > cap {
        warn!(
            accepted = cap,
            dropped = job.windows.len() - cap,
            "Batch exceeds clip cap; dropping extra windows"
        );
        &job.windows[..cap]
    } else {
        &job.windows[..]
    };

    let batch_dir = PathBuf::from(&ctx.worker.work_dir).join(&run_id);
    tokio::fs::create_dir_all(&batch_dir).await?;

    info!(
        run_id = %run_id,
        clips = windows.len(),
        source = %job.source_video.display(),
        "Starting batch"
    );

    let semaphore = Arc::new(Semaphore::new(ctx.worker.max_parallel_clips.max(1)));

    let futures: Vec<_> = windows
        .iter()
        .enumerate()
        .map(|(index, window)| {
            let semaphore = semaphore.clone();
            let window = *window;
            let batch_dir = batch_dir.clone();
            async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return Err(ClipFailure {
                            index,
                            stage: ClipStage::Initialized,
                            error: "Worker pool closed".to_string(),
                        })
                    }
                };
                process_clip(
                    ctx,
                    &job.source_video,
                    &job.transcript,
                    window,
                    index,
                    &batch_dir,
                    &job.output_prefix,
                )
                .await
            }
        })
        .collect();

    let outcomes = match tokio::time::timeout(ctx.worker.batch_timeout, join_all(futures)).await {
        Ok(outcomes) => outcomes,
        Err(_) => {
            // Workspaces clean themselves up when the pending clips drop.
            let _ = tokio::fs::remove_dir_all(&batch_dir).await;
            return Err(WorkerError::BatchTimeout(ctx.worker.batch_timeout.as_secs()));
        }
    };

    // Per-clip workspaces are already released; drop the batch directory.
    let _ = tokio::fs::remove_dir_all(&batch_dir).await;

    let report = BatchReport::from_outcomes(run_id, started_at, outcomes);
    info!(
        run_id = %report.run_id,
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Batch finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(index: usize) -> Result<ClipSuccess, ClipFailure> {
        Ok(ClipSuccess {
            index,
            key: format!("p/clip_{}.mp4", index),
            duration_secs: 30.0,
            caption_count: 4,
        })
    }

    fn failure(index: usize, stage: ClipStage, error: &str) -> Result<ClipSuccess, ClipFailure> {
        Err(ClipFailure {
            index,
            stage,
            error: error.to_string(),
        })
    }

    /// One clip with missing detector artifacts fails with a detection
    /// error while its four siblings still complete and publish.
    #[test]
    fn test_partial_failure_isolation_in_report() {
        let outcomes = vec![
            success(0),
            success(1),
            failure(
                2,
                ClipStage::AudioExtracted,
                "Speaker detection artifacts invalid: tracks artifact missing",
            ),
            success(3),
            success(4),
        ];

        let report = BatchReport::from_outcomes("run".to_string(), Utc::now(), outcomes);
        assert_eq!(report.succeeded.len(), 4);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 2);
        assert_eq!(report.failed[0].stage, ClipStage::AudioExtracted);
        assert!(report.failed[0].error.contains("artifacts invalid"));
    }

    #[test]
    fn test_report_ordered_by_index() {
        let outcomes = vec![success(3), success(0), failure(2, ClipStage::Reframed, "x"), success(1)];
        let report = BatchReport::from_outcomes("run".to_string(), Utc::now(), outcomes);

        let indices: Vec<usize> = report.succeeded.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }
}
