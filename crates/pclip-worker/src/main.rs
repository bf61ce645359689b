//! Clip processing worker binary.
//!
//! Consumes a batch job description (JSON) and runs the clip pipeline,
//! printing the per-clip outcome report to stdout.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pclip_media::{check_ffmpeg, check_ffprobe, CommandSpeakerDetector, SubtitleStyle};
use pclip_worker::{
    process_batch, reframe_config_from_env, BatchJob, ClipContext, LocalDirStore, WorkerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production.
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("pclip=info".parse().expect("static directive parses"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    let job_path = std::env::args()
        .nth(1)
        .context("Usage: pclip-worker <batch-job.json>")?;

    check_ffmpeg().context("FFmpeg is required")?;
    check_ffprobe().context("FFprobe is required")?;

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let detector = Arc::new(CommandSpeakerDetector::new(
        &config.detector_program,
        config.detector_args.clone(),
        config.detector_timeout.as_secs(),
    ));
    let store = Arc::new(LocalDirStore::new(&config.publish_root));

    let ctx = ClipContext {
        reframe: reframe_config_from_env(),
        subtitle_style: SubtitleStyle::default(),
        detector,
        store,
        worker: config,
    };

    let job = BatchJob::load(&job_path)
        .await
        .with_context(|| format!("Failed to load batch job from {}", job_path))?;

    let report = process_batch(&ctx, &job).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Worker finished"
    );

    Ok(())
}
