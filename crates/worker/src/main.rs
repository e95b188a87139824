//! Worker entry point.
//!
//! With a topic argument, runs one pipeline and prints the outcome JSON.
//! Without arguments, long-polls the topic queue and processes each
//! message with an independent pipeline run.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipcast_core::config::Config;
use clipcast_media::{FfmpegEncoder, OutputSpec, VideoAssembler};
use clipcast_pipeline::{parse_topic, Orchestrator, Outcome};
use clipcast_services::{
    ImageFetcher, MetadataRecorder, ScriptGenerator, SpeechSynthesizer, StorageUploader,
    TopicQueue,
};

/// Pause after a failed queue receive before retrying.
const RECEIVE_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipcast_worker=debug,clipcast_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let orchestrator = build_orchestrator(&config, &sdk_config);

    if let Some(topic) = std::env::args().nth(1) {
        let outcome = orchestrator.run(&topic).await;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    poll_queue(&config, &sdk_config, &orchestrator).await
}

/// Wire the concrete stage implementations into an orchestrator.
fn build_orchestrator(config: &Config, sdk_config: &aws_config::SdkConfig) -> Orchestrator {
    let encoder = FfmpegEncoder::new(OutputSpec {
        fps: config.fps,
        ..OutputSpec::default()
    });
    Orchestrator::new(
        Box::new(ScriptGenerator::new(config)),
        Box::new(ImageFetcher::new(config)),
        Box::new(SpeechSynthesizer::new(config, sdk_config)),
        Box::new(VideoAssembler::new(
            Box::new(encoder),
            (config.frame_width, config.frame_height),
        )),
        Box::new(StorageUploader::new(config, sdk_config)),
        Box::new(MetadataRecorder::new(config, sdk_config)),
        config.clone(),
    )
}

/// Long-poll the topic queue until the process is stopped. Every message
/// yields exactly one logged outcome and is deleted afterward, so a
/// deterministic failure is not redelivered.
async fn poll_queue(
    config: &Config,
    sdk_config: &aws_config::SdkConfig,
    orchestrator: &Orchestrator,
) -> anyhow::Result<()> {
    let queue = TopicQueue::new(config, sdk_config);
    let queue_url = queue.queue_url().await?;
    tracing::info!(%queue_url, "polling for topic messages");

    loop {
        let messages = match queue.receive(&queue_url).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(error = %e, "queue receive failed");
                tokio::time::sleep(RECEIVE_RETRY_DELAY).await;
                continue;
            }
        };

        for message in messages {
            let outcome = match parse_topic(&message.body) {
                Ok(topic) => {
                    tracing::info!(%topic, "processing queue message");
                    orchestrator.run(&topic).await
                }
                Err(e) => Outcome::error(e.to_string()),
            };

            match serde_json::to_string(&outcome) {
                Ok(json) => tracing::info!(outcome = %json, "message processed"),
                Err(e) => tracing::error!(error = %e, "outcome serialization failed"),
            }

            if let Err(e) = queue.delete(&queue_url, &message.receipt_handle).await {
                tracing::error!(error = %e, "failed to delete processed message");
            }
        }
    }
}
