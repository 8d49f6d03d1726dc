//! Demonstrates the runner supervising two processes with graceful shutdown.
//!
//! Run with: cargo run --example basic_runner
//! Press Ctrl+C to trigger the shutdown path.

use std::time::Duration;

use vigil_runner::Runner;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    Runner::new()
        .with_named_process("poller", |token| async move {
            let mut polls = 0u32;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!(polls, "Poller stopping");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(1)) => {
                        polls += 1;
                        tracing::info!(polls, "Polled devices");
                    }
                }
            }
            Ok(())
        })
        .with_named_process("reporter", |token| async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Reporter stopping");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(3)) => {
                        tracing::info!("Fleet healthy");
                    }
                }
            }
            Ok(())
        })
        .with_closer(|| async move {
            tracing::info!("Flushing buffers");
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(5))
        .run()
        .await;
}
