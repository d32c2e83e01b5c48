//! livefeed-watch: prints the live-games list as the livefeed updates it.
//!
//! Connects to `LIVEFEED_URL` (default `ws://127.0.0.1:3000/livefeed`) and
//! reprints the list after every change until the server closes the feed.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rps_livefeed::client::{LiveGamesView, LivefeedSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("LIVEFEED_URL")
        .unwrap_or_else(|_| "ws://127.0.0.1:3000/livefeed".to_string());

    let mut subscriber = LivefeedSubscriber::connect(&url)
        .await
        .with_context(|| format!("connecting to {url}"))?;

    let mut view = LiveGamesView::new();
    print!("{view}");
    subscriber
        .run(&mut view, |view| {
            println!("---");
            print!("{view}");
        })
        .await
        .context("reading livefeed")?;

    Ok(())
}
