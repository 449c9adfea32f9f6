use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tweetnet::endpoints::{ListMembers, Mentions, TimelineParams};
use tweetnet::{build_client, TwitterConfig, UserTarget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TwitterConfig::from_env("TWITTER")
        .context("Set TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET, TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET")?;
    let client = build_client(config)?;

    // Both requests run concurrently on the runtime
    let mentions = client.spawn(Mentions(TimelineParams {
        count: 5,
        include_entities: true,
        ..Default::default()
    }));
    let owner = UserTarget::screen_name("twitterapi").context("List owner must not be blank")?;
    let members = client.spawn(ListMembers::new(owner, 2_031_945).at_cursor("-1"));

    match mentions.completion().await {
        Some(Ok(statuses)) => {
            info!("Fetched {} mentions", statuses.len());
            for status in &statuses {
                let author = status.user.as_ref().map_or("?", |u| u.screen_name.as_str());
                println!("@{}: {}", author, status.text);
            }
        }
        Some(Err(e)) => warn!(kind = %e.kind(), "Mentions failed: {}", e),
        None => warn!("Mentions request was cancelled"),
    }

    match members.completion().await {
        Some(Ok(page)) => {
            info!(
                next_cursor = %page.next_cursor,
                "Fetched {} list members",
                page.users.len()
            );
            for user in &page.users {
                println!("{} (@{})", user.name, user.screen_name);
            }
        }
        Some(Err(e)) => warn!(kind = %e.kind(), "List members failed: {}", e),
        None => warn!("List members request was cancelled"),
    }

    Ok(())
}
