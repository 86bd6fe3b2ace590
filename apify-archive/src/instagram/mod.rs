use anyhow::Result;
use apify_archive_common::{
    download_all, load_posts, persist_posts, posts_file_name, ApifyClient, CredentialProvider,
};
use instagram::{media_layout, InstagramClient, InstagramPost, PREFIX};
use reqwest::Client;
use tokio::fs;
use tracing::info;

use crate::config::instagram::InstagramConfig;
use crate::{archive_each, print_report};

static SERVICE: &str = "instagram";

/// Fetch, save and download the reels of every configured account
pub async fn archive(conf: &InstagramConfig, credentials: &impl CredentialProvider) -> Result<()> {
    let api_key = credentials.api_key()?;
    let client = Client::new();
    let apify = ApifyClient::with_base_url(&client, api_key, conf.api_base_url.clone());
    let ig_client = InstagramClient::new(apify);

    fs::create_dir_all(&conf.download_path).await?;
    archive_each(SERVICE, &conf.accounts, |account| {
        archive_account(&client, &ig_client, conf, account)
    })
    .await
}

async fn archive_account(
    client: &Client,
    ig_client: &InstagramClient<'_>,
    conf: &InstagramConfig,
    account: &str,
) -> Result<()> {
    println!("fetching profile data for... {}", account);
    info!(account, limit = conf.results_limit, "fetching instagram reels");
    let posts = ig_client.posts(account, conf.results_limit).await?;

    let dump = conf.download_path.join(posts_file_name(PREFIX, account));
    persist_posts(&dump, &posts).await?;
    println!("Fetched {} posts for {}", posts.len(), account);

    println!("downloading videos...");
    download_media(client, conf, account, &posts).await
}

/// Download the reels listed in previously saved post dumps without calling the API
pub async fn download_from_dump(conf: &InstagramConfig) -> Result<()> {
    let client = Client::new();
    archive_each(SERVICE, &conf.accounts, |account| {
        download_dump(&client, conf, account)
    })
    .await
}

async fn download_dump(client: &Client, conf: &InstagramConfig, account: &str) -> Result<()> {
    let dump = conf.download_path.join(posts_file_name(PREFIX, account));
    let posts: Vec<InstagramPost> = load_posts(&dump).await?;
    println!("Loaded {} posts for {}", posts.len(), account);
    download_media(client, conf, account, &posts).await
}

async fn download_media(
    client: &Client,
    conf: &InstagramConfig,
    account: &str,
    posts: &[InstagramPost],
) -> Result<()> {
    let layout = media_layout(&conf.download_path, account);
    let report = download_all(client, posts, &layout, conf.max_connections).await?;
    print_report(account, &report);

    Ok(())
}
