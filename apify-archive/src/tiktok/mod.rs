use anyhow::Result;
use apify_archive_common::{
    download_all, load_posts, persist_posts, posts_file_name, ApifyClient, CredentialProvider,
};
use reqwest::Client;
use tiktok::{media_layout, TikTokClient, TikTokPost, PREFIX};
use tokio::fs;
use tracing::info;

use crate::config::tiktok::TikTokConfig;
use crate::{archive_each, print_report};

static SERVICE: &str = "tiktok";

/// Fetch, save and download the videos of every configured account
pub async fn archive(conf: &TikTokConfig, credentials: &impl CredentialProvider) -> Result<()> {
    let api_key = credentials.api_key()?;
    let client = Client::new();
    let apify = ApifyClient::with_base_url(&client, api_key, conf.api_base_url.clone());
    let tt_client = TikTokClient::new(apify);

    fs::create_dir_all(&conf.download_path).await?;
    archive_each(SERVICE, &conf.accounts, |account| {
        archive_account(&client, &tt_client, conf, account)
    })
    .await
}

async fn archive_account(
    client: &Client,
    tt_client: &TikTokClient<'_>,
    conf: &TikTokConfig,
    account: &str,
) -> Result<()> {
    println!("fetching profile data for... {}", account);
    info!(
        account,
        limit = conf.results_limit,
        with_videos = conf.with_videos,
        "fetching tiktok videos"
    );
    let posts = tt_client
        .posts(account, conf.results_limit, &conf.options())
        .await?;

    let dump = conf.download_path.join(posts_file_name(PREFIX, account));
    persist_posts(&dump, &posts).await?;
    println!("Fetched {} posts for {}", posts.len(), account);

    download_media(client, conf, account, &posts).await
}

/// Download the media listed in previously saved post dumps without calling the API
pub async fn download_from_dump(conf: &TikTokConfig) -> Result<()> {
    let client = Client::new();
    archive_each(SERVICE, &conf.accounts, |account| {
        download_dump(&client, conf, account)
    })
    .await
}

async fn download_dump(client: &Client, conf: &TikTokConfig, account: &str) -> Result<()> {
    let dump = conf.download_path.join(posts_file_name(PREFIX, account));
    let posts: Vec<TikTokPost> = load_posts(&dump).await?;
    println!("Loaded {} posts for {}", posts.len(), account);
    download_media(client, conf, account, &posts).await
}

async fn download_media(
    client: &Client,
    conf: &TikTokConfig,
    account: &str,
    posts: &[TikTokPost],
) -> Result<()> {
    let layout = media_layout(&conf.download_path, account, &conf.options());
    let report = download_all(client, posts, &layout, conf.max_connections).await?;
    print_report(account, &report);

    Ok(())
}
