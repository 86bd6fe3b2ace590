use apify_archive_common::{validate_request, ApifyClient, ApifyError, RawPost};
use serde::Serialize;

use crate::post::{normalize_posts, TikTokPost};

/// Apify actor scraping the videos of a profile
pub static ACTOR: &str = "clockworks~free-tiktok-scraper";

#[derive(Clone, Copy, Debug, Default)]
pub struct TikTokOptions {
    /// Ask the actor for video download addresses and save the videos
    pub with_videos: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScraperInput<'a> {
    exclude_pinned_posts: bool,
    profiles: [&'a str; 1],
    results_per_page: u32,
    should_download_covers: bool,
    should_download_slideshow_images: bool,
    should_download_subtitles: bool,
    should_download_videos: bool,
    search_section: &'a str,
    max_profiles_per_query: u32,
}

impl<'a> ScraperInput<'a> {
    fn new(account: &'a str, limit: u32, options: &TikTokOptions) -> Self {
        Self {
            exclude_pinned_posts: false,
            profiles: [account],
            results_per_page: limit,
            should_download_covers: false,
            should_download_slideshow_images: false,
            should_download_subtitles: false,
            should_download_videos: options.with_videos,
            search_section: "",
            max_profiles_per_query: 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TikTokClient<'a> {
    apify: ApifyClient<'a>,
}

impl<'a> TikTokClient<'a> {
    pub fn new(apify: ApifyClient<'a>) -> Self {
        Self { apify }
    }

    /// Fetch up to `limit` raw videos of `account`
    pub async fn fetch(
        &self,
        account: &str,
        limit: u32,
        options: &TikTokOptions,
    ) -> Result<Vec<RawPost>, ApifyError> {
        validate_request(account, limit)?;
        let input = ScraperInput::new(account, limit, options);
        self.apify.run_actor(ACTOR, account, &input).await
    }

    /// Fetch and normalize up to `limit` videos of `account`
    pub async fn posts(
        &self,
        account: &str,
        limit: u32,
        options: &TikTokOptions,
    ) -> Result<Vec<TikTokPost>, ApifyError> {
        normalize_posts(self.fetch(account, limit, options).await?)
    }
}
