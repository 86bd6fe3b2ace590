use std::fmt::Display;
use std::future::Future;

use anyhow::Result;
use apify_archive_common::DownloadReport;
use tracing::{error, info, warn};

pub mod config;
pub mod instagram;
pub mod tiktok;

/// Accounts of one service that could not be archived
#[derive(Debug)]
pub struct ArchiveError {
    pub service: &'static str,
    pub failures: Vec<(String, anyhow::Error)>,
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accounts: Vec<_> = self.failures.iter().map(|(a, _)| a.as_str()).collect();
        write!(
            f,
            "errors occured while archiving {} accounts: {}",
            self.service,
            accounts.join(", ")
        )
    }
}

impl std::error::Error for ArchiveError {}

/// Run `archive` for every account. A failing account is reported and the next one still runs.
async fn archive_each<'a, F, Fut>(
    service: &'static str,
    accounts: &'a [String],
    mut archive: F,
) -> Result<()>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut failures = Vec::new();
    for account in accounts {
        if let Err(e) = archive(account.as_str()).await {
            println!("An error occurred for {}: {:#}", account, e);
            error!(service, account = account.as_str(), "archiving failed");
            failures.push((account.clone(), e));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ArchiveError { service, failures }.into())
    }
}

fn print_report(account: &str, report: &DownloadReport) {
    for e in &report.failed {
        println!("{}", e);
        warn!(account, url = %e.url, path = %e.path.display(), "download failed");
    }
    println!(
        "Downloaded {} media files for {} ({} failed)",
        report.downloaded.len(),
        account,
        report.failed.len()
    );
    if report.is_complete() {
        info!(account, "all media downloaded");
    }
}
