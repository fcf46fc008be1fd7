//! Download orchestrator — plans windows, fetches and merges them, writes one CSV.
//!
//! Windows are fetched strictly one after another, in planned order. The first
//! transport or decode failure aborts the run and nothing is written; there is
//! no retry.

use super::decode::decode;
use super::feed::{Feed, FeedRecord, LoadForecast, RealTimeLmp, SolarForecast, WindForecast};
use super::provider::{FetchError, Headers, Transport, WindowProgress};
use super::query::{request_headers, RequestTemplate};
use super::range::{DateRange, Window};
use super::table::{output_path, write_table, OutputTable};
use super::window::plan_windows_with_step;
use crate::config::Config;
use std::path::PathBuf;

/// Fetch every window and merge the decoded records in window order.
///
/// Records keep the order the API returned them within a window. Overlapping
/// windows are not deduplicated.
pub fn fetch_and_merge<R: FeedRecord>(
    transport: &dyn Transport,
    request: &RequestTemplate,
    headers: &Headers,
    windows: &[Window],
    progress: &dyn WindowProgress,
) -> Result<OutputTable<R>, FetchError> {
    debug_assert_eq!(request.feed(), R::FEED);

    let feed = R::FEED;
    let total = windows.len();
    let mut table = OutputTable::new();

    for (i, window) in windows.iter().enumerate() {
        progress.on_window_start(feed, window, i, total);

        let url = request.render(window);
        tracing::debug!(%feed, transport = transport.name(), %url, "requesting window");

        let payload = transport
            .fetch(&url, headers)
            .and_then(|resp| resp.into_payload())
            .map_err(|source| {
                tracing::warn!(%feed, %window, error = %source, "window request failed");
                FetchError::Transport {
                    feed,
                    index: i,
                    window: *window,
                    source,
                }
            })?;

        let records: Vec<R> = decode(&payload).map_err(|source| FetchError::Decode {
            feed,
            index: i,
            window: *window,
            source,
        })?;

        let count = records.len();
        if count as u64 >= u64::from(request.row_count()) {
            tracing::warn!(
                %feed,
                %window,
                row_count = request.row_count(),
                "window returned rowCount records; the response may be truncated"
            );
        }

        table.extend(records);
        progress.on_window_complete(feed, window, i, total, count);
    }

    Ok(table)
}

/// Outcome of one feed run.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub feed: Feed,
    pub path: PathBuf,
    pub windows: usize,
    pub records: usize,
}

/// Plan, fetch, merge, and write one feed for `range`.
pub fn download_feed<R: FeedRecord>(
    transport: &dyn Transport,
    config: &Config,
    range: &DateRange,
    progress: &dyn WindowProgress,
) -> Result<DownloadSummary, FetchError> {
    let feed = R::FEED;
    let windows = plan_windows_with_step(
        range,
        config.fetch.max_span_days,
        config.fetch.boundary_step,
    )?;

    tracing::info!(
        %feed,
        %range,
        windows = windows.len(),
        max_span_days = config.fetch.max_span_days,
        "starting feed download"
    );

    let request = RequestTemplate::new(&config.api.base_url, feed, config.fetch.row_count);
    let headers = request_headers(&config.api.subscription_key);

    let table: OutputTable<R> = fetch_and_merge(transport, &request, &headers, &windows, progress)?;

    let path = output_path(&config.output.root, feed, range);
    write_table(&table, &path)?;

    tracing::info!(%feed, path = %path.display(), records = table.len(), "feed written");

    Ok(DownloadSummary {
        feed,
        path,
        windows: windows.len(),
        records: table.len(),
    })
}

/// [`download_feed`] for a feed chosen at runtime.
pub fn download(
    feed: Feed,
    transport: &dyn Transport,
    config: &Config,
    range: &DateRange,
    progress: &dyn WindowProgress,
) -> Result<DownloadSummary, FetchError> {
    match feed {
        Feed::LoadForecast => download_feed::<LoadForecast>(transport, config, range, progress),
        Feed::RealTimeLmp => download_feed::<RealTimeLmp>(transport, config, range, progress),
        Feed::SolarForecast => download_feed::<SolarForecast>(transport, config, range, progress),
        Feed::WindForecast => download_feed::<WindForecast>(transport, config, range, progress),
    }
}

/// Run several feeds in order, stopping at the first failure.
pub fn download_feeds(
    feeds: &[Feed],
    transport: &dyn Transport,
    config: &Config,
    range: &DateRange,
    progress: &dyn WindowProgress,
) -> Result<Vec<DownloadSummary>, FetchError> {
    feeds
        .iter()
        .map(|&feed| download(feed, transport, config, range, progress))
        .collect()
}
