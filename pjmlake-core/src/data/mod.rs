//! Windowed range-fetch pipeline

pub mod decode;
pub mod download;
pub mod feed;
pub mod http;
pub mod provider;
pub mod query;
pub mod range;
pub mod table;
pub mod window;

pub use decode::decode;
pub use download::{download, download_feed, download_feeds, fetch_and_merge, DownloadSummary};
pub use feed::{Feed, FeedRecord, LoadForecast, RealTimeLmp, SolarForecast, SortOrder, WindForecast};
pub use http::HttpTransport;
pub use provider::{
    FetchError, Headers, LogProgress, NoProgress, RawResponse, Transport, TransportError,
    WindowProgress,
};
pub use query::{request_headers, RequestTemplate, DEFAULT_BASE_URL};
pub use range::{format_timestamp, parse_timestamp, BoundaryStep, DateRange, Window};
pub use table::{output_path, write_table, OutputTable};
pub use window::{plan_windows, plan_windows_with_step};
