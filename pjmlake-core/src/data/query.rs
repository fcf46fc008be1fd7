//! Query rendering for Data Miner requests.
//!
//! The parameter order and escaping are part of the remote contract: the
//! range filter value is `<start>to<end>` with each timestamp form-url-escaped
//! (`07%2F02%2F2024+00%3A00`).

use super::feed::Feed;
use super::provider::Headers;
use super::range::{format_timestamp, Window};
use url::form_urlencoded::byte_serialize;

/// Default Data Miner base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pjm.com/api/v1";

/// Header carrying the API subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Everything needed to render one request per window.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    base_url: String,
    feed: Feed,
    row_count: u32,
}

impl RequestTemplate {
    pub fn new(base_url: impl Into<String>, feed: Feed, row_count: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            feed,
            row_count,
        }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Render the full URL for `window`.
    pub fn render(&self, window: &Window) -> String {
        let feed = self.feed;
        format!(
            "{base}/{endpoint}?rowCount={rows}&sort={sort}&order={order}&startRow=1\
             &isActiveMetadata=true&fields={fields}&{param}={start}to{end}",
            base = self.base_url,
            endpoint = feed.endpoint(),
            rows = self.row_count,
            sort = feed.sort_field(),
            order = feed.sort_order().as_str(),
            fields = feed.fields().join(","),
            param = feed.range_param(),
            start = escape(&format_timestamp(&window.start())),
            end = escape(&format_timestamp(&window.end())),
        )
    }
}

/// Headers sent with every request.
pub fn request_headers(subscription_key: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".into(), "application/json, text/plain, */*".into());
    headers.insert("Accept-Encoding".into(), "gzip".into());
    headers.insert(SUBSCRIPTION_KEY_HEADER.into(), subscription_key.into());
    headers
}

fn escape(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
