//! Blocking HTTP transport backed by `reqwest`.
//!
//! The client does not negotiate compression itself: callers send
//! `Accept-Encoding: gzip` explicitly and [`RawResponse::into_payload`]
//! handles decompression, so the body is returned exactly as received.

use super::provider::{Headers, RawResponse, Transport, TransportError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_ENCODING};
use std::time::Duration;

/// Data Miner transport over `reqwest::blocking`.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pjmlake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Other(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Other(format!("invalid value for header '{name}': {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    fn fetch(&self, url: &str, headers: &Headers) -> Result<RawResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .headers(Self::header_map(headers)?)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    TransportError::NetworkUnreachable(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;

        let status = resp.status().as_u16();
        let content_encoding = resp
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = resp
            .bytes()
            .map_err(|e| TransportError::Other(format!("failed to read response body: {e}")))?
            .to_vec();

        Ok(RawResponse {
            status,
            content_encoding,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::{request_headers, SUBSCRIPTION_KEY_HEADER};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use mockito::{Matcher, Server};
    use std::io::Write;

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn sends_headers_and_returns_gzip_body_untouched() {
        let mut server = Server::new();
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(br#"{"items":[]}"#).unwrap();
        let gz = enc.finish().unwrap();

        let mock = server
            .mock("GET", "/rt_hrl_lmps")
            .match_query(Matcher::Any)
            .match_header(SUBSCRIPTION_KEY_HEADER, "test-key")
            .match_header("accept-encoding", "gzip")
            .with_status(200)
            .with_header("content-encoding", "gzip")
            .with_body(gz.clone())
            .create();

        let url = format!("{}/rt_hrl_lmps?rowCount=1", server.url());
        let resp = transport().fetch(&url, &request_headers("test-key")).unwrap();

        mock.assert();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_encoding.as_deref(), Some("gzip"));
        assert_eq!(resp.body, gz);
        assert_eq!(resp.into_payload().unwrap(), br#"{"items":[]}"#);
    }

    #[test]
    fn query_string_reaches_the_server_unchanged() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/load_frcstd_hist")
            .match_query(Matcher::UrlEncoded(
                "forecast_hour_beginning_ept".into(),
                "07/02/2024 00:00to07/03/2024 00:00".into(),
            ))
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create();

        let url = format!(
            "{}/load_frcstd_hist?rowCount=5&forecast_hour_beginning_ept=\
             07%2F02%2F2024+00%3A00to07%2F03%2F2024+00%3A00",
            server.url()
        );
        transport().fetch(&url, &Headers::new()).unwrap();
        mock.assert();
    }

    #[test]
    fn error_status_is_returned_not_raised() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/rt_hrl_lmps")
            .with_status(401)
            .with_body("Access denied due to invalid subscription key.")
            .create();

        let url = format!("{}/rt_hrl_lmps", server.url());
        let resp = transport().fetch(&url, &Headers::new()).unwrap();
        assert_eq!(resp.status, 401);
        assert!(matches!(
            resp.into_payload(),
            Err(TransportError::Status { status: 401, .. })
        ));
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let err = transport()
            .fetch("http://127.0.0.1:9/rt_hrl_lmps", &Headers::new())
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::NetworkUnreachable(_) | TransportError::Other(_)
        ));
    }

    #[test]
    fn invalid_header_value_is_rejected_before_sending() {
        let mut headers = Headers::new();
        headers.insert("X-Bad".into(), "line\nbreak".into());
        let err = transport()
            .fetch("http://127.0.0.1:9/", &headers)
            .unwrap_err();
        assert!(matches!(err, TransportError::Other(_)));
    }
}
