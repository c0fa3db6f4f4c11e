// ABOUTME: HTTP fetching of movie pages and their subsections, with size limits and charset decoding.
// ABOUTME: Produces the raw concatenated page blob that the cache stores and the extractors parse.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::record::title_url;

/// Maximum allowed content length per page (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Subsection pages appended to the main title page, in fetch order.
pub const DEFAULT_SUBSECTIONS: &[&str] = &[
    "parentalguide",
    "fullcredits",
    "awards",
    "business",
    "companycredits",
    "technical",
    "keywords",
    "plotsummary",
];

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub parse_non_200: bool,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using charset hints from the content-type header.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using the content-type charset or detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a single page.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ScrapeError> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, "Fetch", None));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!(url, "requesting page");
    let response = request.send().await.map_err(|e| request_error(url, e))?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| request_error(url, e))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 && !opts.parse_non_200 {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

fn request_error(url: &str, e: reqwest::Error) -> ScrapeError {
    if e.is_timeout() {
        ScrapeError::timeout(url, "Fetch", Some(anyhow::Error::new(e)))
    } else {
        ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    }
}

/// Fetches the title page for `id` followed by each subsection page, and
/// returns their bodies concatenated in that order.
pub async fn fetch_movie_blob(
    client: &reqwest::Client,
    base_url: &str,
    id: u32,
    subsections: &[String],
    opts: &FetchOptions,
) -> Result<Bytes, ScrapeError> {
    let movie_url = title_url(base_url, id);
    info!(id, url = %movie_url, "retrieving movie page");

    let mut blob = BytesMut::new();
    blob.extend_from_slice(&fetch(client, &movie_url, opts).await?.body);
    for sub in subsections {
        debug!(id, subsection = %sub, "loading subsection");
        let page = fetch(client, &format!("{}{}/", movie_url, sub), opts).await?;
        blob.extend_from_slice(&page.body);
    }
    Ok(blob.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn create_test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/test");
            then.status(200)
                .header("content-type", "text/plain; charset=utf-8")
                .body("hello");
        });

        let client = create_test_client();
        let result = fetch(&client, &server.url("/test"), &FetchOptions::default()).await;
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.status, 200);
        assert_eq!(result.text(), "hello");
    }

    #[tokio::test]
    async fn test_fetch_non_200_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/notfound");
            then.status(404).body("not found");
        });

        let client = create_test_client();
        let result = fetch(&client, &server.url("/notfound"), &FetchOptions::default()).await;
        mock.assert();

        let err = result.expect_err("should fail on 404");
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_non_200_allowed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/notfound");
            then.status(404).body("not found");
        });

        let client = create_test_client();
        let opts = FetchOptions {
            parse_non_200: true,
            ..Default::default()
        };

        let result = fetch(&client, &server.url("/notfound"), &opts).await;
        mock.assert();

        let result = result.expect("fetch should succeed with parse_non_200");
        assert_eq!(result.status, 404);
    }

    #[tokio::test]
    async fn test_fetch_sends_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/lang")
                .header("accept-language", "en-US");
            then.status(200).body("ok");
        });

        let client = create_test_client();
        let mut opts = FetchOptions::default();
        opts.headers
            .insert("Accept-Language".to_string(), "en-US".to_string());

        let result = fetch(&client, &server.url("/lang"), &opts).await;
        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_urls() {
        let client = create_test_client();
        let opts = FetchOptions::default();
        assert!(fetch(&client, "", &opts).await.unwrap_err().is_invalid_url());
        assert!(fetch(&client, "not a url", &opts)
            .await
            .unwrap_err()
            .is_invalid_url());
        assert!(fetch(&client, "ftp://example.com/x", &opts)
            .await
            .unwrap_err()
            .is_invalid_url());
    }

    #[tokio::test]
    async fn test_fetch_movie_blob_concatenates_subsections() {
        let server = MockServer::start();
        let main = server.mock(|when, then| {
            when.method(GET).path("/title/tt0468569/");
            then.status(200).body("<main>");
        });
        let credits = server.mock(|when, then| {
            when.method(GET).path("/title/tt0468569/fullcredits/");
            then.status(200).body("<credits>");
        });
        let awards = server.mock(|when, then| {
            when.method(GET).path("/title/tt0468569/awards/");
            then.status(200).body("<awards>");
        });

        let client = create_test_client();
        let subsections = vec!["fullcredits".to_string(), "awards".to_string()];
        let blob = fetch_movie_blob(
            &client,
            &server.url("/title/tt"),
            468569,
            &subsections,
            &FetchOptions::default(),
        )
        .await
        .expect("blob fetch should succeed");

        main.assert();
        credits.assert();
        awards.assert();
        assert_eq!(&blob[..], b"<main><credits><awards>");
    }

    #[tokio::test]
    async fn test_fetch_movie_blob_fails_on_missing_subsection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/title/tt0000001/");
            then.status(200).body("<main>");
        });
        server.mock(|when, then| {
            when.method(GET).path("/title/tt0000001/keywords/");
            then.status(500);
        });

        let client = create_test_client();
        let err = fetch_movie_blob(
            &client,
            &server.url("/title/tt"),
            1,
            &["keywords".to_string()],
            &FetchOptions::default(),
        )
        .await
        .expect_err("a failing subsection fails the blob");
        assert!(err.is_fetch());
        assert!(err.target.ends_with("/title/tt0000001/keywords/"));
    }

    #[test]
    fn test_max_content_length_constant() {
        assert_eq!(MAX_CONTENT_LENGTH, 10 * 1024 * 1024);
    }

    #[test]
    fn test_decode_iso_8859_1_with_chardetng() {
        let iso_bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_body(iso_bytes, None);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_decode_body_with_charset() {
        let body = "Léon: The Professional".as_bytes();
        let decoded = decode_body(body, Some("text/html; charset=utf-8"));
        assert_eq!(decoded, "Léon: The Professional");
    }
}
