use {async_trait::async_trait, tracing::warn, warren_common::Segment};

use crate::{Error, Result};

/// Durable storage for binary payloads.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload raw bytes and return a reference URL for them.
    async fn upload(&self, bytes: &[u8]) -> Result<String>;
}

/// Resource-service client.
///
/// Bytes are POSTed to `{base}/upload`; the service answers with a storage
/// path which is referenced back as `{base}/images?path=<path>`.
pub struct HttpUploader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/upload", self.base_url))
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UploadRejected {
                status: status.as_u16(),
            });
        }

        let path = resp.text().await?;
        let path = path.trim().trim_matches('"');
        if path.is_empty() {
            return Err(Error::message("upload returned an empty path"));
        }
        Ok(format!("{}/images?path={path}", self.base_url))
    }
}

/// Rewrite raw image segments into hosted references.
///
/// An upload failure leaves the original bytes in place so the message still
/// goes out — degraded, not dropped.
pub async fn rewrite_rich_content(segments: Vec<Segment>, uploader: &dyn Uploader) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Image(bytes) => match uploader.upload(&bytes).await {
                Ok(url) => out.push(Segment::ImageUrl(url)),
                Err(e) => {
                    warn!(error = %e, "image upload failed, keeping raw bytes");
                    out.push(Segment::Image(bytes));
                },
            },
            other => out.push(other),
        }
    }
    out
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUploader {
        url: Option<String>,
    }

    #[async_trait]
    impl Uploader for FixedUploader {
        async fn upload(&self, _bytes: &[u8]) -> Result<String> {
            self.url
                .clone()
                .ok_or_else(|| Error::message("upload unavailable"))
        }
    }

    #[tokio::test]
    async fn rewrites_images_to_urls() {
        let uploader = FixedUploader {
            url: Some("https://res.example/images?path=abc".into()),
        };
        let segments = vec![
            Segment::Text("trace follows".into()),
            Segment::Image(vec![1, 2, 3]),
        ];
        let out = rewrite_rich_content(segments, &uploader).await;
        assert_eq!(out[0], Segment::Text("trace follows".into()));
        assert_eq!(
            out[1],
            Segment::ImageUrl("https://res.example/images?path=abc".into())
        );
    }

    #[tokio::test]
    async fn upload_failure_keeps_bytes() {
        let uploader = FixedUploader { url: None };
        let segments = vec![Segment::Image(vec![9, 9])];
        let out = rewrite_rich_content(segments, &uploader).await;
        assert_eq!(out, vec![Segment::Image(vec![9, 9])]);
    }

    #[tokio::test]
    async fn existing_urls_pass_through() {
        let uploader = FixedUploader { url: None };
        let segments = vec![Segment::ImageUrl("https://x/y.png".into())];
        let out = rewrite_rich_content(segments.clone(), &uploader).await;
        assert_eq!(out, segments);
    }
}
