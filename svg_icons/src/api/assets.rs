use super::IconFetcher;
use crate::error::{IconError, IconResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::Duration;

const USER_AGENT: &str = "SvgIcons/0.1";

/// Fetches icons over HTTP from `<base_url>/<icon_path>/<name>.<extension>`
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    base_url: String,
    icon_path: String,
    extension: String,
}

impl AssetFetcher {
    /// Create a fetcher for the default `assets/icons/*.svg` layout
    pub fn new(base_url: &str) -> IconResult<Self> {
        Self::with_layout(
            base_url,
            "assets/icons",
            "svg",
            USER_AGENT,
            Duration::from_secs(10),
        )
    }

    pub fn with_layout(
        base_url: &str,
        icon_path: &str,
        extension: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> IconResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            icon_path: icon_path.trim_matches('/').to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    /// Build the asset URL for a normalized icon name
    pub fn icon_url(&self, name: &str) -> String {
        let file = format!("{}.{}", urlencoding::encode(name), self.extension);
        if self.icon_path.is_empty() {
            format!("{}/{}", self.base_url, file)
        } else {
            format!("{}/{}/{}", self.base_url, self.icon_path, file)
        }
    }
}

impl IconFetcher for AssetFetcher {
    fn fetch(&self, name: &str) -> BoxFuture<'static, IconResult<String>> {
        let client = self.client.clone();
        let url = self.icon_url(name);
        let name = name.to_string();

        async move {
            log::debug!("Fetching icon from URL: {}", url);

            let response = client.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(IconError::HttpStatus {
                    name,
                    status: status.as_u16(),
                });
            }

            Ok(response.text().await?)
        }
        .boxed()
    }
}
