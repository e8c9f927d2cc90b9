use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::errors::{AirdropError, Result};
use crate::types::{HolderRecord, HoldersResponse};

/// One page of holders for a token contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolderSource: Send + Sync {
    async fn fetch_page(&self, token: &str, page: u32) -> Result<Vec<HolderRecord>>;
}

/// Klaytn Scope style explorer API.
#[derive(Debug, Clone)]
pub struct ScopeClient {
    client: Client,
    base: Url,
}

impl ScopeClient {
    pub fn new(api_host: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: Url::parse(api_host)?,
        })
    }

    pub fn holders_url(&self, token: &str, page: u32) -> Result<Url> {
        let mut url = self.base.join(&format!("v1/tokens/{}/holders", token))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl HolderSource for ScopeClient {
    async fn fetch_page(&self, token: &str, page: u32) -> Result<Vec<HolderRecord>> {
        let url = self.holders_url(token, page)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AirdropError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed: HoldersResponse = serde_json::from_slice(&body)?;
        Ok(parsed.result)
    }
}
