use std::future::Future;

use log::debug;
use reqwest::{Client, ClientBuilder, Response};

use crate::ScrapeError;

/// Anything that can turn a URL into the text of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

#[derive(Debug, Clone)]
pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = ClientBuilder::new().build()?;
        Ok(Self { client })
    }

    pub async fn fetch_url_response(&self, url: &str) -> Result<Response, ScrapeError> {
        debug!("GET {url}");
        // Single attempt. Any non-2xx status is handed back as a network error.
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }

    pub async fn fetch_url_body(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.fetch_url_response(url).await?;
        // `Response::text` would paper over bad bytes with U+FFFD.
        let body = String::from_utf8(response.bytes().await?.to_vec())?;
        Ok(body)
    }
}

impl PageFetcher for RequestClient {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send {
        self.fetch_url_body(url)
    }
}
