// Vendor status-page fetcher
//
// Status pages are unauthenticated JSON documents with arbitrary shapes
// (Atlassian Statuspage, status.io, bespoke endpoints). This client only
// fetches; interpreting the document is the prober's job.

use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};

use crate::error::Error;
use crate::fetch::{self, Fetched};
use crate::transport;

/// Fetches vendor status documents over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct StatusPageClient {
    http: reqwest::Client,
}

impl StatusPageClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET a vendor status document.
    pub async fn fetch(&self, url: &str) -> Result<Fetched, Error> {
        let url = url::Url::parse(url.trim())?;
        let request = self
            .http
            .get(url)
            .header(USER_AGENT, HeaderValue::from_static(transport::USER_AGENT))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()?;
        fetch::execute(&self.http, "VendorStatus", request).await
    }
}
