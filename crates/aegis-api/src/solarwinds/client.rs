use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::SecretString;
use url::Url;

use super::models::QueryRequest;
use crate::auth::{self, BasicCredentials};
use crate::error::Error;
use crate::fetch::{self, Fetched};

/// Path of the SWIS JSON query endpoint, relative to the API base URL.
pub const QUERY_PATH: &str = "SolarWinds/InformationService/v3/Json/Query";

const TUNNEL_CODE_HEADER: &str = "x-tunnel-code";
const ACCESS_CLIENT_ID_HEADER: &str = "cf-access-client-id";
const ACCESS_CLIENT_SECRET_HEADER: &str = "cf-access-client-secret";

/// Raw HTTP client for a SolarWinds Orion server.
pub struct SolarWindsClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: BasicCredentials,
    gateway_headers: HeaderMap,
}

impl SolarWindsClient {
    /// Wrap an existing `reqwest::Client`.
    ///
    /// `base_url` is the SWIS REST root (e.g. `https://orion:17774`).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        credentials: BasicCredentials,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url.trim())?;
        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&format!("{path}/"));

        Ok(Self {
            http,
            base_url,
            credentials,
            gateway_headers: HeaderMap::new(),
        })
    }

    /// Send `X-Tunnel-Code` on every query.
    pub fn with_tunnel_code(mut self, code: &SecretString) -> Result<Self, Error> {
        auth::insert_sensitive(&mut self.gateway_headers, TUNNEL_CODE_HEADER, code)?;
        Ok(self)
    }

    /// Send access-gateway service-token headers on every query.
    pub fn with_access_client(
        mut self,
        client_id: &SecretString,
        client_secret: &SecretString,
    ) -> Result<Self, Error> {
        auth::insert_sensitive(&mut self.gateway_headers, ACCESS_CLIENT_ID_HEADER, client_id)?;
        auth::insert_sensitive(
            &mut self.gateway_headers,
            ACCESS_CLIENT_SECRET_HEADER,
            client_secret,
        )?;
        Ok(self)
    }

    /// The API base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn query_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(QUERY_PATH)?)
    }

    /// Run one SWQL statement. Non-2xx statuses are returned, not raised.
    pub async fn query(&self, endpoint: &str, swql: &str) -> Result<Fetched, Error> {
        let request = self
            .credentials
            .apply(self.http.post(self.query_url()?))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .headers(self.gateway_headers.clone())
            .json(&QueryRequest { query: swql })
            .build()?;
        fetch::execute(&self.http, endpoint, request).await
    }
}
