// ServiceNow table API client
//
// Thin wrapper around a shared `reqwest::Client`: URL construction,
// Basic auth, and instrumented execution. Built per request because the
// instance URL and credentials come from mutable configuration.

use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use super::models::TableQuery;
use crate::auth::BasicCredentials;
use crate::error::Error;
use crate::fetch::{self, Fetched};

/// Raw HTTP client for a single ServiceNow instance.
pub struct ServiceNowClient {
    http: reqwest::Client,
    instance_url: Url,
    credentials: BasicCredentials,
}

impl ServiceNowClient {
    /// Wrap an existing `reqwest::Client`.
    ///
    /// `instance_url` is the instance root (e.g.
    /// `https://acme.service-now.com`); a trailing slash is optional.
    pub fn with_client(
        http: reqwest::Client,
        instance_url: &str,
        credentials: BasicCredentials,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            instance_url: normalize_base_url(instance_url)?,
            credentials,
        })
    }

    /// The instance root, always ending with `/`.
    pub fn instance_url(&self) -> &Url {
        &self.instance_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{instance}/api/now/table/{table}?sysparm_...` with every
    /// parameter percent-encoded.
    pub fn table_url(&self, query: &TableQuery) -> Result<Url, Error> {
        let mut url = self
            .instance_url
            .join(&format!("api/now/table/{}", query.table))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("sysparm_display_value", query.display_value.as_str());
            pairs.append_pair("sysparm_query", &query.filter);
            if let Some(limit) = query.limit {
                pairs.append_pair("sysparm_limit", &limit.to_string());
            }
            pairs.append_pair("sysparm_fields", &query.fields.join(","));
        }
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Run a table query. Non-2xx statuses are returned, not raised.
    pub async fn query_table(&self, endpoint: &str, query: &TableQuery) -> Result<Fetched, Error> {
        let url = self.table_url(query)?;
        let request = self
            .credentials
            .apply(self.http.get(url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()?;
        fetch::execute(&self.http, endpoint, request).await
    }
}

/// Deep link into the ServiceNow UI for a record:
/// `{instance}/nav_to.do?uri={table}.do?sys_id={id}` (the `uri` value encoded).
pub fn record_link(instance_url: &Url, table: &str, sys_id: &str) -> String {
    match instance_url.join("nav_to.do") {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("uri", &format!("{table}.do?sys_id={sys_id}"));
            url.to_string()
        }
        Err(_) => format!("{instance_url}nav_to.do?uri={table}.do?sys_id={sys_id}"),
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    url.set_query(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::servicenow::DisplayValue;

    fn client(instance: &str) -> ServiceNowClient {
        let creds = BasicCredentials::new("svc", SecretString::from("pw".to_string()));
        ServiceNowClient::with_client(reqwest::Client::new(), instance, creds)
            .expect("valid instance URL")
    }

    #[test]
    fn table_url_encodes_every_parameter() {
        let query = TableQuery {
            table: "incident".into(),
            filter: "active=true^endISEMPTY".into(),
            fields: vec!["sys_id".into(), "number".into()],
            display_value: DisplayValue::True,
            limit: Some(20),
        };
        let url = client("https://acme.service-now.com").table_url(&query).expect("url");

        assert_eq!(url.path(), "/api/now/table/incident");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("sysparm_display_value".into(), "true".into()),
                ("sysparm_query".into(), "active=true^endISEMPTY".into()),
                ("sysparm_limit".into(), "20".into()),
                ("sysparm_fields".into(), "sys_id,number".into()),
            ]
        );
        assert!(url.as_str().contains("active%3Dtrue%5EendISEMPTY"));
    }

    #[test]
    fn trailing_slash_is_optional() {
        let a = client("https://acme.service-now.com/");
        let b = client("https://acme.service-now.com");
        assert_eq!(a.instance_url(), b.instance_url());
    }

    #[test]
    fn record_link_points_at_nav_to() {
        let base = Url::parse("https://acme.service-now.com/").expect("url");
        let link = record_link(&base, "incident", "abc123");
        assert!(link.starts_with("https://acme.service-now.com/nav_to.do?uri="));
        let parsed = Url::parse(&link).expect("link");
        let uri = parsed
            .query_pairs()
            .find(|(k, _)| k == "uri")
            .map(|(_, v)| v.into_owned());
        assert_eq!(uri.as_deref(), Some("incident.do?sys_id=abc123"));
    }
}
