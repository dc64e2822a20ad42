//! `action=query&meta=siteinfo` requests and responses.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiteInfoResponse {
    query: Option<Query>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Query {
    general: Option<General>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct General {
    sitename: Option<String>,
}

/// URL of the siteinfo query for an `api.php` endpoint.
pub fn siteinfo_url(api: &str) -> String {
    let params = [("action", "query"), ("meta", "siteinfo"), ("format", "json")];
    match reqwest::Url::parse_with_params(api, &params) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{api}?action=query&meta=siteinfo&format=json"),
    }
}

/// Extract `query.general.sitename` from a siteinfo response body.
///
/// Returns `Ok(None)` for valid JSON that lacks the field.
pub fn parse_sitename(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: SiteInfoResponse = serde_json::from_str(body)?;
    Ok(response
        .query
        .and_then(|q| q.general)
        .and_then(|g| g.sitename))
}
