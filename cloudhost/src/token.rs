use std::sync::OnceLock;

use log::debug;
use netio::client::HTTP_CLIENT;

use crate::error::CloudHostError;
use crate::model::AccountResponse;

const ACCOUNTS_ENDPOINT: &str = "https://api.gofile.io/accounts";
const ALLJS_ENDPOINT: &str = "https://gofile.io/dist/js/alljs.js";
const USER_AGENT: &str = "Mozilla/5.0";

static TOKEN: OnceLock<String> = OnceLock::new();
static WT: OnceLock<String> = OnceLock::new();

/// Returns the cached bearer token, acquiring one on first use. Mirrors
/// the reference app's lazily-initialized singleton pattern (spec.md §9,
/// "Singleton/metaclass token cache"): a CLI worker has no startup hook to
/// call an explicit `init()` from, so this initializes on first access
/// instead.
pub fn token() -> Result<&'static str, CloudHostError> {
    if let Some(t) = TOKEN.get() {
        return Ok(t);
    }
    let fetched = fetch_token()?;
    Ok(TOKEN.get_or_init(|| fetched))
}

/// Returns the cached `wt` constant, extracted once from the alljs asset.
pub fn wt() -> Result<&'static str, CloudHostError> {
    if let Some(w) = WT.get() {
        return Ok(w);
    }
    let fetched = fetch_wt()?;
    Ok(WT.get_or_init(|| fetched))
}

fn fetch_token() -> Result<String, CloudHostError> {
    let response: AccountResponse = HTTP_CLIENT
        .post(ACCOUNTS_ENDPOINT)
        .header("User-Agent", USER_AGENT)
        .send()?
        .json()?;

    if response.status != "ok" {
        return Err(CloudHostError::AccountCreationFailed);
    }
    debug!("acquired host-helper account token");
    Ok(response.data.token)
}

fn fetch_wt() -> Result<String, CloudHostError> {
    let body = HTTP_CLIENT
        .get(ALLJS_ENDPOINT)
        .header("User-Agent", USER_AGENT)
        .send()?
        .text()?;

    extract_wt(&body).ok_or(CloudHostError::WtConstantNotFound)
}

fn extract_wt(body: &str) -> Option<String> {
    let marker = "wt: \"";
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')? + start;
    Some(body[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_wt_between_markers() {
        let js = r#"const config = {ready: true, wt: "4fd6sg89d7s6", other: 1};"#;
        assert_eq!(extract_wt(js).as_deref(), Some("4fd6sg89d7s6"));
    }

    #[test]
    fn missing_wt_constant_is_none() {
        assert_eq!(extract_wt("no constant here"), None);
    }
}
