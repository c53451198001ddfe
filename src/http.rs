// Blocking HTTP plumbing shared by the xkcd and VK clients.

use crate::error::{Error, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) const USER_AGENT: &str = concat!("xkcd-vk-poster/", env!("CARGO_PKG_VERSION"));

/// Build the single client used for every call of a run. Timeouts are the
/// reqwest defaults.
pub fn build_client() -> Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Turn a non-success status into `Error::Transport` and return the body
/// as raw JSON.
pub(crate) fn read_value(response: Response, context: &str) -> Result<Value> {
    let response = response.error_for_status()?;
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|source| Error::Decode {
        context: context.to_string(),
        source,
    })
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|source| Error::Decode {
        context: context.to_string(),
        source,
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let value = read_value(response, context)?;
    decode(value, context)
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
