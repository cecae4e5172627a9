//! Interpretation of kubelet responses.

use crate::core::domain::error::{KubeletError, KubeletResult};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::trace;

/// Reads the whole response and decodes it as JSON into `T`.
///
/// The body is read before the status is looked at so that error responses
/// can carry it. `404 Not Found` short-circuits into
/// [`KubeletError::NotFound`] without decoding.
pub(crate) async fn read_json<T>(response: Response, endpoint: &str) -> KubeletResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let authority = response
        .url()
        .host_str()
        .map(|host| match response.url().port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
        .unwrap_or_else(|| "[unknown]".to_string());

    let body = response
        .bytes()
        .await
        .map_err(|source| KubeletError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    decode(status, &body, endpoint, &authority)
}

fn decode<T>(status: StatusCode, body: &[u8], endpoint: &str, authority: &str) -> KubeletResult<T>
where
    T: DeserializeOwned,
{
    if status == StatusCode::NOT_FOUND {
        return Err(KubeletError::NotFound {
            endpoint: endpoint.to_string(),
        });
    }

    if !status.is_success() {
        return Err(KubeletError::Status {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    trace!(
        message = "raw response from kubelet",
        kubelet = authority,
        body = %String::from_utf8_lossy(body)
    );

    serde_json::from_slice(body).map_err(|source| KubeletError::Decode {
        body: String::from_utf8_lossy(body).into_owned(),
        source,
    })
}
