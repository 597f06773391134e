//! Request fields drawn from an optional JSON body and the query string.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request},
    http::Uri,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use super::error::ApiError;

/// Both field sources of a mutation request, still unmerged.
#[derive(Debug)]
pub struct RequestFields<T> {
    /// `None` when the body is empty.
    pub body: Option<T>,
    pub query: HashMap<String, String>,
}

impl<S, T> FromRequest<S> for RequestFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = query_map(req.uri())?;
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::malformed(format!("unreadable body: {err}")))?;

        Ok(Self {
            body: parse_body(&bytes)?,
            query,
        })
    }
}

/// Decode the query string; a repeated key is ambiguous and rejected.
pub fn query_map(uri: &Uri) -> Result<HashMap<String, String>, ApiError> {
    let mut values = HashMap::new();
    for (key, value) in form_urlencoded::parse(uri.query().unwrap_or("").as_bytes()) {
        if values.insert(key.to_string(), value.into_owned()).is_some() {
            return Err(ApiError::malformed(format!(
                "invalid query string: duplicate parameter `{key}`"
            )));
        }
    }
    Ok(values)
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|err| ApiError::malformed(format!("invalid JSON body: {err}")))
}
