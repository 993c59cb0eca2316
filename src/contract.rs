use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::{AnimotoError, Result, TransportError};
use crate::resource::Resource;
use crate::transport::HttpResponse;

/// Status code a successful operation must answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceContract {
    expected_status: u16,
}

impl ResourceContract {
    pub const fn new(expected_status: u16) -> Self {
        Self { expected_status }
    }

    /// Contract for job submissions: `201 Created`.
    pub const fn created() -> Self {
        Self::new(201)
    }

    /// Contract for reloads: `200 OK`.
    pub const fn ok() -> Self {
        Self::new(200)
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    /// Classify the outcome of an exchange.
    ///
    /// - transport failure: [`AnimotoError::Http`]
    /// - any status other than the expected one: [`AnimotoError::HttpExpectation`]
    /// - expected status with an undecodable body: [`AnimotoError::Contract`]
    ///
    /// On success the decoded body is returned for the caller to hydrate with.
    pub fn validate<R: Resource>(
        &self,
        outcome: std::result::Result<HttpResponse, TransportError>,
    ) -> Result<R::Body> {
        let response = outcome?;

        if response.status != self.expected_status {
            warn!(
                expected = self.expected_status,
                status = response.status,
                "unexpected HTTP status"
            );
            return Err(AnimotoError::HttpExpectation {
                expected: self.expected_status,
                status: response.status,
                body: response.body,
            });
        }

        decode_body::<R::Body>(R::ROOT, R::FIELDS, &response.body).inspect_err(|err| {
            warn!(root = R::ROOT, error = %err, "response body violated the contract");
        })
    }
}

/// Decode a response body into `T`.
///
/// Accepts the API envelope `{"response":{"payload":{"<root>":{...}}}}`, an
/// object keyed by `root`, or the bare resource object. The selected object
/// must carry at least one non-null key from `fields`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    root: &str,
    fields: &[&str],
    body: &str,
) -> Result<T> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| contract_error(format!("body is not valid JSON: {err}"), body))?;

    let selected = select_payload(root, value).map_err(|message| contract_error(message, body))?;
    if !selected.is_object() {
        return Err(contract_error(format!("{root} is not a JSON object"), body));
    }
    let recognised = selected.as_object().is_some_and(|object| {
        fields
            .iter()
            .any(|field| object.get(*field).is_some_and(|value| !value.is_null()))
    });
    if !recognised {
        return Err(contract_error(
            format!("{root} carries none of its fields ({})", fields.join(", ")),
            body,
        ));
    }

    serde_json::from_value(selected)
        .map_err(|err| contract_error(format!("{root} does not match the expected shape: {err}"), body))
}

fn select_payload(root: &str, mut value: Value) -> std::result::Result<Value, String> {
    if let Some(response) = value.get_mut("response") {
        return response
            .get_mut("payload")
            .and_then(|payload| payload.get_mut(root))
            .map(Value::take)
            .ok_or_else(|| format!("response envelope has no payload.{root}"));
    }

    if let Some(inner) = value.get_mut(root) {
        if inner.is_object() {
            return Ok(inner.take());
        }
        return Err(format!("{root} is not a JSON object"));
    }

    Ok(value)
}

fn contract_error(message: String, body: &str) -> AnimotoError {
    AnimotoError::Contract {
        message,
        body: body.to_string(),
    }
}
