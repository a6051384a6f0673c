//! JSON response writing and error classification.

use crate::error::{BoxError, Error};
use crate::http::{Response, StatusCode, APPLICATION_JSON};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use tracing::warn;

/// Body written for any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body written on success by shapes that declare no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Success {
    pub ok: bool,
}

pub const SUCCESS: Success = Success { ok: true };

/// Status for a failed request: `400` for binding and decoding errors,
/// wherever they sit in the error chain, `500` for anything else.
pub fn error_status(err: &(dyn StdError + 'static)) -> StatusCode {
    if Error::is_client_error(err) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Turn the outcome of a business function into a JSON response.
pub fn write_response<T: Serialize>(result: Result<T, BoxError>) -> Response {
    match result {
        Ok(out) => write_json(StatusCode::OK, &out),
        Err(err) => write_error(&*err),
    }
}

/// Write the `{"error": ...}` envelope for `err`.
pub fn write_error(err: &(dyn StdError + 'static)) -> Response {
    let status = error_status(err);
    write_json(
        status,
        &ErrorBody {
            error: err.to_string(),
        },
    )
}

/// Write `value` with `status`. The status is kept even if serialisation
/// fails; the body is then left empty.
pub fn write_json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    Response::json(status, value).unwrap_or_else(|err| {
        warn!(error = %err, status = status.0, "failed to serve HTTP response");
        Response::new(status).header("Content-Type", APPLICATION_JSON)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Job {
        id: i64,
        #[serde(rename = "jobName")]
        name: String,
    }

    #[test]
    fn test_success_serializes_value() {
        let response = write_response::<Job>(Ok(Job {
            id: 7,
            name: "backup".to_string(),
        }));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.get_header("content-type"), Some(APPLICATION_JSON));
        assert_eq!(
            response.text_body().as_deref(),
            Some(r#"{"id":7,"jobName":"backup"}"#)
        );
    }

    #[test]
    fn test_client_errors_are_400() {
        let response = write_response::<Job>(Err(Box::new(Error::invalid_input(
            "missing required field: sentence",
        ))));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.get_header("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(
            response.text_body().as_deref(),
            Some(r#"{"error":"invalid input\nmissing required field: sentence"}"#)
        );

        let response = write_response::<Job>(Err(Error::from(ErrorKind::InvalidArg).into()));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_500() {
        let response = write_response::<Job>(Err("connection refused".into()));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = response.json_body().unwrap().unwrap();
        assert_eq!(body.error, "connection refused");
    }

    #[test]
    fn test_unserializable_value_keeps_status() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        let response = write_json(StatusCode::OK, &map);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.get_header("content-type"), Some(APPLICATION_JSON));
        assert!(response.body.is_none());
    }
}
