use actix_web::{HttpResponse, http::StatusCode, web};
use serde::{Deserialize, Serialize};

/// JSON error envelope shared by every failing response
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            error: ErrorBody {
                message: message.into(),
                status: status.as_u16(),
                fields: None,
            },
        }
    }

    pub fn with_fields(mut self, fields: serde_json::Value) -> Self {
        self.error.fields = Some(fields);
        self
    }

    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

fn bad_request(response: ErrorResponse) -> actix_web::Error {
    actix_web::error::InternalError::from_response("", response.into_response()).into()
}

/// Map a body or query parse failure to a readable message
fn describe_payload_error(err_string: &str) -> &'static str {
    if err_string.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload"
    } else if err_string.contains("missing field") {
        "Missing required field"
    } else if err_string.contains("unknown field") {
        "Unknown field in request"
    } else if err_string.contains("invalid type") || err_string.contains("invalid digit") {
        "Invalid value type for a field"
    } else {
        "Invalid request format"
    }
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            let mut fields = serde_json::Map::new();
            for (field, errors) in validation_errors.field_errors() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
            }

            bad_request(
                ErrorResponse::new(StatusCode::BAD_REQUEST, "Validation failed")
                    .with_fields(serde_json::Value::Object(fields)),
            )
        }
        other => {
            let err_string = other.to_string();
            bad_request(
                ErrorResponse::new(StatusCode::BAD_REQUEST, describe_payload_error(&err_string))
                    .with_fields(serde_json::json!({ "detail": err_string })),
            )
        }
    })
}

/// Query strings that fail to deserialize become 400 envelopes
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let err_string = err.to_string();
        bad_request(
            ErrorResponse::new(StatusCode::BAD_REQUEST, describe_payload_error(&err_string))
                .with_fields(serde_json::json!({ "detail": err_string })),
        )
    })
}
