//! Maps non-success responses onto the console error taxonomy.

use serde::Deserialize;
use serde_json::Value;

use super::RawResponse;
use crate::{
    error::{ConsoleError, ACCESS_DENIED_MESSAGE},
    models::{BusinessRuleViolation, RuleRef},
};

const RULE_VIOLATION_TYPE: &str = "BUSINESS_RULE_VIOLATION";
const NOT_FOUND_TYPE: &str = "NOT_FOUND";

/// What the client should do with a response.
#[derive(Debug)]
pub(crate) enum Outcome {
    Success,
    /// HTTP 401: the session may be recoverable through a refresh
    Unauthorized,
    Failure(ConsoleError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
    rule_number: Option<i32>,
    hint: Option<String>,
    /// Set by the single-rule check endpoint
    valid: Option<bool>,
}

impl ErrorBody {
    fn is_rule_violation(&self) -> bool {
        self.kind.as_deref() == Some(RULE_VIOLATION_TYPE)
            || (self.valid == Some(false) && self.rule_number.is_some())
    }
}

pub(crate) fn classify(response: &RawResponse) -> Outcome {
    if response.is_success() {
        return Outcome::Success;
    }
    if response.status == 401 {
        return Outcome::Unauthorized;
    }

    let raw: Option<Value> = serde_json::from_str(&response.body).ok();
    let body: ErrorBody = raw
        .as_ref()
        .and_then(|v| ErrorBody::deserialize(v).ok())
        .unwrap_or_default();
    let message = body.message.clone().filter(|m| !m.trim().is_empty());

    let error = match response.status {
        400 if body.is_rule_violation() => {
            ConsoleError::RuleViolation(BusinessRuleViolation {
                rule: body.rule_number.map_or(RuleRef::Unnumbered, RuleRef::Server),
                message: message.unwrap_or_default(),
                hint: body.hint,
            })
        }
        400 => validation_error(message, raw.as_ref()),
        403 => ConsoleError::AuthorizationDenied {
            message: message.unwrap_or_else(|| ACCESS_DENIED_MESSAGE.to_string()),
        },
        404 => ConsoleError::NotFound {
            message: message.unwrap_or_else(|| "Resource not found".to_string()),
        },
        _ if body.kind.as_deref() == Some(NOT_FOUND_TYPE) => ConsoleError::NotFound {
            message: message.unwrap_or_else(|| "Resource not found".to_string()),
        },
        status => ConsoleError::Api {
            status,
            message: message.unwrap_or_else(|| format!("Request failed with status {status}")),
        },
    };
    Outcome::Failure(error)
}

/// An anonymous 401 is a rejected login. The backend's own wording wins.
pub(crate) fn login_failure(response: &RawResponse) -> ConsoleError {
    let raw: Option<Value> = serde_json::from_str(&response.body).ok();
    let message = raw
        .as_ref()
        .and_then(|v| ErrorBody::deserialize(v).ok())
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| first_string_field(raw.as_ref()).map(|(_, message)| message))
        .unwrap_or_else(|| "Login failed".to_string());
    ConsoleError::Api {
        status: response.status,
        message,
    }
}

fn first_string_field(raw: Option<&Value>) -> Option<(String, String)> {
    raw.and_then(Value::as_object).and_then(|fields| {
        fields
            .iter()
            .find_map(|(field, value)| value.as_str().map(|m| (field.clone(), m.to_string())))
    })
}

/// A 400 carries either `{ message }` or a field → message map.
fn validation_error(message: Option<String>, raw: Option<&Value>) -> ConsoleError {
    if let Some(message) = message {
        return ConsoleError::validation("request").with_reason(message);
    }
    match first_string_field(raw) {
        Some((field, reason)) => ConsoleError::validation(field).with_reason(reason),
        None => ConsoleError::validation("request")
            .with_reason("Invalid request. Please check your input."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: u16, body: &str) -> ConsoleError {
        match classify(&RawResponse::new(status, body)) {
            Outcome::Failure(err) => err,
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_success_and_unauthorized() {
        assert!(matches!(classify(&RawResponse::new(204, "")), Outcome::Success));
        assert!(matches!(classify(&RawResponse::new(401, "{}")), Outcome::Unauthorized));
    }

    #[test]
    fn test_rule_violation_kept_verbatim() {
        let err = failure(
            400,
            r#"{"type":"BUSINESS_RULE_VIOLATION","ruleNumber":301,"message":"Confirmation date cannot be in the future","hint":"Pick today or earlier"}"#,
        );
        let violation = err.violation().expect("violation expected");
        assert_eq!(violation.rule, RuleRef::Server(301));
        assert_eq!(violation.message, "Confirmation date cannot be in the future");
        assert_eq!(violation.hint.as_deref(), Some("Pick today or earlier"));
    }

    #[test]
    fn test_failed_rule_check_is_a_violation() {
        let err = failure(
            400,
            r#"{"valid":false,"ruleNumber":201,"message":"Start date cannot be in the future"}"#,
        );
        let violation = err.violation().expect("violation expected");
        assert_eq!(violation.rule, RuleRef::Server(201));
        assert_eq!(violation.message, "Start date cannot be in the future");

        // without a rule number it is an ordinary validation failure
        assert!(matches!(
            failure(400, r#"{"valid":false,"message":"context is required"}"#),
            ConsoleError::Validation { .. }
        ));
    }

    #[test]
    fn test_violation_without_rule_number_stays_unnumbered() {
        let err = failure(
            400,
            r#"{"type":"BUSINESS_RULE_VIOLATION","message":"Plan overlaps an active version"}"#,
        );
        let violation = err.violation().expect("violation expected");
        assert_eq!(violation.rule, RuleRef::Unnumbered);
        assert_ne!(violation.rule, RuleRef::Server(0));
        assert!(!violation.is_local());
        assert_eq!(
            violation.to_string(),
            "Business rule: Plan overlaps an active version"
        );
    }

    #[test]
    fn test_login_failure_keeps_backend_wording() {
        let message = |body: &str| match login_failure(&RawResponse::new(401, body)) {
            ConsoleError::Api { status, message } => {
                assert_eq!(status, 401);
                message
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(message(r#"{"message":"Invalid email or password"}"#), "Invalid email or password");
        assert_eq!(message(r#"{"email":"Unknown tenant user"}"#), "Unknown tenant user");
        assert_eq!(message(r#"{"message":"  "}"#), "Login failed");
        assert_eq!(message(""), "Login failed");
    }

    #[test]
    fn test_forbidden_gets_default_message() {
        match failure(403, "") {
            ConsoleError::AuthorizationDenied { message } => {
                assert_eq!(message, ACCESS_DENIED_MESSAGE)
            }
            other => panic!("unexpected {other:?}"),
        }
        match failure(403, r#"{"message":"Admins only"}"#) {
            ConsoleError::AuthorizationDenied { message } => assert_eq!(message, "Admins only"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_field_validation_map() {
        match failure(400, r#"{"taskId":"Task ID is required"}"#) {
            ConsoleError::Validation { field, reason } => {
                assert_eq!(field, "taskId");
                assert_eq!(reason, "Task ID is required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_and_generic_fallbacks() {
        assert!(matches!(failure(404, "not json"), ConsoleError::NotFound { .. }));
        match failure(500, "") {
            ConsoleError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed with status 500");
            }
            other => panic!("unexpected {other:?}"),
        }
        match failure(500, r#"{"type":"RUNTIME_ERROR","message":"Task not found"}"#) {
            ConsoleError::Api { message, .. } => assert_eq!(message, "Task not found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
