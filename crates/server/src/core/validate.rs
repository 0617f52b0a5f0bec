//! Request validation
//!
//! Routes declare the fields they require with [`Rules`] and check them
//! against the decoded [`Payload`] before touching the database.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::{Error, Result};

/// One itemized validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub location: &'static str,
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            location: "body",
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// Failure on a path segment rather than the body.
    pub fn param(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            location: "params",
            ..Self::new(path, msg)
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    field: &'static str,
    message: &'static str,
}

/// Declared set of required string fields for a route.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_string(mut self, field: &'static str, message: &'static str) -> Self {
        self.rules.push(Rule { field, message });
        self
    }

    /// Every failing rule, in declaration order.
    pub fn check(&self, body: &Value) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter(|rule| !body.get(rule.field).is_some_and(Value::is_string))
            .map(|rule| FieldError::new(rule.field, rule.message))
            .collect()
    }

    pub fn validate(&self, body: &Value) -> Result<()> {
        let errors = self.check(body);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// Parse a numeric path identifier. Any integer is accepted; ids with no
/// matching row are left for the lookup to report.
pub fn parse_id(field: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        Error::Validation(vec![FieldError::param(
            field,
            format!("{field} must be an integer"),
        )])
    })
}

/// Request body decoded into a JSON value.
///
/// JSON and urlencoded form bodies are accepted. An empty body, or one sent
/// with any other content type, decodes to an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(pub Value);

impl Default for Payload {
    fn default() -> Self {
        Payload(Value::Object(Map::new()))
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| Error::InvalidBody(e.body_text()))?;
            let object = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<_, _>>();
            return Ok(Payload(Value::Object(object)));
        }

        if !content_type.starts_with("application/json") {
            return Ok(Payload::default());
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::InvalidBody(e.body_text()))?;
        Payload::from_json(&bytes)
    }
}

impl Payload {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::default());
        }
        serde_json::from_slice(bytes)
            .map(Payload)
            .map_err(|e| Error::InvalidBody(e.to_string()))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn string_or(&self, name: &str, default: &str) -> Result<String> {
        match self.field(name) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(Error::invalid_field(name, format!("{name} must be a string"))),
        }
    }

    /// Integers may arrive as JSON numbers or, from forms, as strings.
    pub fn i64_or(&self, name: &str, default: i64) -> Result<i64> {
        let parsed = match self.field(name) {
            None => return Ok(default),
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        };
        parsed.ok_or_else(|| Error::invalid_field(name, format!("{name} must be an integer")))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        let parsed = match self.field(name) {
            None => return Ok(default),
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        };
        parsed.ok_or_else(|| Error::invalid_field(name, format!("{name} must be a boolean")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_rules() -> Rules {
        Rules::new()
            .require_string("username", "Username is required")
            .require_string("password", "Password is required")
    }

    #[test]
    fn test_rules_report_each_missing_field() {
        let errors = user_rules().check(&json!({}));
        assert_eq!(
            errors,
            vec![
                FieldError::new("username", "Username is required"),
                FieldError::new("password", "Password is required"),
            ]
        );
    }

    #[test]
    fn test_rules_reject_non_string_values() {
        let errors = user_rules().check(&json!({ "username": 42, "password": "pw" }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "username");

        assert!(user_rules()
            .validate(&json!({ "username": "alice", "password": "secret" }))
            .is_ok());
        // Empty strings are still strings
        assert!(user_rules()
            .validate(&json!({ "username": "", "password": "" }))
            .is_ok());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "17").unwrap(), 17);
        assert!(matches!(parse_id("id", "abc"), Err(Error::Validation(_))));
        assert_eq!(parse_id("id", "0").unwrap(), 0);
        assert_eq!(parse_id("id", "-3").unwrap(), -3);
        assert!(matches!(parse_id("id", "1.5"), Err(Error::Validation(_))));

        let Err(Error::Validation(errors)) = parse_id("id", "abc") else {
            panic!("non-numeric ids must be rejected");
        };
        assert_eq!(errors[0].location, "params");
        assert_eq!(errors[0].path, "id");
    }

    #[test]
    fn test_payload_defaults_and_overrides() {
        let payload = Payload::from_json(br#"{"title":"Hello","published":"false","authorId":"7"}"#).unwrap();

        assert_eq!(payload.string_or("title", "Post Title").unwrap(), "Hello");
        assert_eq!(payload.string_or("content", "Post Body").unwrap(), "Post Body");
        assert!(!payload.bool_or("published", true).unwrap());
        assert_eq!(payload.i64_or("authorId", 1).unwrap(), 7);
        assert_eq!(payload.i64_or("categoryId", 1).unwrap(), 1);

        let bad = Payload::from_json(br#"{"authorId":"seven","title":3}"#).unwrap();
        assert!(bad.i64_or("authorId", 1).is_err());
        assert!(bad.string_or("title", "x").is_err());
    }

    #[test]
    fn test_payload_empty_and_malformed() {
        assert_eq!(Payload::from_json(b"  \n").unwrap(), Payload::default());
        assert!(matches!(
            Payload::from_json(b"{ not json"),
            Err(Error::InvalidBody(_))
        ));
    }
}
