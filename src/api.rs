//! Request and response envelopes and the JSON bodies the handlers emit.
//!
//! The envelopes follow the API Gateway proxy shape (`pathParameters`, `statusCode`), so
//! they can be deserialized straight from, and serialized straight into, proxy events.

use crate::{
    error::{Error, Result},
    model::BlogPost,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections;

/// Path parameter carrying the post id.
pub const ID_PARAMETER: &str = "id";

/// An inbound request.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Path parameters extracted by the router.
    #[serde(default)]
    pub path_parameters: Option<collections::HashMap<String, String>>,
    /// Raw body, expected to hold a JSON object when present.
    #[serde(default)]
    pub body: Option<String>,
}

impl Request {
    /// Adds a path parameter.
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(Default::default)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the `id` path parameter.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_path_parameter(ID_PARAMETER, id)
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body to the JSON encoding of `body`.
    pub fn with_json_body(self, body: &Value) -> Self {
        self.with_body(body.to_string())
    }

    /// The non-blank path parameter `name`.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()?
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn id(&self) -> Result<&str> {
        self.path_parameter(ID_PARAMETER).ok_or(Error::MissingId)
    }

    pub(crate) fn json_object(&self) -> Result<Map<String, Value>> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| Error::MalformedRequest("body is missing".to_string()))?;
        match serde_json::from_str(body) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(Error::MalformedRequest(
                "body must be a JSON object".to_string(),
            )),
            Err(error) => Err(Error::MalformedRequest(error.to_string())),
        }
    }
}

/// An outbound response.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: collections::HashMap<String, String>,
    /// UTF-8 JSON body.
    pub body: String,
}

impl Response {
    /// A response whose body is the JSON encoding of `body`.
    pub fn json<T: Serialize + ?Sized>(status_code: u16, body: &T) -> Result<Self> {
        let body = serde_json::to_string(body).map_err(Error::Serialize)?;
        Ok(Self::new(status_code, body))
    }

    /// A `{"message": ...}` response.
    pub fn message(status_code: u16, message: impl Into<String>) -> Self {
        let body = Value::Object(Map::from_iter([(
            "message".to_string(),
            Value::String(message.into()),
        )]));
        Self::new(status_code, body.to_string())
    }

    fn new(status_code: u16, body: String) -> Self {
        let headers = collections::HashMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Credentials".to_string(),
                "true".to_string(),
            ),
        ]);
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Decodes the body.
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Body of an error response.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MessageBody {
    /// Human readable message.
    pub message: String,
}

/// Body of a successful list.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ListBody {
    /// Number of posts.
    pub count: usize,
    /// The posts.
    pub blogs: Vec<BlogPost>,
}

/// Body of a successful create.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBody {
    /// Confirmation message.
    pub message: String,
    /// Id minted for the new post.
    pub post_id: String,
}

/// Body of a successful update.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedBody {
    /// Confirmation message.
    pub message: String,
    /// The post after the update.
    pub updated_blog: BlogPost,
}

/// Body of a successful delete.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBody {
    /// Confirmation message.
    pub message: String,
    /// The post as it was before deletion.
    pub deleted_blog: BlogPost,
}

/// Body of the health check.
#[derive(Clone, Debug, Serialize)]
pub struct HealthBody<'a> {
    /// Liveness message.
    pub message: &'a str,
    /// The request, echoed back.
    pub input: &'a Request,
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::present(Request::default().with_id("a"), Some("a"))]
    #[case::blank(Request::default().with_id("  "), None)]
    #[case::other(Request::default().with_path_parameter("slug", "a"), None)]
    #[case::none(Request::default(), None)]
    fn test_path_parameter(#[case] request: Request, #[case] expected: Option<&str>) {
        assert_eq!(request.path_parameter("id"), expected);
    }

    #[rstest]
    #[case::missing(Request::default(), Some("malformed request body: body is missing"))]
    #[case::not_json(
        Request::default().with_body("{"),
        Some("malformed request body: EOF while parsing")
    )]
    #[case::array(
        Request::default().with_body("[]"),
        Some("malformed request body: body must be a JSON object")
    )]
    #[case::object(Request::default().with_body(r#"{"title": "a"}"#), None)]
    fn test_json_object(#[case] request: Request, #[case] expected_prefix: Option<&str>) {
        let actual = request.json_object().err().map(|error| error.to_string());
        match (actual, expected_prefix) {
            (Some(actual), Some(expected_prefix)) => assert!(
                actual.starts_with(expected_prefix),
                "{actual:?} does not start with {expected_prefix:?}"
            ),
            (actual, expected_prefix) => assert_eq!(actual.as_deref(), expected_prefix),
        }
    }

    #[test]
    fn test_request_from_proxy_event() {
        let request: Request = serde_json::from_value(json!({
            "resource": "/blogs/{id}",
            "httpMethod": "PUT",
            "pathParameters": {"id": "a"},
            "body": "{\"title\": \"b\"}"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::default().with_id("a").with_body(r#"{"title": "b"}"#)
        );
    }

    #[test]
    fn test_request_from_proxy_event_without_parameters() {
        let request: Request = serde_json::from_value(json!({
            "pathParameters": null,
            "body": null
        }))
        .unwrap();
        assert_eq!(request, Request::default());
    }

    #[test]
    fn test_message_response() {
        let response = Response::message(404, "Blog not found");
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, r#"{"message":"Blog not found"}"#);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            response.headers.get("Access-Control-Allow-Origin").map(String::as_str),
            Some("*")
        );
    }

    #[test]
    fn test_response_serializes_to_proxy_result() {
        let response = Response::json(201, &json!({"postId": "a"})).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], json!(201));
        assert_eq!(value["body"], json!(r#"{"postId":"a"}"#));
    }
}
