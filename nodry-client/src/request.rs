//! Rebuildable request descriptions
//!
//! A request may be sent twice (once more after a token refresh), and a
//! multipart body cannot be replayed once consumed. Callers therefore describe
//! the request and the client builds a fresh `reqwest` request per attempt.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Whether the session's bearer token is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Auth {
    /// Attach the access token if one is held; refresh on 401
    #[default]
    Session,
    /// Never attach a token and never refresh
    Anonymous,
}

/// One field of a multipart form
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl Payload {
    pub(crate) fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    pub(crate) fn to_form(parts: &[FormPart]) -> ClientResult<Form> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => {
                    form.text(name.clone(), value.clone())
                }
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let file = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// Options accepted by [`ApiClient::request`](crate::ApiClient::request)
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    /// Merged over the default JSON headers
    pub headers: HeaderMap,
    pub payload: Payload,
    pub auth: Auth,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn post<B: Serialize + ?Sized>(body: &B) -> ClientResult<Self> {
        Self::with_json(Method::POST, body)
    }

    pub fn put<B: Serialize + ?Sized>(body: &B) -> ClientResult<Self> {
        Self::with_json(Method::PUT, body)
    }

    pub fn multipart(method: Method, parts: Vec<FormPart>) -> Self {
        Self {
            method,
            payload: Payload::Multipart(parts),
            ..Self::default()
        }
    }

    fn with_json<B: Serialize + ?Sized>(
        method: Method,
        body: &B,
    ) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|source| {
            ClientError::Decode {
                endpoint: "request body".to_string(),
                source,
            }
        })?;
        Ok(Self {
            method,
            payload: Payload::Json(value),
            ..Self::default()
        })
    }

    pub fn query(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.auth = Auth::Anonymous;
        self
    }
}
