//! Response content negotiation
//!
//! Handlers always answer with JSON. [`negotiate_response`] runs around the
//! whole router and re-renders JSON bodies as XML when the client's `Accept`
//! header asks for it, so success and error payloads follow the same rule.
//!
//! The XML layout has a fixed `<response>` root, one element per mapping
//! key, `<item>` elements for sequence entries, empty elements for nulls and
//! no type attributes.

use axum::{
    body::{Body, to_bytes},
    http::{
        HeaderValue, Request, StatusCode,
        header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";

const XML_ROOT: &str = "response";
const XML_ITEM: &str = "item";
const XML_FALLBACK_KEY: &str = "key";

/// Largest handler body the middleware will buffer for re-rendering
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Errors raised while rendering a payload
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML rendering failed: {0}")]
    Xml(String),
}

/// Serialization format chosen for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Xml,
}

impl ResponseFormat {
    /// XML when the `Accept` value mentions "xml" in any case, JSON otherwise
    pub fn from_accept(accept: Option<&str>) -> Self {
        match accept {
            Some(accept) if accept.to_ascii_lowercase().contains("xml") => ResponseFormat::Xml,
            _ => ResponseFormat::Json,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => APPLICATION_JSON,
            ResponseFormat::Xml => APPLICATION_XML,
        }
    }
}

/// Render `data` in the format selected by `accept`
///
/// Returns the encoded body and its content type.
pub fn render(data: &Value, accept: Option<&str>) -> Result<(Vec<u8>, &'static str), RenderError> {
    let format = ResponseFormat::from_accept(accept);
    let body = match format {
        ResponseFormat::Json => serde_json::to_vec(data)?,
        ResponseFormat::Xml => to_xml(data)?,
    };
    Ok((body, format.content_type()))
}

/// Encode `data` as an XML document rooted at `<response>`
pub fn to_xml(data: &Value) -> Result<Vec<u8>, RenderError> {
    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, XML_ROOT, data)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), RenderError> {
    // Keys that are not valid element names keep their text in an attribute.
    let tag = if is_xml_name(name) { name } else { XML_FALLBACK_KEY };
    let mut start = BytesStart::new(tag);
    if tag != name {
        start.push_attribute(("name", name));
    }
    emit(writer, Event::Start(start))?;

    match value {
        Value::Null => {}
        Value::Bool(b) => write_text(writer, &b.to_string())?,
        Value::Number(n) => write_text(writer, &n.to_string())?,
        Value::String(s) => write_text(writer, s)?,
        Value::Array(items) => {
            for item in items {
                write_element(writer, XML_ITEM, item)?;
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                write_element(writer, key, value)?;
            }
        }
    }

    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), RenderError> {
    emit(writer, Event::Text(BytesText::new(text)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Xml(e.to_string()))
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    starts_well
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}

/// Content negotiation middleware
///
/// Leaves JSON-preferring requests and non-JSON responses untouched.
pub async fn negotiate_response(req: Request<Body>, next: Next) -> Response {
    let accept = req
        .headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let response = next.run(req).await;

    if ResponseFormat::from_accept(accept.as_deref()) == ResponseFormat::Json || !is_json(&response)
    {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let rendered = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => serde_json::from_slice::<Value>(&bytes)
            .map_err(RenderError::from)
            .and_then(|data| render(&data, accept.as_deref())),
        Err(e) => Err(RenderError::Xml(e.to_string())),
    };

    match rendered {
        Ok((body, content_type)) => {
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(e) => {
            error!("Failed to negotiate response body: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(APPLICATION_JSON))
}
