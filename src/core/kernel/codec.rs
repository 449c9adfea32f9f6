//! Response decoding into a generic structured tree.
//!
//! JSON decodes directly into [`serde_json::Value`]. XML is folded into the
//! same shape so the mappers never see the wire format:
//!
//! - an element carrying `type="array"` becomes a sequence of its children
//! - an element with child elements becomes a map; repeated child names
//!   collapse into a sequence under one key
//! - a leaf element becomes its text as a string, or null when empty
//! - the document element itself is unwrapped

use crate::core::errors::TweetError;
use crate::core::kernel::request::ResponseFormat;
use crate::core::kernel::transport::RawResponse;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use tracing::debug;

/// Dual-channel parse result: a value plus an ok flag, or an empty value and an error message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    value: Value,
    error: Option<String>,
}

impl ParseOutcome {
    pub const fn ok(value: Value) -> Self {
        Self { value, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            value: Value::Null,
            error: Some(message.into()),
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_result(self) -> Result<Value, TweetError> {
        match self.error {
            None => Ok(self.value),
            Some(message) => Err(TweetError::JsonParsing(message)),
        }
    }
}

/// Stateless response decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Format implied by the content type, falling back to the requested one
    pub fn negotiate(content_type: Option<&str>, requested: ResponseFormat) -> ResponseFormat {
        match content_type.map(str::to_ascii_lowercase) {
            Some(ct) if ct.contains("json") => ResponseFormat::Json,
            Some(ct) if ct.contains("xml") => ResponseFormat::Xml,
            _ => requested,
        }
    }

    pub fn parse(response: &RawResponse, requested: ResponseFormat) -> ParseOutcome {
        let format = Self::negotiate(response.content_type.as_deref(), requested);
        let outcome = match format {
            ResponseFormat::Json => Self::parse_json(&response.body),
            ResponseFormat::Xml => Self::parse_xml(&response.body),
        };

        if let Some(error) = outcome.error() {
            debug!(%format, error, "Response body could not be decoded");
        }
        outcome
    }

    pub fn parse_json(body: &[u8]) -> ParseOutcome {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => ParseOutcome::ok(value),
            Err(e) => ParseOutcome::failed(e.to_string()),
        }
    }

    pub fn parse_xml(body: &[u8]) -> ParseOutcome {
        let text = match std::str::from_utf8(body) {
            Ok(text) => text,
            Err(e) => return ParseOutcome::failed(format!("Invalid UTF-8 in XML body: {}", e)),
        };

        match xml_to_value(text) {
            Ok(value) => ParseOutcome::ok(value),
            Err(message) => ParseOutcome::failed(message),
        }
    }
}

/// Same nesting limit serde_json applies to JSON bodies
const MAX_XML_DEPTH: usize = 128;

struct Frame {
    name: String,
    is_array: bool,
    children: Vec<(String, Value)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Self {
        let is_array = start.attributes().flatten().any(|attr| {
            attr.key.as_ref() == b"type" && attr.value.as_ref() == b"array"
        });

        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            is_array,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn close(self) -> (String, Value) {
        let value = if self.is_array {
            Value::Array(self.children.into_iter().map(|(_, v)| v).collect())
        } else if !self.children.is_empty() {
            let mut map = Map::new();
            for (key, child) in self.children {
                match map.get_mut(&key) {
                    Some(Value::Array(items)) => items.push(child),
                    Some(existing) => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, child]);
                    }
                    None => {
                        map.insert(key, child);
                    }
                }
            }
            Value::Object(map)
        } else {
            let text = self.text.trim();
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        };

        (self.name, value)
    }
}

fn xml_to_value(text: &str) -> Result<Value, String> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            format!("XML error at position {}: {}", reader.error_position(), e)
        })?;

        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(format!("XML nesting exceeds {} levels", MAX_XML_DEPTH));
                }
                stack.push(Frame::open(&start));
            }
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start).close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| "Unexpected closing tag".to_string())?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(content) => {
                if let Some(frame) = stack.last_mut() {
                    let decoded = content.decode().map_err(|e| e.to_string())?;
                    let unescaped = unescape(&decoded).map_err(|e| e.to_string())?;
                    frame.text.push_str(&unescaped);
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(frame) = stack.last_mut() {
                    let name = reference.decode().map_err(|e| e.to_string())?;
                    let entity = format!("&{};", name);
                    let resolved = unescape(&entity).map_err(|e| e.to_string())?;
                    frame.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("Unexpected end of XML document".to_string());
    }
    root.ok_or_else(|| "XML document has no root element".to_string())
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<Value>,
    name: String,
    value: Value,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None if root.is_none() => *root = Some(value),
        None => return Err("XML document has more than one root element".to_string()),
    }
    Ok(())
}
