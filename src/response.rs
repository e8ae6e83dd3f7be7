//! Response envelope decoding.
//!
//! XML responses look like:
//!
//! ```text
//! <lfm status="ok">
//!   <session><name>rj</name><key>d580d57f...</key></session>
//! </lfm>
//!
//! <lfm status="failed">
//!   <error code="6">Invalid parameters</error>
//! </lfm>
//! ```
//!
//! The decoder only looks at the envelope. The success payload is opaque
//! here: its first element is handed to `quick_xml`'s serde deserializer
//! for whatever type the caller asked for. With JSON rendering, failures
//! are `{"error": 6, "message": "..."}` and any other object is the payload.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ResponseFormat;
use crate::error::{ApiError, Error, Result};

/// Root element of every XML response.
const ENVELOPE_ROOT: &[u8] = b"lfm";

/// Error record inside a failed XML envelope.
#[derive(Debug, Deserialize)]
struct ErrorRecord {
    #[serde(rename = "@code")]
    code: i32,
    #[serde(rename = "$text", default)]
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Failed,
}

/// Success payload, still undecoded.
#[derive(Debug)]
enum Payload<'a> {
    /// Inner XML of the `lfm` element
    Xml(&'a str),
    Json(serde_json::Value),
}

impl Payload<'_> {
    fn decode<R: DeserializeOwned>(self) -> Result<R> {
        match self {
            Self::Xml(inner) => {
                quick_xml::de::from_str(inner.trim()).map_err(|e| Error::Decode(e.to_string()))
            }
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
            }
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Xml(inner) => inner.trim().to_string(),
            Self::Json(value) => value.to_string(),
        }
    }
}

fn malformed(e: impl std::fmt::Display) -> Error {
    Error::Format(e.to_string())
}

fn root_status(root: &BytesStart<'_>) -> Result<Status> {
    if root.name().as_ref() != ENVELOPE_ROOT {
        return Err(Error::Format(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(root.name().as_ref())
        )));
    }

    let status = root
        .try_get_attribute("status")
        .map_err(malformed)?
        .ok_or_else(|| Error::Format("envelope has no status attribute".to_string()))?;

    match status.value.as_ref() {
        b"ok" => Ok(Status::Ok),
        b"failed" => Ok(Status::Failed),
        other => Err(Error::Format(format!(
            "unknown envelope status {:?}",
            String::from_utf8_lossy(other)
        ))),
    }
}

/// Split an XML envelope into its status and inner markup.
fn open_xml(text: &str) -> Result<(Status, &str)> {
    let mut reader = Reader::from_str(text);

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(root) => {
                let status = root_status(&root)?;
                let span = reader.read_to_end(root.name()).map_err(malformed)?;
                let inner = &text[span.start as usize..span.end as usize];
                return Ok((status, inner));
            }
            Event::Empty(root) => return Ok((root_status(&root)?, "")),
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => return Err(Error::Format("empty response body".to_string())),
            other => {
                return Err(Error::Format(format!(
                    "unexpected content before envelope: {other:?}"
                )));
            }
        }
    }
}

fn open_xml_payload(body: &[u8]) -> Result<Payload<'_>> {
    let text = std::str::from_utf8(body).map_err(malformed)?;
    let (status, inner) = open_xml(text)?;

    match status {
        Status::Ok => Ok(Payload::Xml(inner)),
        Status::Failed => {
            let record: ErrorRecord = quick_xml::de::from_str(inner.trim())
                .map_err(|e| Error::Format(format!("malformed error record: {e}")))?;
            Err(ApiError::new(record.code, record.message.trim()).into())
        }
    }
}

fn open_json_payload(body: &[u8]) -> Result<Payload<'static>> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(malformed)?;
    let Some(object) = value.as_object() else {
        return Err(Error::Format("response is not a JSON object".to_string()));
    };

    if let Some(code) = object.get("error") {
        let code = code
            .as_i64()
            .and_then(|c| i32::try_from(c).ok())
            .ok_or_else(|| Error::Format(format!("non-numeric error code {code}")))?;
        let message = object
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default();
        return Err(ApiError::new(code, message).into());
    }

    Ok(Payload::Json(value))
}

fn open(format: ResponseFormat, body: &[u8]) -> Result<Payload<'_>> {
    match format {
        ResponseFormat::Xml => open_xml_payload(body),
        ResponseFormat::Json => open_json_payload(body),
    }
}

/// Check the envelope and, on success, decode the payload into `dest`.
///
/// With `dest == None` only the status is checked. On any error `dest` is
/// left as it was.
pub fn parse_response<R: DeserializeOwned>(
    format: ResponseFormat,
    body: &[u8],
    dest: Option<&mut R>,
) -> Result<()> {
    let payload = open(format, body)?;
    if let Some(dest) = dest {
        *dest = payload.decode()?;
    }
    Ok(())
}

/// Check the envelope and decode the success payload as `R`.
pub fn decode<R: DeserializeOwned>(format: ResponseFormat, body: &[u8]) -> Result<R> {
    open(format, body)?.decode()
}

/// Check the envelope only; the payload is ignored.
pub fn check(format: ResponseFormat, body: &[u8]) -> Result<()> {
    open(format, body).map(|_| ())
}

/// Check the envelope and return the success payload as text
/// (inner XML, or the JSON object).
pub fn decode_raw(format: ResponseFormat, body: &[u8]) -> Result<String> {
    open(format, body).map(Payload::into_text)
}
