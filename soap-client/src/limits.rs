//! Bounds applied to documents received from gateways.
//!
//! Gateway responses are untrusted. Bodies are read up to a byte limit and
//! XML is scanned for nesting depth before any recursive parser sees it.

use crate::error::SoapError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Largest SOAP response body accepted
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Deepest element nesting accepted in a gateway document.
///
/// A device description needs about ten levels and a SOAP fault six.
pub const MAX_XML_DEPTH: usize = 16;

/// Read a response body, failing once it grows past `limit` bytes.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub async fn read_body(mut response: reqwest::Response, limit: usize) -> Result<String, SoapError> {
    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(too_large(limit));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Reject `xml` if elements nest deeper than `max_depth` or it is not well formed.
pub fn check_depth(xml: &str, max_depth: usize) -> Result<(), SoapError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                if depth > max_depth {
                    return Err(SoapError::Parse(format!(
                        "elements nested deeper than {} levels",
                        max_depth
                    )));
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(SoapError::Parse(e.to_string())),
        }
    }
}

fn too_large(limit: usize) -> SoapError {
    SoapError::Parse(format!("response body exceeds {} bytes", limit))
}
