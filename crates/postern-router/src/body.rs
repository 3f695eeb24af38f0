//! Body content negotiation.
//!
//! A fixed table of synchronous, total decoders keyed by MIME type.
//! Decoding never fails: malformed JSON becomes an empty object, and
//! an unrecognized or absent content type leaves the body untouched.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::request::{BodyValue, RouterRequest};

type Decoder = fn(&Bytes) -> BodyValue;

const DECODERS: &[(&str, Decoder)] = &[
    ("text/html", decode_text),
    ("text/plain", decode_text),
    ("application/json", decode_json),
    ("application/x-www-form-urlencoded", decode_form),
];

/// Decode the raw body in place when the declared content type is in
/// the decoder table. Runs once per request, before any handler.
pub fn negotiate(req: &mut RouterRequest) {
    let Some(content_type) = req.header("content-type") else {
        return;
    };
    // MIME parameters (e.g. "; charset=utf-8") do not affect the lookup.
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let Some(decoder) = DECODERS
        .iter()
        .find(|(name, _)| *name == mime)
        .map(|(_, decoder)| *decoder)
    else {
        return;
    };
    let raw = match &req.body {
        BodyValue::Raw(bytes) => bytes.clone(),
        BodyValue::Empty => Bytes::new(),
        // Already decoded; nothing to do.
        _ => return,
    };
    req.body = decoder(&raw);
}

fn decode_text(raw: &Bytes) -> BodyValue {
    BodyValue::Text(String::from_utf8_lossy(raw).into_owned())
}

fn decode_json(raw: &Bytes) -> BodyValue {
    // Total by design: a parse failure substitutes an empty object.
    BodyValue::Json(serde_json::from_slice(raw).unwrap_or_else(|_| Value::Object(Map::new())))
}

fn decode_form(raw: &Bytes) -> BodyValue {
    BodyValue::Form(url::form_urlencoded::parse(raw).into_owned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    fn request_with(content_type: &str, body: &str) -> RouterRequest {
        RouterRequest::new(Method::POST, "/api/test")
            .with_header("content-type", content_type)
            .with_body(BodyValue::Raw(Bytes::from(body.to_string())))
    }

    #[test]
    fn json_body_is_decoded() {
        let mut req = request_with("application/json", r#"{"name":"ada"}"#);
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Json(json!({"name": "ada"})));
    }

    #[test]
    fn malformed_json_becomes_empty_object() {
        let mut req = request_with("application/json", "{not json");
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Json(json!({})));
    }

    #[test]
    fn mime_parameters_are_ignored() {
        let mut req = request_with("application/json; charset=utf-8", r#"[1,2]"#);
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Json(json!([1, 2])));
    }

    #[test]
    fn text_plain_is_decoded_to_text() {
        let mut req = request_with("text/plain", "hello");
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Text("hello".to_string()));
    }

    #[test]
    fn text_html_is_decoded_to_text() {
        let mut req = request_with("text/html", "<p>hi</p>");
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Text("<p>hi</p>".to_string()));
    }

    #[test]
    fn form_body_is_decoded_to_map() {
        let mut req = request_with("application/x-www-form-urlencoded", "a=1&b=two%20words");
        negotiate(&mut req);
        match req.body {
            BodyValue::Form(form) => {
                assert_eq!(form.get("a").map(String::as_str), Some("1"));
                assert_eq!(form.get("b").map(String::as_str), Some("two words"));
            }
            other => panic!("expected form body, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_content_type_leaves_body_untouched() {
        let mut req = request_with("application/octet-stream", "\x00\x01");
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Raw(Bytes::from("\x00\x01".to_string())));
    }

    #[test]
    fn absent_content_type_leaves_body_untouched() {
        let mut req = RouterRequest::new(Method::POST, "/api/test")
            .with_body(BodyValue::Raw(Bytes::from_static(b"raw")));
        negotiate(&mut req);
        assert_eq!(req.body, BodyValue::Raw(Bytes::from_static(b"raw")));
    }
}
