use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use tracing::{debug, warn};

use replier_common::{EventError, HEALTHZ_PATH, MAX_BODY_SIZE};
use replier_protocol::{Event, Outcome, validate_spec_version};

use crate::Responder;

/// Content-Type do modo estruturado do binding HTTP de CloudEvents.
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// Monta o router HTTP: health check (GET/HEAD) + recepção de eventos em
/// qualquer outro caminho.
pub fn router(responder: Responder) -> Router {
    Router::new()
        .route(HEALTHZ_PATH, get(healthz))
        .fallback(receive_event)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(responder)
}

async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn receive_event(
    State(responder): State<Responder>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let event = match decode_event(&headers, body) {
        Ok(ev) => ev,
        Err(e) => {
            warn!(error = %e, "evento inválido recebido");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    debug!(event_id = %event.id, event_type = %event.ty, "evento recebido via HTTP");
    let (reply, outcome) = responder.handle(&event).await;
    encode_response(reply, outcome)
}

/// Decodifica um evento em modo binário (`ce-*` headers) ou estruturado.
pub fn decode_event(headers: &HeaderMap, body: Bytes) -> Result<Event, EventError> {
    let content_type = header_str(headers, "content-type")?;
    if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with(STRUCTURED_CONTENT_TYPE))
    {
        return Event::from_structured(&body);
    }

    let spec_version = required_header(headers, "ce-specversion", "specversion")?;
    validate_spec_version(&spec_version)?;

    Ok(Event {
        id: required_header(headers, "ce-id", "id")?,
        ty: required_header(headers, "ce-type", "type")?,
        source: required_header(headers, "ce-source", "source")?,
        spec_version,
        data_content_type: content_type,
        data: body,
    })
}

/// Converte o resultado do tratamento em resposta HTTP.
///
/// ACK sem resposta → 202, ACK com resposta → 200, NACK → 500. O evento de
/// resposta, quando houver, segue em modo binário.
pub fn encode_response(reply: Option<Event>, outcome: Outcome) -> Response {
    let status = match (outcome, &reply) {
        (Outcome::Nack, _) => StatusCode::INTERNAL_SERVER_ERROR,
        (Outcome::Ack, Some(_)) => StatusCode::OK,
        (Outcome::Ack, None) => StatusCode::ACCEPTED,
    };

    let Some(reply) = reply else {
        return status.into_response();
    };

    match binary_headers(&reply) {
        Ok(headers) => (status, headers, reply.data).into_response(),
        Err(e) => {
            warn!(event_id = %reply.id, error = %e, "evento de resposta não pode ser codificado");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn binary_headers(event: &Event) -> Result<HeaderMap, EventError> {
    let mut headers = HeaderMap::new();
    headers.insert("ce-specversion", header_value(&event.spec_version, "ce-specversion")?);
    headers.insert("ce-id", header_value(&event.id, "ce-id")?);
    headers.insert("ce-type", header_value(&event.ty, "ce-type")?);
    headers.insert("ce-source", header_value(&event.source, "ce-source")?);
    if let Some(ref ct) = event.data_content_type {
        headers.insert(CONTENT_TYPE, header_value(ct, "content-type")?);
    }
    Ok(headers)
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, EventError> {
    HeaderValue::from_str(value).map_err(|_| EventError::InvalidHeader(name))
}

fn header_str(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, EventError> {
    headers
        .get(name)
        .map(|v| {
            v.to_str()
                .map(str::to_string)
                .map_err(|_| EventError::InvalidHeader(name))
        })
        .transpose()
}

fn required_header(
    headers: &HeaderMap,
    name: &'static str,
    attribute: &'static str,
) -> Result<String, EventError> {
    match header_str(headers, name)? {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EventError::MissingAttribute(attribute)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_headers_for(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("ce-specversion", HeaderValue::from_static("1.0"));
        headers.insert("ce-id", HeaderValue::from_str(id).unwrap());
        headers.insert("ce-type", HeaderValue::from_static("t"));
        headers.insert("ce-source", HeaderValue::from_static("s"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn decode_binary_mode() {
        let ev = decode_event(&binary_headers_for("1"), Bytes::from("[]")).unwrap();
        assert_eq!(ev.id, "1");
        assert_eq!(ev.ty, "t");
        assert_eq!(ev.source, "s");
        assert_eq!(ev.data_content_type.as_deref(), Some("application/json"));
        assert_eq!(ev.data, Bytes::from("[]"));
    }

    #[test]
    fn decode_binary_missing_id() {
        let mut headers = binary_headers_for("1");
        headers.remove("ce-id");
        assert_eq!(
            decode_event(&headers, Bytes::new()),
            Err(EventError::MissingAttribute("id"))
        );
    }

    #[test]
    fn decode_binary_wrong_spec_version() {
        let mut headers = binary_headers_for("1");
        headers.insert("ce-specversion", HeaderValue::from_static("0.3"));
        assert_eq!(
            decode_event(&headers, Bytes::new()),
            Err(EventError::UnsupportedSpecVersion("0.3".into()))
        );
    }

    #[test]
    fn decode_structured_mode() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/cloudevents+json; charset=utf-8"),
        );
        let body = Bytes::from(
            r#"{"specversion":"1.0","id":"9","type":"t","source":"s","data":[{"action":"ack"}]}"#,
        );
        let ev = decode_event(&headers, body).unwrap();
        assert_eq!(ev.id, "9");
        assert_eq!(ev.data, Bytes::from(r#"[{"action":"ack"}]"#));
    }

    #[test]
    fn encode_statuses() {
        assert_eq!(encode_response(None, Outcome::Ack).status(), StatusCode::ACCEPTED);
        assert_eq!(
            encode_response(None, Outcome::Nack).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn encode_reply_in_binary_mode() {
        let reply = Event::new("1.reply", "t.reply", "s.reply").with_data("application/json", "[]");
        let resp = encode_response(Some(reply), Outcome::Ack);
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["ce-id"], "1.reply");
        assert_eq!(headers["ce-type"], "t.reply");
        assert_eq!(headers["ce-source"], "s.reply");
        assert_eq!(headers["ce-specversion"], "1.0");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn encode_reply_with_invalid_header_value() {
        let reply = Event::new("bad\nid", "t", "s");
        let resp = encode_response(Some(reply), Outcome::Ack);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
