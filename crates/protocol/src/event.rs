use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::value::RawValue;

use replier_common::{EventError, REPLY_SUFFIX};

pub const SPEC_VERSION: &str = "1.0";
pub const APPLICATION_JSON: &str = "application/json";

/// Evento (subconjunto de atributos CloudEvents 1.0) trocado com o transporte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub ty: String,
    pub source: String,
    pub spec_version: String,
    pub data_content_type: Option<String>,
    pub data: Bytes,
}

/// Formato estruturado (`application/cloudevents+json`).
#[derive(Debug, Deserialize)]
struct StructuredEvent {
    id: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    source: Option<String>,
    specversion: Option<String>,
    datacontenttype: Option<String>,
    data: Option<Box<RawValue>>,
    data_base64: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, ty: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ty: ty.into(),
            source: source.into(),
            spec_version: SPEC_VERSION.to_string(),
            data_content_type: None,
            data: Bytes::new(),
        }
    }

    pub fn with_data(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.data_content_type = Some(content_type.into());
        self.data = data.into();
        self
    }

    /// Constrói o evento de resposta: atributos com sufixo `.reply` e o
    /// payload da instrução como corpo JSON.
    pub fn reply_with(&self, payload: &RawValue) -> Event {
        Event::new(
            format!("{}{REPLY_SUFFIX}", self.id),
            format!("{}{REPLY_SUFFIX}", self.ty),
            format!("{}{REPLY_SUFFIX}", self.source),
        )
        .with_data(APPLICATION_JSON, Bytes::copy_from_slice(payload.get().as_bytes()))
    }

    /// Faz o parse de um evento em modo estruturado.
    pub fn from_structured(body: &[u8]) -> Result<Event, EventError> {
        let ev: StructuredEvent = serde_json::from_slice(body)
            .map_err(|e| EventError::InvalidStructured(e.to_string()))?;

        let spec_version = ev.specversion.ok_or(EventError::MissingAttribute("specversion"))?;
        validate_spec_version(&spec_version)?;

        let data = match (ev.data, ev.data_base64) {
            (Some(_), Some(_)) => {
                return Err(EventError::InvalidStructured(
                    "data e data_base64 são mutuamente exclusivos".into(),
                ));
            }
            (Some(raw), None) => structured_data(&raw, ev.datacontenttype.as_deref()),
            (None, Some(encoded)) => Bytes::from(
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| EventError::InvalidStructured(e.to_string()))?,
            ),
            (None, None) => Bytes::new(),
        };

        Ok(Event {
            id: non_empty(ev.id, "id")?,
            ty: non_empty(ev.ty, "type")?,
            source: non_empty(ev.source, "source")?,
            spec_version,
            data_content_type: ev.datacontenttype,
            data,
        })
    }
}

pub fn validate_spec_version(v: &str) -> Result<(), EventError> {
    if v == SPEC_VERSION {
        Ok(())
    } else {
        Err(EventError::UnsupportedSpecVersion(v.to_string()))
    }
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<String, EventError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EventError::MissingAttribute(name)),
    }
}

// Para conteúdo não-JSON uma string em `data` carrega o corpo literal.
fn structured_data(raw: &RawValue, content_type: Option<&str>) -> Bytes {
    let is_json = content_type.is_none_or(|ct| ct.contains("json"));
    if !is_json && let Ok(text) = serde_json::from_str::<String>(raw.get()) {
        return Bytes::from(text);
    }
    Bytes::copy_from_slice(raw.get().as_bytes())
}
