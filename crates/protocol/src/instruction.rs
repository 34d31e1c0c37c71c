use serde::Deserialize;
use serde_json::value::RawValue;

use replier_common::DecodeError;

/// Uma regra vinda no payload do evento.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Instruction {
    pub condition: String,
    pub action: String,
    /// JSON bruto, reenviado sem alteração em `ack+event`/`nack+event`.
    pub reply: Option<Box<RawValue>>,
}

/// Lista ordenada de instruções. A primeira cuja condição for satisfeita vence.
#[derive(Debug, Clone, Default)]
pub struct Instructions(Vec<Instruction>);

impl Instructions {
    /// Decodifica o corpo do evento. Corpo vazio equivale a lista vazia.
    pub fn decode(data: &[u8]) -> Result<Instructions, DecodeError> {
        match data.iter().find(|b| !b.is_ascii_whitespace()) {
            None => return Ok(Instructions::default()),
            Some(&b'[') => {}
            Some(_) => return Err(DecodeError::NotAnArray),
        }

        let list: Vec<Instruction> =
            serde_json::from_slice(data).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        Ok(Instructions(list))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Instructions {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_list() {
        let data = br#"[{"condition":"retrycount_lt:2","action":"nack"},{"action":"ack"}]"#;
        let list = Instructions::decode(data).unwrap();
        assert_eq!(list.len(), 2);

        let first = list.iter().next().unwrap();
        assert_eq!(first.condition, "retrycount_lt:2");
        assert_eq!(first.action, "nack");
        assert!(first.reply.is_none());

        let second = list.iter().nth(1).unwrap();
        assert_eq!(second.condition, "");
        assert_eq!(second.action, "ack");
    }

    #[test]
    fn decode_keeps_reply_verbatim() {
        let data = br#"[{"action":"ack+event","reply":[{"action":"ack"}]}]"#;
        let list = Instructions::decode(data).unwrap();
        let reply = list.iter().next().unwrap().reply.as_ref().unwrap();
        assert_eq!(reply.get(), r#"[{"action":"ack"}]"#);
    }

    #[test]
    fn decode_null_reply_is_absent() {
        let data = br#"[{"action":"ack+event","reply":null}]"#;
        let list = Instructions::decode(data).unwrap();
        assert!(list.iter().next().unwrap().reply.is_none());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let data = br#"[{"discarded":"response"}]"#;
        let list = Instructions::decode(data).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().unwrap().action, "");
    }

    #[test]
    fn decode_empty_body() {
        assert!(Instructions::decode(b"").unwrap().is_empty());
        assert!(Instructions::decode(b"  \n").unwrap().is_empty());
        assert!(Instructions::decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn decode_partial_json_fails() {
        let data = br#"[{"action":"ack"}"#;
        assert!(matches!(
            Instructions::decode(data),
            Err(DecodeError::InvalidJson(_))
        ));
    }

    #[test]
    fn decode_not_an_array_fails() {
        assert!(matches!(
            Instructions::decode(br#"{"action":"ack"}"#),
            Err(DecodeError::NotAnArray)
        ));
    }

    #[test]
    fn decode_wrong_field_type_fails() {
        assert!(matches!(
            Instructions::decode(br#"[{"action":1}]"#),
            Err(DecodeError::InvalidJson(_))
        ));
    }
}
