use std::fmt;
use std::time::Duration;

use replier_common::ActionError;

use crate::parse::{ParamError, Parse};

/// Resultado de um tratamento, convertido pelo transporte em ACK/NACK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ack,
    Nack,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ack => "ack",
            Outcome::Nack => "nack",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ação executada quando a condição da instrução é satisfeita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ack,
    Nack,
    /// `delay-ack:N` — espera N segundos e então ACK.
    DelayAck(Duration),
    /// `ack+event`
    AckWithEvent,
    /// `nack+event`
    NackWithEvent,
    /// Descarta todas as contagens.
    Reset,
}

impl Action {
    /// Faz o parse de uma string de ação.
    pub fn parse(src: &str) -> Result<Action, ActionError> {
        let mut parse = Parse::new(src);
        let verb = parse.verb();
        let param_err = |e: ParamError| match e {
            ParamError::Missing => ActionError::MissingParameter(verb.to_string()),
            ParamError::NotAnInteger => ActionError::NotAnInteger(verb.to_string()),
            ParamError::Unexpected => ActionError::UnexpectedParameter(verb.to_string()),
        };

        let action = match verb {
            "ack" => Action::Ack,
            "nack" => Action::Nack,
            "delay-ack" => {
                let secs = parse.next_uint().map_err(param_err)?;
                Action::DelayAck(Duration::from_secs(secs))
            }
            "ack+event" => Action::AckWithEvent,
            "nack+event" => Action::NackWithEvent,
            "reset" => Action::Reset,
            _ => return Err(ActionError::Unknown(verb.to_string())),
        };
        parse.finish().map_err(param_err)?;

        Ok(action)
    }

    /// Nome do verbo, usado nos logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Ack => "ack",
            Action::Nack => "nack",
            Action::DelayAck(_) => "delay-ack",
            Action::AckWithEvent => "ack+event",
            Action::NackWithEvent => "nack+event",
            Action::Reset => "reset",
        }
    }
}
