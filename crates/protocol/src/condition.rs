use replier_common::ConditionError;

use crate::parse::{ParamError, Parse};

/// Predicado de uma instrução, avaliado contra a contagem atual do ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// `""` ou `always`.
    Always,
    /// `retrycount_lt:N`
    RetryCountLt(i64),
    /// `retrycount_gt:N`
    RetryCountGt(i64),
}

impl Condition {
    /// Faz o parse de uma string de condição.
    pub fn parse(src: &str) -> Result<Condition, ConditionError> {
        let mut parse = Parse::new(src);
        let verb = parse.verb();
        let param_err = |e: ParamError| match e {
            ParamError::Missing => ConditionError::MissingParameter(verb.to_string()),
            ParamError::NotAnInteger => ConditionError::NotAnInteger(verb.to_string()),
            ParamError::Unexpected => ConditionError::UnexpectedParameter(verb.to_string()),
        };

        let cond = match verb {
            // Ausência de condição equivale a always.
            "" | "always" => Condition::Always,
            "retrycount_lt" => Condition::RetryCountLt(parse.next_int().map_err(param_err)?),
            "retrycount_gt" => Condition::RetryCountGt(parse.next_int().map_err(param_err)?),
            _ => return Err(ConditionError::Unknown(verb.to_string())),
        };
        parse.finish().map_err(param_err)?;

        Ok(cond)
    }

    /// Avalia a condição para a contagem observada.
    pub fn is_met(&self, count: i64) -> bool {
        match *self {
            Condition::Always => true,
            Condition::RetryCountLt(n) => count < n,
            Condition::RetryCountGt(n) => count > n,
        }
    }
}
