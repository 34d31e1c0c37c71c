/// Falha ao extrair um parâmetro de `verbo[:parâmetro]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    Missing,
    NotAnInteger,
    Unexpected,
}

/// Cursor sobre uma string `verbo[:parâmetro...]` para extrair partes sequencialmente.
///
/// Todo `:` separa partes, então `a:b:c` tem dois parâmetros.
pub struct Parse<'a> {
    verb: &'a str,
    params: Vec<&'a str>,
    pos: usize,
}

impl<'a> Parse<'a> {
    pub fn new(src: &'a str) -> Parse<'a> {
        let mut parts = src.split(':');
        // split sempre produz ao menos um item
        let verb = parts.next().unwrap_or_default();
        Parse {
            verb,
            params: parts.collect(),
            pos: 0,
        }
    }

    /// Verbo, sem espaços removidos.
    pub fn verb(&self) -> &'a str {
        self.verb
    }

    /// Retorna o próximo parâmetro como i64 (espaços ao redor são ignorados).
    pub fn next_int(&mut self) -> Result<i64, ParamError> {
        self.next()?
            .trim()
            .parse::<i64>()
            .map_err(|_| ParamError::NotAnInteger)
    }

    /// Retorna o próximo parâmetro como u64 (espaços ao redor são ignorados).
    pub fn next_uint(&mut self) -> Result<u64, ParamError> {
        self.next()?
            .trim()
            .parse::<u64>()
            .map_err(|_| ParamError::NotAnInteger)
    }

    /// Verifica se todos os parâmetros foram consumidos.
    pub fn finish(&self) -> Result<(), ParamError> {
        if self.has_remaining() {
            Err(ParamError::Unexpected)
        } else {
            Ok(())
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.params.len()
    }

    fn next(&mut self) -> Result<&'a str, ParamError> {
        let param = self.params.get(self.pos).ok_or(ParamError::Missing)?;
        self.pos += 1;
        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_verb_only() {
        let parse = Parse::new("ack");
        assert_eq!(parse.verb(), "ack");
        assert!(!parse.has_remaining());
        parse.finish().unwrap();
    }

    #[test]
    fn parse_empty_string() {
        let parse = Parse::new("");
        assert_eq!(parse.verb(), "");
        parse.finish().unwrap();
    }

    #[test]
    fn parse_trims_integer_parameter() {
        let mut parse = Parse::new("delay-ack: 2 ");
        assert_eq!(parse.verb(), "delay-ack");
        assert_eq!(parse.next_uint().unwrap(), 2);
        parse.finish().unwrap();
    }

    #[test]
    fn parse_negative_int() {
        let mut parse = Parse::new("retrycount_gt:-1");
        assert_eq!(parse.next_int().unwrap(), -1);
        let mut parse = Parse::new("delay-ack:-1");
        assert_eq!(parse.next_uint(), Err(ParamError::NotAnInteger));
    }

    #[test]
    fn parse_missing_parameter() {
        let mut parse = Parse::new("retrycount_lt");
        assert_eq!(parse.next_int(), Err(ParamError::Missing));
    }

    #[test]
    fn parse_extra_parameters_fail_finish() {
        let mut parse = Parse::new("retrycount_lt:1:2");
        assert_eq!(parse.next_int().unwrap(), 1);
        assert_eq!(parse.finish(), Err(ParamError::Unexpected));
    }

    #[test]
    fn parse_empty_parameter_is_not_an_integer() {
        let mut parse = Parse::new("retrycount_lt:");
        assert_eq!(parse.next_int(), Err(ParamError::NotAnInteger));
    }
}
