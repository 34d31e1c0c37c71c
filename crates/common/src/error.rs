/// Erros de decodificação da lista de instruções.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("JSON inválido: {0}")]
    InvalidJson(String),
    #[error("esperado array de instruções")]
    NotAnArray,
}

/// Erros de avaliação de condição.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("condição desconhecida: {0:?}")]
    Unknown(String),
    #[error("parâmetro inesperado para a condição '{0}'")]
    UnexpectedParameter(String),
    #[error("condição '{0}' requer um parâmetro")]
    MissingParameter(String),
    #[error("condição '{0}' requer um parâmetro inteiro")]
    NotAnInteger(String),
}

/// Erros de execução de ação.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("ação desconhecida: {0}")]
    Unknown(String),
    #[error("parâmetro inesperado para a ação '{0}'")]
    UnexpectedParameter(String),
    #[error("ação '{0}' requer um parâmetro")]
    MissingParameter(String),
    #[error("ação '{0}' requer um parâmetro inteiro não negativo")]
    NotAnInteger(String),
    #[error("instrução sem payload de resposta para a ação '{0}'")]
    MissingReply(String),
}

/// Erros do envelope de evento recebido pelo transporte.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("atributo obrigatório ausente: {0}")]
    MissingAttribute(&'static str),
    #[error("header inválido: {0}")]
    InvalidHeader(&'static str),
    #[error("evento estruturado inválido: {0}")]
    InvalidStructured(String),
    #[error("specversion não suportada: {0}")]
    UnsupportedSpecVersion(String),
}
