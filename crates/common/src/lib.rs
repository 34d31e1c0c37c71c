#![forbid(unsafe_code)]

mod error;

pub use error::*;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_STORAGE_TTL_SECS: u64 = 30;
/// Intervalo de varredura padrão = TTL * fator.
pub const SWEEP_FACTOR: u32 = 3;
pub const REPLY_SUFFIX: &str = ".reply";
pub const HEALTHZ_PATH: &str = "/healthz";
pub const MAX_BODY_SIZE: usize = 4 * 1024 * 1024; // 4 MB
