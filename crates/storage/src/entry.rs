use tokio::time::Instant;

/// Contagem de observações de um ID + instante de expiração.
#[derive(Debug, Clone, Copy)]
pub struct CountEntry {
    pub count: i64,
    pub expires_at: Instant,
}

impl CountEntry {
    pub fn new(expires_at: Instant) -> Self {
        Self {
            count: 1,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
