use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::entry::CountEntry;

/// Maior TTL ou intervalo de varredura aceito; valores acima são limitados
/// para que `Instant + duração` nunca transborde.
pub const MAX_PERIOD: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `tokio::time::interval` não aceita período zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Estado compartilhado entre todos os handles.
///
/// O `LruCache` mantém a ordem de toque: o mais recente na frente, o mais
/// antigo no fim. Toda escrita renova o TTL e move a chave para a frente,
/// então o fim da lista é sempre a próxima entrada a expirar.
struct SharedState {
    entries: RwLock<LruCache<String, CountEntry>>,
    ttl: Duration,
}

/// Contagem in-memory de observações por ID, com expiração.
#[derive(Clone)]
pub struct CountStore {
    shared: Arc<SharedState>,
}

impl CountStore {
    /// Cria o store. TTLs acima de [`MAX_PERIOD`] são limitados a ele.
    pub fn new(ttl: Duration) -> Self {
        CountStore {
            shared: Arc::new(SharedState {
                entries: RwLock::new(LruCache::unbounded()),
                ttl: ttl.min(MAX_PERIOD),
            }),
        }
    }

    /// TTL efetivo, já limitado.
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    /// Registra uma observação do ID e retorna a contagem atualizada.
    /// A primeira observação (ou a primeira após expirar) retorna 1.
    pub fn increase(&self, id: &str) -> i64 {
        let mut entries = self.shared.entries.write();
        // Lido sob o lock: a frente da lista nunca expira antes das de trás.
        let expires_at = Instant::now() + self.shared.ttl;

        if let Some(entry) = entries.get_mut(id)
            && !entry.is_expired()
        {
            entry.count += 1;
            entry.expires_at = expires_at;
            return entry.count;
        }

        // Chave nova ou expirada recomeça a contagem.
        entries.put(id.to_string(), CountEntry::new(expires_at));
        1
    }

    /// Contagem atual do ID, ou 0 se ausente/expirado. Não altera a ordem.
    pub fn get(&self, id: &str) -> i64 {
        let entries = self.shared.entries.read();
        match entries.peek(id) {
            Some(entry) if !entry.is_expired() => entry.count,
            _ => 0,
        }
    }

    pub fn delete(&self, id: &str) {
        self.shared.entries.write().pop(id);
    }

    /// Remove todas as entradas.
    pub fn reset(&self) {
        self.shared.entries.write().clear();
    }

    /// Remove entradas expiradas a partir da menos recente, parando na
    /// primeira ainda válida. Retorna quantas foram removidas.
    pub fn remove_stale(&self) -> usize {
        let mut entries = self.shared.entries.write();
        let mut removed = 0;

        while let Some((_, entry)) = entries.peek_lru() {
            if !entry.is_expired() {
                break;
            }
            entries.pop_lru();
            removed += 1;
        }

        removed
    }

    /// Número de entradas fisicamente presentes, incluindo expiradas ainda não varridas.
    pub fn len(&self) -> usize {
        self.shared.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.read().is_empty()
    }

    /// Inicia a varredura periódica de entradas expiradas. A task termina
    /// quando `shutdown` é cancelado. O intervalo é limitado a [`MAX_PERIOD`].
    pub fn spawn_sweeper(&self, every: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        let store = self.clone();
        let every = every.clamp(MIN_SWEEP_INTERVAL, MAX_PERIOD);
        tokio::spawn(async move {
            sweep_stale_entries(store, every, shutdown).await;
        })
    }
}

/// Background task que purga contagens expiradas.
async fn sweep_stale_entries(store: CountStore, every: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.remove_stale();
                if removed > 0 {
                    debug!(removed, "contagens expiradas removidas");
                }
            }
            _ = shutdown.cancelled() => {
                debug!("varredura de contagens encerrada");
                return;
            }
        }
    }
}
