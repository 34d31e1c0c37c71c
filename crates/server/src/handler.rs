use tracing::{debug, info};

use replier_common::ActionError;
use replier_protocol::{Action, Condition, Event, Instruction, Instructions, Outcome};
use replier_storage::CountStore;

/// Interpreta as instruções de resposta carregadas em cada evento.
///
/// A contagem por ID de evento permite simular reentregas: condições
/// `retrycount_*` enxergam quantas entregas anteriores do mesmo ID houve,
/// ou seja, 0 na primeira entrega.
#[derive(Clone)]
pub struct Responder {
    store: CountStore,
}

impl Responder {
    pub fn new(store: CountStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CountStore {
        &self.store
    }

    /// Trata um evento e decide o resultado conforme as instruções do payload.
    pub async fn handle(&self, event: &Event) -> (Option<Event>, Outcome) {
        let instructions = match Instructions::decode(&event.data) {
            Ok(list) => list,
            Err(e) => {
                info!(event_id = %event.id, result = "nack", error = %e, "erro ao decodificar instruções de resposta");
                return (None, Outcome::Nack);
            }
        };

        // O incremento acontece antes de qualquer condição e nunca é desfeito.
        let count = self.store.increase(&event.id);
        debug!(event_id = %event.id, count, instructions = instructions.len(), "evento recebido");

        for instruction in &instructions {
            let condition = match Condition::parse(&instruction.condition) {
                Ok(c) => c,
                Err(e) => {
                    info!(event_id = %event.id, result = "nack", error = %e, "erro ao avaliar condição");
                    return (None, Outcome::Nack);
                }
            };

            if !condition.is_met(self.retry_count(&event.id)) {
                continue;
            }

            return self.execute(instruction, event).await;
        }

        info!(event_id = %event.id, result = "ack", "fallback");
        (None, Outcome::Ack)
    }

    /// Entregas anteriores do ID. Um `reset` concorrente pode zerar a
    /// contagem depois do incremento, daí o piso em 0.
    fn retry_count(&self, id: &str) -> i64 {
        (self.store.get(id) - 1).max(0)
    }

    async fn execute(&self, instruction: &Instruction, event: &Event) -> (Option<Event>, Outcome) {
        let action = match Action::parse(&instruction.action) {
            Ok(a) => a,
            Err(e) => {
                info!(event_id = %event.id, action = %instruction.action, result = "nack", error = %e, "erro ao executar ação");
                return (None, Outcome::Nack);
            }
        };

        let result = match action {
            Action::Ack => Ok((None, Outcome::Ack)),
            Action::Nack => Ok((None, Outcome::Nack)),
            Action::DelayAck(delay) => {
                // Suspende só esta task.
                tokio::time::sleep(delay).await;
                Ok((None, Outcome::Ack))
            }
            Action::AckWithEvent => {
                reply_event(instruction, event, action).map(|r| (Some(r), Outcome::Ack))
            }
            Action::NackWithEvent => {
                reply_event(instruction, event, action).map(|r| (Some(r), Outcome::Nack))
            }
            Action::Reset => {
                self.store.reset();
                debug!(event_id = %event.id, action = action.name(), "contagens descartadas");
                Ok((None, Outcome::Ack))
            }
        };

        match result {
            Ok((reply, outcome)) => {
                info!(event_id = %event.id, action = action.name(), result = %outcome, reply = reply.is_some(), "ação executada");
                (reply, outcome)
            }
            Err(e) => {
                info!(event_id = %event.id, action = action.name(), result = "nack", error = %e, "erro ao executar ação");
                (None, Outcome::Nack)
            }
        }
    }
}

fn reply_event(instruction: &Instruction, event: &Event, action: Action) -> Result<Event, ActionError> {
    let payload = instruction
        .reply
        .as_deref()
        .ok_or_else(|| ActionError::MissingReply(action.name().to_string()))?;
    Ok(event.reply_with(payload))
}
