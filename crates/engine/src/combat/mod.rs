//! Combat resolver actor.
//!
//! Fight state is touched from player commands, NPC loops, and the
//! resolver's own damage timer; serializing every operation through one
//! command queue keeps the "at most one defender per attacker" invariant
//! observable at every step, with no locking.

mod worker;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use mud_model::{CharRef, Id, SkillRef};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::EventBusHandle;
use crate::throttle::Throttler;

use worker::{CombatWorker, Command};

/// Cloneable handle for combat operations.
#[derive(Clone)]
pub struct CombatHandle {
    command_tx: mpsc::Sender<Command>,
}

impl CombatHandle {
    /// Starts (or re-targets) a fight.
    ///
    /// Callers validate the target first: the resolver assumes live,
    /// distinct character references.
    pub async fn start_fight(
        &self,
        attacker: CharRef,
        skill: Option<SkillRef>,
        defender: CharRef,
    ) -> Result<()> {
        self.command_tx
            .send(Command::Start {
                attacker,
                skill,
                defender,
            })
            .await
            .map_err(|_| EngineError::CombatClosed)
    }

    /// Stops the attacker's outgoing fight, if any.
    pub async fn stop_fight(&self, attacker: Id) -> Result<()> {
        self.command_tx
            .send(Command::Stop { attacker })
            .await
            .map_err(|_| EngineError::CombatClosed)
    }

    /// Whether the character appears in any pairing, as attacker or
    /// defender. Round-trips through the command queue, so the answer is
    /// consistent with every operation enqueued before it.
    pub async fn in_combat(&self, character: Id) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Query {
                character,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::CombatClosed)?;
        reply_rx.await.map_err(EngineError::ReplyClosed)
    }
}

/// Owns the combat worker and its damage-resolution ticker.
pub struct CombatResolver {
    handle: CombatHandle,
    worker: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl CombatResolver {
    /// Starts the resolver worker and the timer that injects damage ticks
    /// on `config.combat_interval`.
    pub fn spawn(config: &EngineConfig, bus: EventBusHandle) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);

        let worker = tokio::spawn(CombatWorker::new(command_rx, bus).run());

        let ticker_tx = command_tx.clone();
        let interval = config.combat_interval;
        let ticker = tokio::spawn(async move {
            let mut throttler = Throttler::new(interval);
            loop {
                throttler.sync().await;
                if ticker_tx.send(Command::Tick).await.is_err() {
                    break;
                }
            }
        });

        Self {
            handle: CombatHandle { command_tx },
            worker,
            ticker,
        }
    }

    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    /// Stops the timer and the worker, discarding all fight state.
    pub async fn shutdown(self) -> Result<()> {
        self.ticker.abort();
        let _ = self.handle.command_tx.send(Command::Shutdown).await;
        self.worker.await.map_err(EngineError::WorkerJoin)
    }
}
