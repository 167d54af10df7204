//! Event bus actor: the process-wide listener registry and fan-out point.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use mud_model::{CharRef, Id};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::throttle::Throttler;

use super::event::Event;

/// Messages consumed by the bus worker. Closed set, matched exhaustively.
enum BusCommand {
    Register {
        character: CharRef,
        reply: oneshot::Sender<mpsc::Receiver<Event>>,
    },
    Unregister {
        id: Id,
    },
    Broadcast {
        event: Event,
    },
    Shutdown,
}

struct Listener {
    character: CharRef,
    tx: mpsc::Sender<Event>,
}

/// Background task owning the authoritative `{character -> channel}` set.
///
/// All registry mutation and every fan-out decision happen here, in queue
/// order, so a broadcast either sees a registration in full or not at all.
struct BusWorker {
    listeners: HashMap<Id, Listener>,
    command_rx: mpsc::UnboundedReceiver<BusCommand>,
    queue_capacity: usize,
}

impl BusWorker {
    async fn run(mut self) {
        tracing::debug!(target: "mud::bus", "event bus started");
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                BusCommand::Register { character, reply } => {
                    let id = character.id();
                    let (tx, rx) = mpsc::channel(self.queue_capacity);
                    if self
                        .listeners
                        .insert(id, Listener { character, tx })
                        .is_some()
                    {
                        // Caller bug: the stale registration's channel closes,
                        // which tears down whichever session held it.
                        tracing::warn!(target: "mud::bus", %id, "registration replaced an existing listener");
                    }
                    if reply.send(rx).is_err() {
                        self.listeners.remove(&id);
                    }
                }
                BusCommand::Unregister { id } => {
                    self.listeners.remove(&id);
                }
                BusCommand::Broadcast { event } => self.fan_out(event),
                BusCommand::Shutdown => break,
            }
        }
        tracing::debug!(target: "mud::bus", "event bus stopped");
    }

    fn fan_out(&mut self, event: Event) {
        let mut dead = Vec::new();
        for (id, listener) in &self.listeners {
            if !event.is_for(listener.character.as_ref()) {
                continue;
            }
            match listener.tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Backpressure fault: fatal for this one listener, the
                    // bus itself keeps going. Dropping the registration
                    // closes the channel and the session tears itself down.
                    tracing::error!(
                        target: "mud::bus",
                        %id,
                        event = ?event,
                        "listener queue full, dropping its registration"
                    );
                    dead.push(*id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(*id);
                }
            }
        }
        for id in dead {
            self.listeners.remove(&id);
        }
    }
}

/// Cloneable handle for registering listeners and broadcasting events.
#[derive(Clone)]
pub struct EventBusHandle {
    command_tx: mpsc::UnboundedSender<BusCommand>,
}

impl EventBusHandle {
    /// Registers a character as a listener and returns its event channel.
    ///
    /// Registering the same character twice replaces the first registration;
    /// callers must not do this (the first channel is closed out from under
    /// its session).
    pub async fn register(&self, character: CharRef) -> Result<mpsc::Receiver<Event>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(BusCommand::Register {
                character,
                reply: reply_tx,
            })
            .map_err(|_| EngineError::BusClosed)?;
        reply_rx.await.map_err(EngineError::ReplyClosed)
    }

    /// Removes a registration. No-op if the character was never registered.
    pub fn unregister(&self, id: Id) {
        let _ = self.command_tx.send(BusCommand::Unregister { id });
    }

    /// Queues the event for fan-out and returns immediately.
    ///
    /// Delivery order across broadcasts equals enqueue order. Per-listener
    /// delivery failures never come back to the broadcaster.
    pub fn broadcast(&self, event: Event) {
        if self
            .command_tx
            .send(BusCommand::Broadcast { event })
            .is_err()
        {
            tracing::debug!(target: "mud::bus", "broadcast after bus shutdown");
        }
    }
}

/// Owns the bus worker and its heartbeat ticker.
pub struct EventBus {
    handle: EventBusHandle,
    worker: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl EventBus {
    /// Starts the bus worker and the heartbeat task that broadcasts
    /// [`Event::Tick`] on `config.tick_interval`.
    pub fn spawn(config: &EngineConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = BusWorker {
            listeners: HashMap::new(),
            command_rx,
            queue_capacity: config.event_queue_capacity,
        };
        let worker = tokio::spawn(worker.run());

        let handle = EventBusHandle { command_tx };

        let ticker_handle = handle.clone();
        let tick_interval = config.tick_interval;
        let ticker = tokio::spawn(async move {
            let mut throttler = Throttler::new(tick_interval);
            loop {
                throttler.sync().await;
                if ticker_handle
                    .command_tx
                    .send(BusCommand::Broadcast { event: Event::Tick })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            handle,
            worker,
            ticker,
        }
    }

    /// Cloneable handle for clients and other actors.
    pub fn handle(&self) -> EventBusHandle {
        self.handle.clone()
    }

    /// Stops the heartbeat and the worker. Commands queued before the stop
    /// are still processed; listener channels close, which ends any session
    /// still blocked on one.
    pub async fn shutdown(self) -> Result<()> {
        self.ticker.abort();
        let _ = self.handle.command_tx.send(BusCommand::Shutdown);
        self.worker.await.map_err(EngineError::WorkerJoin)
    }
}
