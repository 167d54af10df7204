//! Per-player input/event interleaving loop.
//!
//! Each connected character gets one [`Session`]: a reader task that
//! accepts throttled input lines, and a main loop that `select!`s between
//! those lines, the character's event channel, and the reader's failure
//! signal — so neither input nor asynchronous events can starve the other.

mod dispatch;
mod io;

use std::io::Error as IoError;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use mud_model::{CharRef, Id};

use crate::combat::CombatHandle;
use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::events::{Event, EventBusHandle};
use crate::throttle::Throttler;

pub use dispatch::{CommandDispatcher, Dispatch, SessionContext};
pub use io::{LineReader, Terminal};

const DEFAULT_PROMPT: &str = "%h/%H> ";

/// One logged-in player character's bridge between raw line input and the
/// event bus.
pub struct Session {
    character: CharRef,
    bus: EventBusHandle,
    combat: CombatHandle,
    reader: Option<Box<dyn LineReader>>,
    terminal: Box<dyn Terminal>,
    dispatcher: Box<dyn CommandDispatcher>,
    config: EngineConfig,
    prompt: String,
    reply_to: Option<Id>,
}

impl Session {
    pub fn new(
        character: CharRef,
        bus: EventBusHandle,
        combat: CombatHandle,
        reader: Box<dyn LineReader>,
        terminal: Box<dyn Terminal>,
        dispatcher: Box<dyn CommandDispatcher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            character,
            bus,
            combat,
            reader: Some(reader),
            terminal,
            dispatcher,
            config,
            prompt: DEFAULT_PROMPT.to_string(),
            reply_to: None,
        }
    }

    /// Prompt template; `%h` expands to current hit points, `%H` to max.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Runs the session to completion.
    ///
    /// `Ok(())` is a normal logout (empty input, `quit`/`logout`, dispatcher
    /// quit, or clean disconnect). The registration is removed and a
    /// [`Event::Logout`] broadcast on every exit path.
    pub async fn run(mut self) -> Result<(), SessionError> {
        let id = self.character.id();
        let mut events = self.bus.register(self.character.clone()).await?;
        self.bus.broadcast(Event::Login {
            character: self.character.clone(),
        });
        tracing::info!(target: "mud::session", character = %id, "session started");

        let reader = self
            .reader
            .take()
            .expect("session reader is present until run");
        let (input_tx, mut input_rx) = mpsc::channel::<String>(1);
        let (fail_tx, mut fail_rx) = oneshot::channel::<IoError>();
        let reader_task = tokio::spawn(read_loop(
            reader,
            input_tx,
            fail_tx,
            self.config.input_throttle,
        ));

        let result = self
            .interleave(&mut events, &mut input_rx, &mut fail_rx)
            .await;

        reader_task.abort();
        self.bus.unregister(id);
        self.bus.broadcast(Event::Logout {
            character: self.character.clone(),
        });
        match &result {
            Ok(()) => tracing::info!(target: "mud::session", character = %id, "session ended"),
            Err(err) => {
                tracing::warn!(target: "mud::session", character = %id, error = %err, "session ended abnormally")
            }
        }
        result
    }

    async fn interleave(
        &mut self,
        events: &mut mpsc::Receiver<Event>,
        input_rx: &mut mpsc::Receiver<String>,
        fail_rx: &mut oneshot::Receiver<IoError>,
    ) -> Result<(), SessionError> {
        self.terminal.write_prompt(&self.prompt())?;

        loop {
            tokio::select! {
                line = input_rx.recv() => {
                    let Some(line) = line else {
                        // Reader is gone; surface its failure if it reported one.
                        return match fail_rx.try_recv() {
                            Ok(err) => Err(SessionError::Io(err)),
                            Err(_) => Ok(()),
                        };
                    };
                    if self.handle_input(line.trim()).await? == Dispatch::Quit {
                        return Ok(());
                    }
                    self.terminal.write_prompt(&self.prompt())?;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        return Err(SessionError::EventStreamClosed);
                    };
                    self.handle_event(event).await?;
                }
                err = &mut *fail_rx => {
                    return match err {
                        Ok(err) => Err(SessionError::Io(err)),
                        // Reader finished without reporting: clean disconnect.
                        Err(_) => Ok(()),
                    };
                }
            }
        }
    }

    async fn handle_input(&mut self, line: &str) -> Result<Dispatch, SessionError> {
        if line.is_empty() || line == "quit" || line == "logout" {
            return Ok(Dispatch::Quit);
        }
        let mut ctx = SessionContext {
            character: &self.character,
            terminal: self.terminal.as_mut(),
            reply_to: self.reply_to,
        };
        let outcome = self.dispatcher.dispatch(&mut ctx, line).await?;
        Ok(outcome)
    }

    async fn handle_event(&mut self, event: Event) -> Result<(), SessionError> {
        if !event.is_for(self.character.as_ref()) {
            return Ok(());
        }

        match &event {
            Event::Tell { from, .. } => self.reply_to = Some(from.id()),
            Event::Tick => self.regen().await?,
            _ => {}
        }

        let message = event.render(self.character.as_ref());
        if !message.is_empty() {
            self.terminal.clear_line()?;
            self.terminal.write_line(&message)?;
            self.terminal.write_prompt(&self.prompt())?;
        }
        Ok(())
    }

    /// Passive regeneration on heartbeat ticks, skipped while in combat.
    /// The prompt shows live hit points, so a change forces a redraw.
    async fn regen(&mut self) -> Result<(), SessionError> {
        match self.combat.in_combat(self.character.id()).await {
            Ok(false) => {}
            // In combat, or the resolver is shutting down: no regen.
            Ok(true) | Err(_) => return Ok(()),
        }

        let before = self.character.hit_points();
        self.character.heal(self.config.regen_per_tick);
        if self.character.hit_points() != before {
            self.terminal.clear_line()?;
            self.terminal.write_prompt(&self.prompt())?;
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        self.prompt
            .replace("%h", &self.character.hit_points().to_string())
            .replace("%H", &self.character.health().to_string())
    }
}

/// Reader task: exclusive producer of this session's input lines.
///
/// The throttle caps how fast successive lines are accepted, regardless of
/// how fast the peer sends them.
async fn read_loop(
    mut reader: Box<dyn LineReader>,
    input_tx: mpsc::Sender<String>,
    fail_tx: oneshot::Sender<IoError>,
    throttle: Duration,
) {
    let mut throttler = Throttler::new(throttle);
    loop {
        match reader.read_line().await {
            Ok(Some(line)) => {
                throttler.sync().await;
                if input_tx.send(line).await.is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(err) => {
                let _ = fail_tx.send(err);
                return;
            }
        }
    }
}
