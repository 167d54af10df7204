mod common;

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use common::{actors, character, named, next_event, quiet_config};
use mud_engine::{
    CommandDispatcher, Dispatch, EngineConfig, Event, LineReader, Session, SessionContext,
    SessionError, Terminal,
};
use mud_model::Character;

#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<String>>>);

impl SharedLog {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn take(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Plays back a fixed script of reader results, then either reports EOF or
/// holds the connection open forever.
struct ScriptedReader {
    steps: VecDeque<io::Result<Option<String>>>,
    hold_open: bool,
}

impl ScriptedReader {
    fn lines(lines: &[&str]) -> Box<Self> {
        Box::new(Self {
            steps: lines
                .iter()
                .map(|l| Ok(Some(l.to_string())))
                .collect(),
            hold_open: false,
        })
    }

    fn silent() -> Box<Self> {
        Box::new(Self {
            steps: VecDeque::new(),
            hold_open: true,
        })
    }

    fn failing(kind: io::ErrorKind) -> Box<Self> {
        Box::new(Self {
            steps: VecDeque::from([Err(io::Error::new(kind, "connection broke"))]),
            hold_open: false,
        })
    }
}

#[async_trait]
impl LineReader for ScriptedReader {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.steps.pop_front() {
            Some(step) => step,
            None => {
                if self.hold_open {
                    std::future::pending::<()>().await;
                }
                Ok(None)
            }
        }
    }
}

struct RecordingTerminal {
    log: SharedLog,
}

impl Terminal for RecordingTerminal {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.log.push(format!("line:{line}"));
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.log.push("clear");
        Ok(())
    }

    fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.log.push(format!("prompt:{prompt}"));
        Ok(())
    }
}

struct RecordingDispatcher {
    seen: SharedLog,
}

#[async_trait]
impl CommandDispatcher for RecordingDispatcher {
    async fn dispatch(
        &mut self,
        _ctx: &mut SessionContext<'_>,
        line: &str,
    ) -> io::Result<Dispatch> {
        self.seen.push(line);
        Ok(if line == "done" {
            Dispatch::Quit
        } else {
            Dispatch::Continue
        })
    }
}

fn session_with(
    config: &EngineConfig,
    character: mud_model::CharRef,
    bus: &mud_engine::EventBus,
    resolver: &mud_engine::CombatResolver,
    reader: Box<ScriptedReader>,
) -> (Session, SharedLog, SharedLog) {
    let log = SharedLog::default();
    let seen = SharedLog::default();
    let session = Session::new(
        character,
        bus.handle(),
        resolver.handle(),
        reader,
        Box::new(RecordingTerminal { log: log.clone() }),
        Box::new(RecordingDispatcher { seen: seen.clone() }),
        config.clone(),
    );
    (session, log, seen)
}

#[tokio::test]
async fn dispatches_commands_until_quit() {
    let config = quiet_config();
    let (bus, resolver) = actors(&config);

    let me = character(1, 100);
    let (session, _log, seen) = session_with(
        &config,
        me,
        &bus,
        &resolver,
        ScriptedReader::lines(&["look", "say hi", "quit"]),
    );

    session.run().await.unwrap();
    assert_eq!(seen.take(), vec!["look", "say hi"]);

    resolver.shutdown().await.unwrap();
    bus.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_input_logs_out() {
    let config = quiet_config();
    let (bus, resolver) = actors(&config);

    let (session, _log, seen) = session_with(
        &config,
        character(1, 100),
        &bus,
        &resolver,
        ScriptedReader::lines(&[""]),
    );

    session.run().await.unwrap();
    assert!(seen.take().is_empty());

    resolver.shutdown().await.unwrap();
    bus.shutdown().await.unwrap();
}

#[tokio::test]
async fn reader_failure_is_an_abnormal_teardown() {
    let config = quiet_config();
    let (bus, resolver) = actors(&config);

    let (session, _log, _seen) = session_with(
        &config,
        character(1, 100),
        &bus,
        &resolver,
        ScriptedReader::failing(io::ErrorKind::BrokenPipe),
    );

    let result = session.run().await;
    assert!(matches!(result, Err(SessionError::Io(_))));

    resolver.shutdown().await.unwrap();
    bus.shutdown().await.unwrap();
}

#[tokio::test]
async fn async_events_are_rendered_over_the_prompt() {
    let config = quiet_config();
    let (bus, resolver) = actors(&config);

    let me = character(1, 100);
    let alice = named(2, "Alice", 100, 100);
    let (session, log, _seen) =
        session_with(&config, me, &bus, &resolver, ScriptedReader::silent());

    let running = tokio::spawn(session.run());
    sleep(Duration::from_millis(50)).await;

    bus.handle().broadcast(Event::Say {
        speaker: alice,
        message: "hello there".into(),
    });
    sleep(Duration::from_millis(50)).await;

    let entries = log.take();
    assert_eq!(entries.first().map(String::as_str), Some("prompt:100/100> "));
    let clear_at = entries
        .iter()
        .position(|e| e == "clear")
        .expect("input line cleared before the message");
    assert_eq!(entries[clear_at + 1], "line:Alice says, \"hello there\"");
    assert_eq!(entries[clear_at + 2], "prompt:100/100> ");

    // Killing the bus closes the event channel; the session reports it.
    bus.shutdown().await.unwrap();
    let result = running.await.unwrap();
    assert!(matches!(result, Err(SessionError::EventStreamClosed)));

    resolver.shutdown().await.unwrap();
}

#[tokio::test]
async fn tick_regenerates_out_of_combat() {
    let config = EngineConfig {
        tick_interval: Duration::from_millis(10),
        ..quiet_config()
    };
    let (bus, resolver) = actors(&config);

    let me = character(1, 100);
    me.hit(50);
    let (session, log, _seen) = session_with(
        &config,
        me.clone(),
        &bus,
        &resolver,
        ScriptedReader::silent(),
    );

    let running = tokio::spawn(session.run());
    sleep(Duration::from_millis(100)).await;

    assert!(
        me.hit_points() > 50,
        "passive regen should have healed the character"
    );
    let entries = log.take();
    assert_eq!(entries.first().map(String::as_str), Some("prompt:50/100> "));
    assert!(
        entries.iter().any(|e| e == "clear"),
        "hp change should force a prompt redraw"
    );

    bus.shutdown().await.unwrap();
    let _ = running.await.unwrap();
    resolver.shutdown().await.unwrap();
}

#[tokio::test]
async fn no_regen_while_in_combat() {
    let config = EngineConfig {
        tick_interval: Duration::from_millis(10),
        combat_interval: Duration::from_secs(3600),
        ..quiet_config()
    };
    let (bus, resolver) = actors(&config);

    let me = character(1, 100);
    let foe = character(2, 100);
    me.hit(50);
    resolver
        .handle()
        .start_fight(me.clone(), None, foe)
        .await
        .unwrap();

    let (session, _log, _seen) = session_with(
        &config,
        me.clone(),
        &bus,
        &resolver,
        ScriptedReader::silent(),
    );

    let running = tokio::spawn(session.run());
    sleep(Duration::from_millis(100)).await;

    assert_eq!(me.hit_points(), 50, "no passive regen while fighting");

    bus.shutdown().await.unwrap();
    let _ = running.await.unwrap();
    resolver.shutdown().await.unwrap();
}

#[tokio::test]
async fn login_and_logout_are_broadcast() {
    let config = quiet_config();
    let (bus, resolver) = actors(&config);

    let observer = character(9, 300);
    let mut rx = bus.handle().register(observer.clone()).await.unwrap();

    let (session, _log, _seen) = session_with(
        &config,
        character(1, 100),
        &bus,
        &resolver,
        ScriptedReader::lines(&["quit"]),
    );
    session.run().await.unwrap();

    let login = next_event(&mut rx, Duration::from_millis(500)).await.unwrap();
    assert_eq!(login.kind(), "Login");
    let logout = next_event(&mut rx, Duration::from_millis(500)).await.unwrap();
    assert_eq!(logout.kind(), "Logout");

    resolver.shutdown().await.unwrap();
    bus.shutdown().await.unwrap();
}
