//! Single-player local demo: one session wired to stdin/stdout, a training
//! dummy to fight, and the full actor stack underneath.
//!
//! Try `say hello`, `attack`, `stop`, `score`, and `quit`. Set
//! `RUST_LOG=debug` to watch the actors.

use std::io::{self, Write};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use mud_engine::{
    CombatHandle, CombatResolver, CommandDispatcher, Dispatch, EngineConfig, Event, EventBus,
    EventBusHandle, LineReader, Session, SessionContext, Terminal,
};
use mud_model::{CharRef, Character, Id, PlayerChar, SkillDef, SkillRef};

struct StdinReader {
    lines: Lines<BufReader<Stdin>>,
}

#[async_trait]
impl LineReader for StdinReader {
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

struct AnsiTerminal;

impl Terminal for AnsiTerminal {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        print!("\r\x1b[2K");
        io::stdout().flush()
    }

    fn write_prompt(&mut self, prompt: &str) -> io::Result<()> {
        print!("{prompt}");
        io::stdout().flush()
    }
}

struct DemoDispatcher {
    bus: EventBusHandle,
    combat: CombatHandle,
    dummy: CharRef,
    sword: SkillRef,
}

#[async_trait]
impl CommandDispatcher for DemoDispatcher {
    async fn dispatch(
        &mut self,
        ctx: &mut SessionContext<'_>,
        line: &str,
    ) -> io::Result<Dispatch> {
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "say" => self.bus.broadcast(Event::Say {
                speaker: ctx.character.clone(),
                message: rest.to_string(),
            }),
            "shout" => self.bus.broadcast(Event::Announce {
                from: ctx.character.clone(),
                message: rest.to_string(),
            }),
            "attack" => self
                .combat
                .start_fight(
                    ctx.character.clone(),
                    Some(self.sword.clone()),
                    self.dummy.clone(),
                )
                .await
                .map_err(io::Error::other)?,
            "stop" => self
                .combat
                .stop_fight(ctx.character.id())
                .await
                .map_err(io::Error::other)?,
            "score" => {
                let me = ctx.character;
                ctx.terminal.write_line(&format!(
                    "{}: {}/{} hp, {} gold (dummy: {} hp)",
                    me.name(),
                    me.hit_points(),
                    me.health(),
                    me.cash(),
                    self.dummy.hit_points(),
                ))?;
            }
            _ => ctx
                .terminal
                .write_line(&format!("Huh? (\"{verb}\" is not a demo command)"))?,
        }
        Ok(Dispatch::Continue)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::default();
    let bus = EventBus::spawn(&config);
    let resolver = CombatResolver::spawn(&config, bus.handle());

    let room = Id(1);
    let hero: CharRef = PlayerChar::new(Id(1), "Hero", room, 100);
    let dummy: CharRef = PlayerChar::new(Id(2), "Training Dummy", room, 200);
    let sword: SkillRef = SkillDef::new("sword", 8, 3);

    let dispatcher = DemoDispatcher {
        bus: bus.handle(),
        combat: resolver.handle(),
        dummy,
        sword,
    };
    let reader = StdinReader {
        lines: BufReader::new(tokio::io::stdin()).lines(),
    };

    let session = Session::new(
        hero,
        bus.handle(),
        resolver.handle(),
        Box::new(reader),
        Box::new(AnsiTerminal),
        Box::new(dispatcher),
        config,
    );
    session.run().await?;

    resolver.shutdown().await?;
    bus.shutdown().await?;
    Ok(())
}
