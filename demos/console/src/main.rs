//! Console Demo
//!
//! An interactive command console built on Quiver. Every line typed on stdin
//! is tokenized and dispatched; lines without the prefix are ignored.
//!
//! ```text
//! > /hurt zombie fire 12      Descriptor with an optional keyword step
//! > /dmg zombie 3             alias of /hurt
//! > /calc 6 * 7               sequential shifts; errors are reported, not raised
//! > /set volume 7             collect-all over differently typed parsers
//! > /kick bob spamming        needs --op
//! > /help hurt                object executor reading the registry
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package quiver-console -- --op
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use quiver::prelude::*;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quiver-console", about = "Interactive Quiver command console")]
struct Cli {
    /// Configuration file (searched for in the current directory by default).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. `production`.
    #[arg(long)]
    profile: Option<String>,

    /// Overrides the configured command prefix.
    #[arg(long)]
    prefix: Option<String>,

    /// Name of the console user.
    #[arg(long, default_value = "console")]
    name: String,

    /// Grants the console user `admin.*` permissions.
    #[arg(long)]
    op: bool,
}

/// The sender of every command typed into this console.
#[derive(Debug, Clone)]
struct Console {
    name: String,
    op: bool,
}

// ============================================================================
// Handler Functions
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Element {
    Fire,
    Ice,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fire => "fire",
            Self::Ice => "ice",
        })
    }
}

/// `/hurt <target> [fire|ice] <amount>`
fn hurt() -> Executor<Console> {
    let schema = Descriptor::new()
        .required(parsers::any_token())
        .optional(parsers::choice([("fire", Element::Fire), ("ice", Element::Ice)]))
        .required(parsers::bounded(parsers::from_str::<u32>(), 1..=100));

    Executor::function(move |sender: Console, args: Arguments, label: String| {
        let (target, element, amount) = args.resolve(&schema);
        async move {
            let (Some(target), Some(amount)) = (target.into_option(), amount.into_option()) else {
                return false;
            };
            match element.into_option() {
                Some(element) => println!(
                    "{} hits {target} with {element} for {amount} damage (/{label})",
                    sender.name
                ),
                None => println!("{} hits {target} for {amount} damage (/{label})", sender.name),
            }
            true
        }
    })
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

/// `/calc <a> <+|-|*|/> <b>`
fn calc() -> Executor<Console> {
    Executor::function(|_: Console, mut args: Arguments, _: String| async move {
        let number = parsers::from_str::<f64>();
        let operator = parsers::choice([
            ("+", Operator::Add),
            ("-", Operator::Sub),
            ("*", Operator::Mul),
            ("x", Operator::Mul),
            ("/", Operator::Div),
        ]);

        let lhs = args.shift(&number);
        let op = args.shift(&operator);
        let rhs = args.shift(&number);
        let (Some(lhs), Some(op), Some(rhs)) = (lhs, op, rhs) else {
            return Ok(false);
        };
        if !args.is_empty() {
            return Ok(false);
        }

        let result = match op {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div if rhs == 0.0 => bail!("division by zero"),
            Operator::Div => lhs / rhs,
        };
        println!("= {result}");
        Ok::<_, anyhow::Error>(true)
    })
}

/// `/set <key> <on|off|number>`
fn set() -> Executor<Console> {
    Executor::function(|sender: Console, mut args: Arguments, _: String| async move {
        let Some(key) = args.shift(&parsers::any_token()) else {
            return false;
        };
        let (flag, number) = args.shift_each(&(parsers::boolean(), parsers::from_str::<i64>()));

        match (flag.into_option(), number.into_option()) {
            (Some(flag), _) => {
                let state = if flag { "on" } else { "off" };
                println!("{}: {key} = {state}", sender.name);
            }
            (None, Some(number)) => println!("{}: {key} = {number}", sender.name),
            (None, None) => return false,
        }
        true
    })
}

/// `/kick <player> [reason...]`
fn kick() -> Executor<Console> {
    Executor::function(|sender: Console, mut args: Arguments, _: String| async move {
        let Some(player) = args.shift(&parsers::any_token()) else {
            return false;
        };
        let reason = args
            .join(" ", &parsers::any_token())
            .unwrap_or_else(|| "no reason given".to_string());
        println!("{} kicked {player}: {reason}", sender.name);
        true
    })
}

/// `/help [command]`, listing commands straight from the registry.
struct Help {
    registry: CommandRegistry<Console>,
}

#[async_trait]
impl CommandExecutor<Console> for Help {
    async fn execute(
        &self,
        _sender: Console,
        mut args: Arguments,
        _label: String,
    ) -> HandlerResult {
        let Some(name) = args.shift(&parsers::any_token()) else {
            for command in self.registry.commands() {
                println!(
                    "  {:<8} {}",
                    command.id,
                    command.description.as_deref().unwrap_or("")
                );
            }
            return Ok(true);
        };

        let Some(command) = self.registry.lookup(&name) else {
            println!("Unknown command: {name}");
            return Ok(false);
        };
        println!("{} {}", command.id, command.usage.as_deref().unwrap_or(""));
        if !command.aliases.is_empty() {
            println!("  aliases: {}", command.aliases.join(", "));
        }
        if let Some(description) = &command.description {
            println!("  {description}");
        }
        Ok(true)
    }
}

fn register_commands(runtime: &CommandRuntime<Console>) -> Result<()> {
    runtime.register(
        CommandConfig::new("hurt")
            .alias("dmg")
            .description("Deal damage to a target")
            .usage("<target> [fire|ice] <amount>"),
        hurt(),
    )?;
    runtime.register(
        CommandConfig::new("calc")
            .description("Evaluate a binary expression")
            .usage("<a> <+|-|*|/> <b>"),
        calc(),
    )?;
    runtime.register(
        CommandConfig::new("set")
            .description("Set a flag or number")
            .usage("<key> <on|off|number>"),
        set(),
    )?;
    runtime.register(
        CommandConfig::new("kick")
            .description("Remove a player")
            .usage("<player> [reason...]")
            .permission("admin.kick"),
        kick(),
    )?;
    runtime.register(
        CommandConfig::new("help")
            .alias("?")
            .description("List commands or show one command's usage")
            .usage("[command]"),
        Executor::object(Help {
            registry: runtime.registry().clone(),
        }),
    )?;
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = CommandRuntime::<Console>::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }

    let runtime = builder
        .build::<Console>()?
        .with_permission_policy(RequirePermission::new(|sender: &Console, node: &str| {
            sender.op || !node.starts_with("admin.")
        }));
    if let Some(prefix) = cli.prefix {
        runtime.set_prefix(prefix)?;
    }

    register_commands(&runtime)?;

    // The hook lives inside the registry, so it keeps a snapshot rather
    // than a handle back to the runtime.
    let prefix = runtime.prefix();
    let usages: HashMap<String, String> = runtime
        .registry()
        .commands()
        .into_iter()
        .filter_map(|command| Some((command.id, command.usage?)))
        .collect();
    runtime
        .registry()
        .set_completion_hook(move |_sender: &Console, completion: &Completion| {
            if completion.success {
                return;
            }
            match usages.get(&completion.command) {
                Some(usage) => println!("Usage: {prefix}{} {usage}", completion.label),
                None => println!("{prefix}{} failed", completion.label),
            }
        });

    info!(stats = %runtime.registry().stats(), "Commands registered");
    println!("Type {}help for a list of commands.", runtime.prefix());

    let console = Console {
        name: cli.name,
        op: cli.op,
    };
    runtime
        .run(BufReader::new(tokio::io::stdin()), console)
        .await?;

    println!("{}", runtime.stats());
    Ok(())
}
