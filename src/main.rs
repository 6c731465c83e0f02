//! Chatpoll CLI
//!
//! Terminal chat client:
//! - Join a room with a nickname and email
//! - Print messages and presence changes as they arrive
//! - Send each line typed on stdin as a chat message
//! - Generate a default config file

use anyhow::Context;
use chatpoll::{
    Config, ConfigError, Connection, HttpTransport, LoggingConfig, Message, Session, StoreChange,
    User,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "chatpoll")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Long-polling chat client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat server base URI, overrides config
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the chat and start talking
    Connect {
        /// Nickname (prompted for when omitted)
        #[arg(short, long)]
        nick: Option<String>,
        /// Email address, used by the server for the avatar
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = chatpoll::config::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    // Config warnings are emitted before the configured subscriber exists
    let mut config =
        with_bootstrap_logging(std::io::stderr, || load_config(cli.config.as_deref()))?;
    if let Some(server) = cli.server {
        config.server.base_uri = server;
    }

    init_logging(&config.logging);
    tracing::info!("Chatpoll v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Connect { nick, email } = cli.command {
        run_chat(config, nick, email).await?;
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_with_env(path),
        None => Ok(Config::load_default()),
    }
}

/// Run `f` with a warn-level subscriber writing to `make_writer`
fn with_bootstrap_logging<W, R>(make_writer: W, f: impl FnOnce() -> R) -> R
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("chatpoll=warn"))
        .with_writer(make_writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the tracing subscriber; logs go to stderr, the transcript to stdout
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("chatpoll={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_chat(config: Config, nick: Option<String>, email: Option<String>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Welcome step
    let nick = match nick {
        Some(n) => n,
        None => prompt(&mut lines, "Nickname: ").await?,
    };
    let email = match email {
        Some(e) => e,
        None => prompt(&mut lines, "Email: ").await?,
    };

    let transport = Arc::new(HttpTransport::new(config.transport())?);
    tracing::info!(server = %transport.base_uri(), "Connecting");

    let session = Arc::new(Session::new(nick, email));
    session.messages().subscribe(|change, _| {
        if let StoreChange::Added { item, .. } = change {
            println!("{}", render_message(item));
        }
    });
    session.users().subscribe(|change, users| {
        println!("{}", render_presence(change, users));
    });

    let connection = Connection::open(Arc::clone(&session), transport, config.reconnect.policy())
        .await
        .context("joining chat")?;
    println!("Joined as {}. Type /users, /quit or a message.", session.nick_name());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => {}
                    "/quit" => break,
                    "/users" => {
                        let names: Vec<String> =
                            session.users().snapshot().into_iter().map(|u| u.nick_name).collect();
                        println!("Online: {}", names.join(", "));
                    }
                    text => {
                        connection.post_message(text);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    connection.shutdown();
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;

    let line = lines
        .next_line()
        .await?
        .context("stdin closed before login finished")?;
    Ok(line.trim().to_string())
}

fn render_message(message: &Message) -> String {
    let time = message
        .date_time
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    format!("[{}] <{}> {}", time, message.nick_name, message.message)
}

fn render_presence(change: &StoreChange<User>, users: &[User]) -> String {
    let verb = match change {
        StoreChange::Added { .. } => "joined",
        StoreChange::Removed { .. } => "left",
    };
    format!(
        "* {} {} ({} online)",
        change.item().nick_name,
        verb,
        users.len()
    )
}
