use std::ops::ControlFlow;
use std::path::PathBuf;

use clap::Parser;
use ircsock::logging;
use ircsock::prelude::*;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "irc-client")]
#[command(about = "Connect to an IRC server and print everything it sends")]
#[command(version)]
struct Cli {
    /// Config file; a default one is created if it does not exist
    #[arg(short, long, default_value = ircsock::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Server address (overrides connection.server_address)
    #[arg(long)]
    server: Option<String>,

    /// Server port (overrides connection.server_port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Nickname (overrides identity.nickname)
    #[arg(short, long)]
    nick: Option<String>,

    /// Trace every line sent and received
    #[arg(short, long)]
    debug: bool,

    /// Update a config value and save, e.g. `--set connection.server_port=6697`
    #[arg(long, value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(server) = &self.server {
            config.connection.server_address = server.clone();
        }
        if let Some(port) = self.port {
            config.connection.server_port = port;
        }
        if let Some(nick) = &self.nick {
            config.identity.nickname = nick.clone();
        }
    }
}

/// Loads the config, creating it on first run, and applies any `--set`
/// pairs. Returns `None` when the run should stop after touching the file.
fn prepare_config(
    cli: &Cli,
) -> Result<Option<ClientConfig>, Box<dyn std::error::Error>> {
    let (mut config, created) = match ClientConfig::load_or_create(&cli.config)?
    {
        LoadOutcome::Loaded(config) => (config, false),
        LoadOutcome::Created(config) => (config, true),
    };

    if !cli.set.is_empty() {
        for pair in &cli.set {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected KEY=VALUE, got {pair:?}"))?;
            config.set(key, value)?;
        }
        config.save(&cli.config)?;
        eprintln!("saved {}", cli.config.display());
        return Ok(None);
    }

    if created {
        eprintln!(
            "created {}; set a server address and nickname, then run again",
            cli.config.display()
        );
        return Ok(None);
    }
    Ok(Some(config))
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(mut config) = prepare_config(&cli)? else {
        return Ok(());
    };

    cli.apply_overrides(&mut config);
    config.validate()?;

    logging::init(&LogSettings {
        debug: cli.debug,
        log_file: config
            .connection
            .enable_logging
            .then(|| config.paths.log_file.clone()),
    })?;

    let transport = TcpTransport::tcp(TransportConfig {
        trace_io: cli.debug,
        framing: FramingMode::Reassemble,
        ..TransportConfig::default()
    });
    let mut client = Client::new(transport, Registration::from_config(&config));
    let policy = ReconnectPolicy::from_config(&config.connection);
    let host = config.connection.server_address.clone();
    let port = config.connection.server_port;

    let outcome = tokio::select! {
        result = client.serve(&host, port, &policy, |line| {
            println!("{line}");
            ControlFlow::Continue(())
        }) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => {
            logging::emit(Severity::Fatal, &format!("disconnected: {e}"));
            Err(e.into())
        }
        None => {
            logging::emit(Severity::Info, "interrupted, quitting");
            client.quit(Some("interrupted")).await;
            Ok(())
        }
    }
}
