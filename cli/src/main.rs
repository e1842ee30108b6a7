//! CLI entrypoint for summit
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use summit_application::{
    CancelRoundUseCase, CompositePublisher, ConversationLogger, DeliberateInput, DeliberateUseCase,
    EventPublisher, LaunchRequest, NoConversationLogger, RoundLauncher, StreamingDeliberateUseCase,
};
use summit_domain::{StreamEvent, StreamPayload};
use summit_infrastructure::{
    BroadcastEventHub, ConfigLoader, FileConfig, HttpAgentGateway, InMemoryCancellationStore,
    JsonlConversationLogger, MercurePublisher, Severity,
};
use summit_presentation::{Cli, ConsoleFormatter, ProgressReporter, StreamPrinter};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting summit");

    for issue in config.validate() {
        match issue.severity {
            Severity::Warning => warn!(field = %issue.field, "{}", issue.message),
            Severity::Error => bail!("Invalid configuration: {}", issue.message),
        }
    }

    let Some(message) = cli.message.clone() else {
        bail!("A message is required");
    };
    let personas = cli.personas.clone();
    if personas.is_empty() {
        bail!("At least one --persona is required");
    }

    // === Dependency Injection ===
    let gateway = Arc::new(HttpAgentGateway::from_config(&config.agent)?);
    if let Err(e) = gateway.health().await {
        warn!(base_url = gateway.base_url(), error = %e, "Agent backend health check failed");
    }
    let logger = conversation_logger(&config);

    if cli.stream {
        run_streaming(&cli, &config, gateway, logger, message, personas).await
    } else {
        run_sync(&cli, gateway, logger, message, personas).await
    }
}

/// Install the tracing subscriber: stderr, plus a file when configured.
///
/// `RUST_LOG` overrides the level derived from `-v`.
fn init_tracing(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(path) = file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        directory, file_name,
    ));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = &config.logging.conversation_log else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!(path = %logger.path().display(), "Writing conversation log");
            Arc::new(logger)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Conversation log disabled");
            Arc::new(NoConversationLogger)
        }
    }
}

async fn run_sync(
    cli: &Cli,
    gateway: Arc<HttpAgentGateway>,
    logger: Arc<dyn ConversationLogger>,
    message: String,
    personas: Vec<String>,
) -> Result<()> {
    let mut input = DeliberateInput::new(message, personas);
    if let Some(session) = &cli.session {
        input = input.with_session(session.clone());
    }

    let use_case = DeliberateUseCase::new(gateway).with_logger(logger);
    let result = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    println!("{}", ConsoleFormatter::render(&result, cli.output));
    Ok(())
}

async fn run_streaming(
    cli: &Cli,
    config: &FileConfig,
    gateway: Arc<HttpAgentGateway>,
    logger: Arc<dyn ConversationLogger>,
    message: String,
    personas: Vec<String>,
) -> Result<()> {
    let settings = config.to_deliberation_config();
    let store = Arc::new(InMemoryCancellationStore::from_config(&settings));
    let hub = Arc::new(BroadcastEventHub::new(settings.event_capacity));

    let publisher: Arc<dyn EventPublisher> = match &config.stream.hub_url {
        Some(url) => {
            let mercure = MercurePublisher::new(url.clone(), config.stream.hub_token.clone())?;
            info!(hub_url = mercure.hub_url(), "Forwarding events to hub");
            Arc::new(CompositePublisher::new(vec![
                hub.clone() as Arc<dyn EventPublisher>,
                Arc::new(mercure),
            ]))
        }
        None => hub.clone(),
    };

    let use_case = StreamingDeliberateUseCase::new(gateway, publisher, store.clone())
        .with_logger(logger);
    let launcher = RoundLauncher::new(Arc::new(use_case), &settings);
    let cancel = CancelRoundUseCase::new(store);

    let mut request = LaunchRequest::new(message, personas);
    if let Some(session) = &cli.session {
        request = request.with_session(session.clone());
    }
    if let Some(topic) = &cli.topic {
        request = request.with_topic(topic.clone());
    }

    let printer = StreamPrinter::new(cli.output);
    let prepared = launcher.prepare(request)?;
    let topic = prepared.ack().topic.clone();
    print!("{}", printer.render_ack(prepared.ack()));

    // Subscribe before dispatch so no event is missed
    let rx = hub.subscribe(&topic);
    prepared.dispatch();

    let cancel_after = cli.cancel_after_ms.map(Duration::from_millis);
    let deadline = async {
        match cancel_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut stdout = std::io::stdout();
    let follow = printer.follow(rx, &mut stdout);
    tokio::pin!(follow);

    let mut cancel_requested = false;
    let terminal = loop {
        tokio::select! {
            result = &mut follow => break result?,
            _ = tokio::signal::ctrl_c(), if !cancel_requested => {
                cancel_requested = true;
                info!(topic = %topic, "Interrupted, cancelling round");
                cancel.execute(&topic).await?;
            }
            _ = &mut deadline, if !cancel_requested => {
                cancel_requested = true;
                info!(topic = %topic, "Cancel deadline reached");
                cancel.execute(&topic).await?;
            }
        }
    };

    launcher.drain().await;
    report_terminal(terminal)
}

fn report_terminal(terminal: Option<StreamEvent>) -> Result<()> {
    let Some(event) = terminal else {
        bail!("Event stream closed before the round finished");
    };
    match event.payload {
        StreamPayload::PersonaFailed { message } => {
            let persona = event.persona.map(|p| p.to_string()).unwrap_or_default();
            bail!("Persona {persona} failed: {message}")
        }
        StreamPayload::RoundAborted { message } => bail!("Round aborted: {message}"),
        _ => Ok(()),
    }
}
