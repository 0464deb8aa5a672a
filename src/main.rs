use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use chatstream::adapters::HttpTransport;
use chatstream::cli::{parse_args, version_line, CliCommand, StreamPrinter, HELP};
use chatstream::config::ClientConfig;
use chatstream::conversation::{ConversationSnapshot, StreamPhase};
use chatstream::driver::ConversationHandle;
use chatstream::error::ChatError;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "CHATSTREAM_LOG";

/// Exit status for a one-shot query whose stream failed.
const EXIT_STREAM_FAILED: u8 = 1;

/// Exit status for unusable command line arguments.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let options = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(ExitCode::SUCCESS);
        }
        CliCommand::Help => {
            print!("{}", HELP);
            return Ok(ExitCode::SUCCESS);
        }
        CliCommand::Invalid(reason) => {
            eprintln!("Error: {}\n\n{}", reason, HELP);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
        CliCommand::Chat(options) => options,
    };

    init_tracing();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = options.url {
        config = config.with_base_url(url);
    }
    let transport = HttpTransport::new(&config)?;
    tracing::info!("Streaming from {}", transport.endpoint());

    let handle = ConversationHandle::spawn(Arc::new(transport));
    let mut printer = StreamPrinter::new(io::stdout());

    let result = match options.once {
        Some(query) => run_once(&handle, &mut printer, &query).await,
        None => run_interactive(&handle, &mut printer)
            .await
            .map(|()| ExitCode::SUCCESS),
    };

    // The task is stopped before the exit status is reported.
    handle.shutdown().await;
    result
}

/// Logs go to stderr so they never interleave with the streamed answer.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}

async fn run_once(
    handle: &ConversationHandle,
    printer: &mut StreamPrinter<io::Stdout>,
    query: &str,
) -> Result<ExitCode> {
    handle.submit(query).await?;
    let snapshot = follow(handle, printer).await?;

    Ok(match snapshot.phase {
        StreamPhase::Errored => ExitCode::from(EXIT_STREAM_FAILED),
        _ => ExitCode::SUCCESS,
    })
}

async fn run_interactive(
    handle: &ConversationHandle,
    printer: &mut StreamPrinter<io::Stdout>,
) -> Result<()> {
    println!("{} (type /quit to exit)", version_line());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            return Ok(());
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "/quit" {
            return Ok(());
        }

        match handle.submit(query).await {
            Ok(()) => {
                follow(handle, printer).await?;
            }
            Err(e) => {
                let err = ChatError::from(e);
                eprintln!("{} ({})", err.user_message(), err.recovery_hint());
            }
        }
    }
}

/// Print the answer as it streams until the conversation is idle again.
/// Ctrl-C cancels the stream and keeps what arrived so far.
async fn follow(
    handle: &ConversationHandle,
    printer: &mut StreamPrinter<io::Stdout>,
) -> Result<ConversationSnapshot> {
    let mut rx = handle.subscribe();

    loop {
        let snapshot = rx.borrow_and_update().clone();
        printer.render(&snapshot)?;
        if snapshot.phase != StreamPhase::Streaming {
            return Ok(snapshot);
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Err(eyre!("conversation stopped unexpectedly"));
                }
            }
            _ = tokio::signal::ctrl_c() => handle.cancel_stream().await?,
        }
    }
}
