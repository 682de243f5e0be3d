use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pos_terminal::application::controller::TransactionController;
use pos_terminal::config::Settings;
use pos_terminal::domain::ports::GatewayRef;
use pos_terminal::error::SubmitError;
use pos_terminal::infrastructure::clock::SystemClock;
use pos_terminal::infrastructure::http::HttpGateway;
use pos_terminal::interfaces::terminal::command_reader::{CommandReader, FormCommand};
use pos_terminal::interfaces::terminal::form_writer::FormWriter;
use pos_terminal::telemetry;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to config/pos-terminal.* when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the transaction processor, overrides the settings
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load_from(cli.config.as_deref(), None).into_diagnostic()?;
    if let Some(base_url) = cli.base_url {
        settings.gateway.base_url = base_url;
    }

    let gateway: GatewayRef = Arc::new(HttpGateway::new(&settings.gateway).into_diagnostic()?);
    let controller = TransactionController::new(gateway, Arc::new(SystemClock), &settings);

    // Notifications arrive from background tasks
    let printer = controller.notifications().map(|mut events| {
        tokio::spawn(async move {
            let mut writer = FormWriter::new(io::stdout());
            while let Some(event) = events.recv().await {
                if let Err(e) = writer.write_notification(&event) {
                    eprintln!("Error writing notification: {}", e);
                }
            }
        })
    });

    let mut writer = FormWriter::new(io::stdout());
    let reader = CommandReader::new(io::stdin().lock());
    for command in reader.commands() {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Error reading command: {}", e);
                continue;
            }
        };

        match command {
            FormCommand::Input(field, value) => controller.input(field, &value).await,
            FormCommand::Brand(brand) => controller.select_brand(brand).await,
            FormCommand::Deferred(deferred) => controller.set_deferred(deferred).await,
            FormCommand::Installments(installments) => {
                controller.select_installments(installments).await
            }
            FormCommand::Submit => match controller.submit().await {
                Ok(handle) => writer.write_submitted(&handle).into_diagnostic()?,
                Err(SubmitError::Invalid(errors)) => writer.write_errors(&errors).into_diagnostic()?,
                // already surfaced as a notification
                Err(SubmitError::Submission(_)) => {}
            },
        }
    }

    if let Some(state) = controller.await_outcome().await {
        writer.write_outcome(state).into_diagnostic()?;
    }
    controller.shutdown().await;
    drop(controller);

    if let Some(printer) = printer {
        printer.await.into_diagnostic()?;
    }
    Ok(())
}
