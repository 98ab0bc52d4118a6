use clap::{Parser, Subcommand};
use cod_gateway::application::registry::GatewayRegistry;
use cod_gateway::domain::payment::PaymentContext;
use cod_gateway::infrastructure::cash_on_delivery::{CashOnDelivery, PLUGIN_NAME};
use cod_gateway::interfaces::csv::command_reader::CommandReader;
use cod_gateway::interfaces::csv::response_writer::ResponseWriter;
use cod_gateway::observability::{LogFormat, init_logging};
use miette::{IntoDiagnostic, Result};
use semver::Version;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host platform version plugins are checked against
    #[arg(long, env = "COD_HOST_VERSION", default_value = "1.0.0", global = true)]
    host_version: Version,

    /// Log output format (pretty or json)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a CSV file of payment commands through a gateway
    Run {
        /// Input commands CSV file
        input: PathBuf,

        /// Registered gateway to dispatch to
        #[arg(long, default_value = PLUGIN_NAME)]
        gateway: String,
    },
    /// Print metadata of every registered gateway
    Describe,
    /// Print a gateway's public keys and payload fields
    Schema {
        #[arg(long, default_value = PLUGIN_NAME)]
        gateway: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let mut registry = GatewayRegistry::new(cli.host_version);
    registry
        .register(Arc::new(CashOnDelivery::new()))
        .into_diagnostic()?;

    match cli.command {
        Command::Run { input, gateway } => {
            let handle = registry.get(&gateway).into_diagnostic()?;
            let config = registry
                .resolve_config(&gateway, |key| std::env::var(key).ok())
                .into_diagnostic()?;
            info!(gateway = %gateway, keys = config.len(), "resolved gateway configuration");

            let file = File::open(input).into_diagnostic()?;
            let reader = CommandReader::new(file);
            let stdout = io::stdout();
            let mut writer = ResponseWriter::new(stdout.lock());
            let ctx = PaymentContext::new().with("gateway", handle.descriptor().name.clone());

            for command in reader.commands() {
                match command {
                    Ok(command) => match registry.dispatch(&gateway, &command, &ctx).await {
                        Ok(response) => writer
                            .write_response(command.op(), command.order_id(), &response)
                            .into_diagnostic()?,
                        Err(e) => error!(error = %e, "error processing command"),
                    },
                    Err(e) => error!(error = %e, "error reading command"),
                }
            }
            writer.flush().into_diagnostic()?;
        }
        Command::Describe => {
            let json = serde_json::to_string_pretty(&registry.descriptors()).into_diagnostic()?;
            println!("{json}");
        }
        Command::Schema { gateway } => {
            let handle = registry.get(&gateway).into_diagnostic()?;
            let schema = handle.special_serializer();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "gateway": gateway,
                "public_keys": handle.public_keys(),
                "required_fields": schema.required_fields(),
            }))
            .into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}
