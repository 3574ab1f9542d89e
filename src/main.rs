use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use coffee_machine::csv::{read_commands, write_report_stdout};
use coffee_machine::{Machine, MachineConfig};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: coffee-machine <commands.csv> [config.toml]");
        return ExitCode::FAILURE;
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let config = match args.next() {
        Some(config_path) => MachineConfig::load(config_path),
        None => MachineConfig::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let commands = match read_commands(PathBuf::from(&path)) {
        Ok(commands) => commands,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new(config);
    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in commands {
            match result {
                Ok(command) => {
                    if cmd_sender.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    machine.run(ReceiverStream::new(cmd_receiver)).await;

    if let Err(e) = write_report_stdout(&machine) {
        error!("failed to write report: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
