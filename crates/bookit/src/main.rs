mod cli;
mod commands;
mod config;
mod error;
mod output;
mod view;

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookit_core::AppController;

use crate::cli::{Cli, Command, OutputFormat};
use crate::error::CliError;
use crate::view::{ConsoleRenderer, ToastPrinter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    match command {
        // Config commands never touch the server
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bookit", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let resolved = config::resolve(&global)?;
            let color = output::should_color(global.color);
            let banner = !global.quiet
                && global.output == OutputFormat::Table
                && std::io::stderr().is_terminal();

            let controller = AppController::new(
                resolved.client.clone(),
                resolved.sessions.clone(),
                Box::new(ConsoleRenderer::new(banner, color)),
            )?;
            let mut toasts = ToastPrinter::new(controller.notifier(), color, global.quiet);

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &controller, &resolved, &global).await;

            toasts.flush(result.is_err());
            controller.destroy();
            controller.notifier().shutdown();
            result
        }
    }
}
