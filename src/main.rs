mod cli;
mod commands;
mod config;
mod prompt;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub no_interaction: bool,
    pub assume_no: bool,
    pub settings: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_interaction: cli.no_interaction,
        assume_no: cli.assume_no,
        settings: cli.settings,
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error(&format!("{err:#}"));
            if let Some(engine_err) = err.downcast_ref::<mergekit::Error>() {
                let category = engine_err.category();
                ui::dim(&format!("{}. {}", category.description(), category.advice()));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Sync(args) => commands::sync::run(ctx, args),
        Command::Parameters(args) => commands::parameters::run(ctx, args),
        Command::Hook(cmd) => commands::hook::run(ctx, cmd),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "docsync", &mut io::stdout());
            Ok(())
        }
    }
}
