mod cli;
mod commands;
mod config;
mod manifest;
mod paths;
mod reconcile;
mod resource;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use commands::Session;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
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

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "npctl", &mut io::stdout());
            Ok(())
        }
        Command::Plan(args) => {
            let session = Session::open(cli.api)?;
            commands::plan::run(&ctx, &session, args.target.as_deref())
        }
        Command::Apply(args) => {
            let mut session = Session::open(cli.api)?;
            commands::apply::apply(&ctx, &mut session, args)
        }
        Command::Destroy(args) => {
            let mut session = Session::open(cli.api)?;
            commands::apply::destroy(&ctx, &mut session, args)
        }
        Command::Show(args) => {
            let session = Session::open(cli.api)?;
            commands::show::run(&session, args.target.as_deref())
        }
        Command::Spec(cmd) => {
            let session = Session::open(cli.api)?;
            commands::spec::run(&session, cmd)
        }
    }
}
