//! LockNote CLI - local notes with optional per-note password protection
//!
//! Thin command-line front end over `locknote-core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod helpers;
mod instance;
mod logging;
mod output;

use clap::Parser;
use locknote_core::crypto::SECRET_KEY_ENV;
use locknote_core::{ErrorKind, LockNoteError};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::*;
use crate::constants::exit_codes;

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(err) => {
            logging::init(None, cli.quiet);
            tracing::warn!("ignoring config: {:#}", err);
            None
        }
    };
    logging::init(config.as_ref(), cli.quiet);

    let ctx = AppContext::new(&cli, config);
    if let Err(err) = run(&ctx, &cli) {
        let core = err.downcast_ref::<LockNoteError>();
        let output = ctx.output();
        output.error(core.map(LockNoteError::kind), &format!("{:#}", err));
        if core.is_some_and(LockNoteError::is_fatal) && !output.json {
            eprintln!(
                "Hint: generate a key with `locknote keygen` and export it as {}",
                SECRET_KEY_ENV
            );
        }
        std::process::exit(exit_code(core));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => handle_init(ctx, args),
        Commands::Keygen => handle_keygen(ctx),
        Commands::New(args) => handle_new(ctx, args),
        Commands::Edit(args) => handle_edit(ctx, args),
        Commands::Show(args) => handle_show(ctx, args),
        Commands::List => handle_list(ctx),
        Commands::Trash => handle_trash(ctx),
        Commands::Delete(args) => handle_delete(ctx, args),
        Commands::Restore(args) => handle_restore(ctx, args),
        Commands::Purge(args) => handle_purge(ctx, args),
        Commands::EmptyTrash => handle_empty_trash(ctx),
        Commands::Pin(args) => handle_pin(ctx, args, true),
        Commands::Unpin(args) => handle_pin(ctx, args, false),
        Commands::Completions { shell } => handle_completions(*shell),
    }
}

fn exit_code(err: Option<&LockNoteError>) -> i32 {
    match err.map(LockNoteError::kind) {
        Some(ErrorKind::NotFound) => exit_codes::NOT_FOUND,
        Some(ErrorKind::Validation) => exit_codes::INVALID_INPUT,
        Some(ErrorKind::Authentication) => exit_codes::AUTH_FAILED,
        Some(ErrorKind::Trashed) => exit_codes::TRASHED,
        Some(ErrorKind::Decryption) => exit_codes::DECRYPTION_FAILED,
        Some(ErrorKind::Configuration) | Some(ErrorKind::Crypto) => exit_codes::CONFIGURATION,
        Some(ErrorKind::Storage) => exit_codes::STORAGE,
        None => 1,
    }
}
