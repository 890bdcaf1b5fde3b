//! Handlers for setup and shell integration: init, keygen, completions.

use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use locknote_core::crypto::{MasterKey, SECRET_KEY_ENV};
use locknote_core::JsonFileStore;

use crate::app::AppContext;
use crate::cli::{Cli, InitArgs};
use crate::config::{resolve_config_path, write_config, LockNoteConfig};

pub fn handle_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "locknote", &mut std::io::stdout());
    Ok(())
}

/// Print a fresh master key suitable for LOCKNOTE_SECRET_KEY.
pub fn handle_keygen(ctx: &AppContext) -> anyhow::Result<()> {
    let key = MasterKey::generate()?;
    let encoded = key.to_base64();
    if ctx.output().json {
        println!("{}", serde_json::json!({ "success": true, "key": encoded.as_str() }));
    } else if ctx.output().quiet {
        println!("{}", encoded.as_str());
    } else {
        println!("{}", encoded.as_str());
        eprintln!("Export it before running other commands:");
        eprintln!("  export {}=<key>", SECRET_KEY_ENV);
    }
    Ok(())
}

/// Write the config file and create an empty notes document.
pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }

    let notes_path: PathBuf = match args.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.notes_path()?,
    };
    JsonFileStore::open(&notes_path)?;
    write_config(&config_path, &LockNoteConfig::new(notes_path.clone()))?;

    let output = ctx.output();
    if output.json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "config": config_path.display().to_string(),
                "notes": notes_path.display().to_string(),
            })
        );
    } else if !output.quiet {
        println!("Config written to {}", config_path.display());
        println!("Notes stored at {}", notes_path.display());
    }
    Ok(())
}
