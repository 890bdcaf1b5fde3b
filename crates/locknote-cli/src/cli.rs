use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use locknote_core::VERSION;

/// LockNote - local notes with optional per-note password protection
#[derive(Parser)]
#[command(name = "locknote")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the notes document
    #[arg(short, long, global = true, env = "LOCKNOTE_PATH")]
    pub notes: Option<String>,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init(InitArgs),

    /// Generate a new base64 master key
    Keygen,

    /// Create a new note
    New(NewArgs),

    /// Replace a note's content and lock state
    Edit(EditArgs),

    /// Show a note, prompting for its password if locked
    Show(IdArgs),

    /// List active notes
    List,

    /// List trashed notes
    Trash,

    /// Move a note to the trash
    Delete(IdArgs),

    /// Restore a note from the trash
    Restore(IdArgs),

    /// Permanently delete a trashed note
    Purge(IdArgs),

    /// Permanently delete every trashed note
    EmptyTrash,

    /// Pin a note
    Pin(IdArgs),

    /// Unpin a note
    Unpin(IdArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Notes document path to record in the config
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `new` command
#[derive(Args)]
pub struct NewArgs {
    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Lock the note behind a password
    #[arg(long)]
    pub lock: bool,

    /// Add tags (comma-separated values are split)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Lock the note (keeps the current password unless --new-password)
    #[arg(long, conflicts_with = "unlock")]
    pub lock: bool,

    /// Store the note unencrypted
    #[arg(long)]
    pub unlock: bool,

    /// Set a new password while locking
    #[arg(long, conflicts_with = "unlock")]
    pub new_password: bool,

    /// Replace tags (comma-separated values are split)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for commands taking a single note ID
#[derive(Args)]
pub struct IdArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_with_tags() {
        let cli = Cli::try_parse_from([
            "locknote", "new", "--body", "hi", "--lock", "-t", "a, b", "-t", "c",
        ])
        .unwrap();
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.body.as_deref(), Some("hi"));
                assert!(args.lock);
                assert_eq!(args.tag, vec!["a, b".to_string(), "c".to_string()]);
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn test_edit_lock_conflicts_with_unlock() {
        let result = Cli::try_parse_from(["locknote", "edit", "1", "--lock", "--unlock"]);
        assert!(result.is_err());
    }
}
