//! Command handlers.

mod misc;
mod notes;
mod trash;

pub use misc::{handle_completions, handle_init, handle_keygen};
pub use notes::{handle_edit, handle_list, handle_new, handle_pin, handle_show};
pub use trash::{handle_delete, handle_empty_trash, handle_purge, handle_restore, handle_trash};
