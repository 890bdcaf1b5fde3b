//! Handlers for creating, editing and reading notes.

use locknote_core::{LockNoteError, SaveNote};

use crate::app::AppContext;
use crate::cli::{EditArgs, IdArgs, NewArgs};
use crate::helpers::{is_interactive, prompt_new_password, prompt_password, read_note_body};

pub fn handle_new(ctx: &AppContext, args: &NewArgs) -> anyhow::Result<()> {
    let interactive = is_interactive(args.no_input);
    let body = read_note_body(args.no_input, args.body.clone())?;

    let mut request = SaveNote::new(body)
        .locked(args.lock)
        .with_tags(args.tag.clone());
    if args.lock {
        let password = prompt_new_password(interactive)?;
        request = request.with_password(password.as_str());
    }

    let session = ctx.open()?;
    let view = session.service.save(&request)?;
    ctx.output().receipt("Created", &view);
    Ok(())
}

/// Replace a note's body.
///
/// A locked note's current password is checked before anything is
/// written. Without `--lock`/`--unlock` the note keeps its lock state, and
/// without `--tag` it keeps its tags.
pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let interactive = is_interactive(args.no_input);
    let session = ctx.open()?;
    let record = session
        .record(args.id)?
        .ok_or(LockNoteError::NotFound(args.id))?;
    if record.is_trashed() {
        return Err(LockNoteError::Trashed(args.id).into());
    }

    if record.locked {
        let password = prompt_password(interactive)?;
        session.service.unlock(args.id, &password)?;
    }

    let lock = if args.unlock {
        false
    } else {
        args.lock || record.locked
    };
    let body = read_note_body(args.no_input, args.body.clone())?;
    let tags = if args.tag.is_empty() {
        record.tags.clone()
    } else {
        args.tag.clone()
    };

    let mut request = SaveNote::new(body).locked(lock).with_tags(tags);
    if lock && (args.new_password || !record.locked) {
        let password = prompt_new_password(interactive)?;
        request = request.with_password(password.as_str());
    }

    let view = session.service.edit(args.id, &request)?;
    ctx.output().receipt("Updated", &view);
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let record = session
        .record(args.id)?
        .ok_or(LockNoteError::NotFound(args.id))?;

    let view = if record.locked && !record.is_trashed() {
        let password = prompt_password(is_interactive(args.no_input))?;
        session.service.unlock(args.id, &password)?
    } else {
        session.service.unlock(args.id, "")?
    };
    ctx.output().note(&view);
    Ok(())
}

pub fn handle_list(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let views = session.service.list_active()?;
    ctx.output().notes(&views, false);
    Ok(())
}

pub fn handle_pin(ctx: &AppContext, args: &IdArgs, pinned: bool) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let view = session.service.set_pinned(args.id, pinned)?;
    ctx.output().receipt(if pinned { "Pinned" } else { "Unpinned" }, &view);
    Ok(())
}
