//! Handlers for the trash lifecycle.

use crate::app::AppContext;
use crate::cli::IdArgs;

pub fn handle_trash(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let views = session.service.list_trash()?;
    ctx.output().notes(&views, true);
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let view = session.service.delete(args.id)?;
    ctx.output().receipt("Trashed", &view);
    Ok(())
}

pub fn handle_restore(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let view = session.service.restore(args.id)?;
    ctx.output().receipt("Restored", &view);
    Ok(())
}

pub fn handle_purge(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let view = session.service.purge(args.id)?;
    ctx.output().receipt("Purged", &view);
    Ok(())
}

pub fn handle_empty_trash(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open()?;
    let count = session.service.empty_trash()?;
    ctx.output().purged(count);
    Ok(())
}
