use crate::assets::DocumentKind;
use crate::commands::context::AppContext;
use crate::commands::parser::{Assignment, Command, CommandResult, USAGE};
use crate::commands::utils::{apply_assignment, describe_record, describe_step};
use crate::entity::EntityId;
use crate::settings::{GlobalDefaults, OverrideRecord};

use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};

// Handle a single command and report to `out`
pub async fn handle_command(ctx: &AppContext, command: Command, out: &mut dyn Write) -> CommandResult {
    match command {
        Command::Resolve(entity) => handle_cmd_resolve(ctx, &entity, out),
        Command::Reset(entity) => handle_cmd_reset(ctx, &entity, out),
        Command::Save(entity, pairs) => handle_cmd_save(ctx, &entity, &pairs, out),
        Command::SetDefaults(pairs) => handle_cmd_set_defaults(ctx, &pairs, out),
        Command::Import(entity, kind, file) => handle_cmd_import(ctx, &entity, kind, &file, out),
        Command::ImportCover(entity, image) => handle_cmd_import_cover(ctx, entity, image, out).await,
        Command::DeleteCover(entity) => handle_cmd_delete_cover(ctx, &entity, out),
        Command::Grant(dir) => handle_cmd_grant(ctx, &dir, out),
        Command::Readiness => handle_cmd_readiness(ctx, out),
        Command::Help => {
            let _ = writeln!(out, "{}", USAGE);
            CommandResult::Success
        }
        Command::Unknown(cmd) => {
            let _ = writeln!(out, "Unknown command: {}\n{}", cmd, USAGE);
            CommandResult::Failed
        }
    }
}

// Command handler for resolve
fn handle_cmd_resolve(ctx: &AppContext, entity: &EntityId, out: &mut dyn Write) -> CommandResult {
    let record = ctx.settings.resolve(entity);
    let source = if ctx.settings.has_override(entity) {
        "override"
    } else {
        "defaults"
    };
    let _ = writeln!(out, "# {} ({})", entity.key().unwrap_or("<unknown>"), source);
    let _ = writeln!(out, "{}", describe_record(&record));
    CommandResult::Success
}

// Command handler for reset
fn handle_cmd_reset(ctx: &AppContext, entity: &EntityId, out: &mut dyn Write) -> CommandResult {
    if ctx.settings.delete(entity) {
        let _ = writeln!(out, "Settings reset to defaults");
    } else {
        let _ = writeln!(out, "No per-game settings to reset");
    }
    CommandResult::Success
}

fn apply_all(
    mut record: OverrideRecord,
    pairs: &[Assignment],
    out: &mut dyn Write,
) -> Option<OverrideRecord> {
    for pair in pairs {
        if let Err(e) = apply_assignment(&mut record, pair) {
            let _ = writeln!(out, "{}", e);
            return None;
        }
    }
    Some(record)
}

// Command handler for save: current effective settings with the given changes
fn handle_cmd_save(
    ctx: &AppContext,
    entity: &EntityId,
    pairs: &[Assignment],
    out: &mut dyn Write,
) -> CommandResult {
    let Some(key) = entity.key() else {
        let _ = writeln!(out, "No serial or checksum given");
        return CommandResult::Failed;
    };
    let Some(record) = apply_all(ctx.settings.resolve(entity), pairs, out) else {
        return CommandResult::Failed;
    };
    if ctx.settings.save(entity, &record) {
        let _ = writeln!(out, "# {} (override)", key);
        let _ = writeln!(out, "{}", describe_record(&record));
        CommandResult::Success
    } else {
        let _ = writeln!(out, "Failed to save settings for {}", key);
        CommandResult::Failed
    }
}

// Command handler for set-default
fn handle_cmd_set_defaults(
    ctx: &AppContext,
    pairs: &[Assignment],
    out: &mut dyn Write,
) -> CommandResult {
    let Some(record) = apply_all(ctx.defaults.snapshot(), pairs, out) else {
        return CommandResult::Failed;
    };
    ctx.defaults.set(&record);
    info!("Global defaults updated");
    let _ = writeln!(out, "# defaults");
    let _ = writeln!(out, "{}", describe_record(&record));
    CommandResult::Success
}

// Command handler for import-cheats and import-patches
fn handle_cmd_import(
    ctx: &AppContext,
    entity: &EntityId,
    kind: DocumentKind,
    file: &str,
    out: &mut dyn Write,
) -> CommandResult {
    match ctx.importer.import_document(entity, kind, Path::new(file)) {
        Ok(outcome) => {
            let _ = writeln!(
                out,
                "{} imported for {}{}",
                kind,
                outcome.key,
                if outcome.mirrored { " (mirrored)" } else { "" }
            );
            CommandResult::Success
        }
        Err(e) => {
            error!("Failed to import {}: {}", kind, e);
            let _ = writeln!(out, "Failed to import {}: {}", kind, e);
            CommandResult::Failed
        }
    }
}

// Command handler for import-cover
async fn handle_cmd_import_cover(
    ctx: &AppContext,
    entity: EntityId,
    image: String,
    out: &mut dyn Write,
) -> CommandResult {
    match ctx.importer.import_cover(entity, PathBuf::from(image)).await {
        Ok(outcome) if outcome.mirrored => {
            let _ = writeln!(out, "Cover saved for {}", outcome.key);
            CommandResult::Success
        }
        Ok(outcome) => {
            let _ = writeln!(
                out,
                "Cover for {} not stored: grant a data folder first",
                outcome.key
            );
            CommandResult::Failed
        }
        Err(e) => {
            error!("Failed to import cover: {}", e);
            let _ = writeln!(out, "Failed to import cover: {}", e);
            CommandResult::Failed
        }
    }
}

// Command handler for delete-cover
fn handle_cmd_delete_cover(ctx: &AppContext, entity: &EntityId, out: &mut dyn Write) -> CommandResult {
    match ctx.importer.delete_cover(entity) {
        Ok(true) => {
            let _ = writeln!(out, "Custom cover deleted");
            CommandResult::Success
        }
        Ok(false) => {
            let _ = writeln!(out, "No custom cover found");
            CommandResult::Success
        }
        Err(e) => {
            let _ = writeln!(out, "Failed to delete cover: {}", e);
            CommandResult::Failed
        }
    }
}

// Command handler for grant
fn handle_cmd_grant(ctx: &AppContext, dir: &str, out: &mut dyn Write) -> CommandResult {
    ctx.backend.set_mirror_grant(dir);
    if ctx.backend.has_mirror_root() {
        info!("Data folder granted: {}", dir);
        let _ = writeln!(out, "Data folder set to {}", dir);
        CommandResult::Success
    } else {
        let _ = writeln!(out, "Recorded {} but it is not a readable directory", dir);
        CommandResult::Failed
    }
}

// Command handler for readiness
fn handle_cmd_readiness(ctx: &AppContext, out: &mut dyn Write) -> CommandResult {
    for status in ctx.readiness.evaluate() {
        let _ = writeln!(out, "{}", describe_step(&status));
    }
    match ctx.readiness.first_incomplete() {
        Some(step) => {
            let _ = writeln!(out, "Next: {}", step.title());
        }
        None => {
            let _ = writeln!(out, "Setup complete");
        }
    }
    CommandResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::prefs::Preferences;
    use crate::storage::DirectoryGrants;
    use std::fs;
    use std::sync::Arc;

    fn context(root: &Path) -> AppContext {
        AppContext::with_services(
            &AppConfig::with_root(root),
            Arc::new(Preferences::in_memory()),
            Arc::new(DirectoryGrants),
        )
    }

    async fn run(ctx: &AppContext, command: Command) -> (CommandResult, String) {
        let mut out = Vec::new();
        let result = handle_command(ctx, command, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_resolve_reports_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let (result, text) = run(&ctx, Command::Resolve("SLUS-20062".into())).await;
        assert_eq!(result, CommandResult::Success);
        assert!(text.starts_with("# SLUS-20062 (defaults)"));
        assert!(text.contains("renderer           Auto"));
    }

    #[tokio::test]
    async fn test_import_then_reset() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let source = dir.path().join("codes.pnach");
        fs::write(&source, b"patch=1,EE,0,word,0\n").unwrap();

        let (result, text) = run(
            &ctx,
            Command::Import(
                "SLUS-99999".into(),
                DocumentKind::Cheats,
                source.to_string_lossy().to_string(),
            ),
        )
        .await;
        assert_eq!(result, CommandResult::Success);
        assert_eq!(text, "Cheats imported for SLUS-99999\n");

        let (result, text) = run(&ctx, Command::Reset("SLUS-99999".into())).await;
        assert_eq!(result, CommandResult::Success);
        assert_eq!(text, "No per-game settings to reset\n");
    }

    fn pair(option: &str, value: &str) -> Assignment {
        Assignment {
            option: option.into(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn test_save_then_reset() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let entity = EntityId::new("", "4C9EE7DF");

        let (result, _) = run(
            &ctx,
            Command::Save(entity.clone(), vec![pair("renderer", "Vulkan"), pair("upscale", "4")]),
        )
        .await;
        assert_eq!(result, CommandResult::Success);
        assert!(dir.path().join("gamesettings/4C9EE7DF.ini").is_file());

        let (_, text) = run(&ctx, Command::Resolve(entity.clone())).await;
        assert!(text.starts_with("# 4C9EE7DF (override)"));
        assert!(text.contains("renderer           Vulkan"));

        let (_, text) = run(&ctx, Command::Reset(entity)).await;
        assert_eq!(text, "Settings reset to defaults\n");
    }

    #[tokio::test]
    async fn test_save_with_bad_value_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let (result, text) = run(
            &ctx,
            Command::Save("SLUS-20062".into(), vec![pair("renderer", "Glide")]),
        )
        .await;
        assert_eq!(result, CommandResult::Failed);
        assert_eq!(text, "invalid value for renderer: Glide\n");
        assert!(!dir.path().join("gamesettings").exists());
    }

    #[tokio::test]
    async fn test_set_default_flows_into_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let (result, _) = run(&ctx, Command::SetDefaults(vec![pair("cheats", "true")])).await;
        assert_eq!(result, CommandResult::Success);

        let (_, text) = run(&ctx, Command::Resolve("SLUS-20062".into())).await;
        assert!(text.contains("cheats             true"));
    }

    #[tokio::test]
    async fn test_grant_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let missing = dir.path().join("nope").to_string_lossy().to_string();
        let (result, _) = run(&ctx, Command::Grant(missing)).await;
        assert_eq!(result, CommandResult::Failed);

        let mirror = tempfile::tempdir().unwrap();
        let (result, _) = run(
            &ctx,
            Command::Grant(mirror.path().to_string_lossy().to_string()),
        )
        .await;
        assert_eq!(result, CommandResult::Success);
    }

    #[tokio::test]
    async fn test_readiness_lists_next_step() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let (result, text) = run(&ctx, Command::Readiness).await;
        assert_eq!(result, CommandResult::Success);
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("Next: Data folder\n"));
    }

    #[tokio::test]
    async fn test_unknown_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let (result, text) = run(&ctx, Command::Unknown("frob".into())).await;
        assert_eq!(result, CommandResult::Failed);
        assert!(text.starts_with("Unknown command: frob"));
    }
}
