use crate::snapshot::SnapshotDriver;
use anyhow::{Context as _, bail};
use formfill_dom::{Document, ElementRef, parse_html};
use formfill_engine::config::{ConfigLoader, FormfillConfig};
use formfill_engine::formatter::{
    format_candidates, format_entry, format_plan, format_selector_result,
};
use formfill_engine::protocol::StoredState;
use formfill_engine::{
    CandidateSummary, EntryStore, EntryUpdate, GlobalSettingsUpdate, PickerSession,
    ReplayRunner, SelectorOptions, build_candidate_list, entries_to_run, generate_selector,
    plan_entry,
};
use std::path::{Path, PathBuf};

pub struct Context {
    pub config: FormfillConfig,
    pub store: EntryStore,
}

impl Context {
    pub async fn load(config: Option<&Path>, store: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => ConfigLoader::load_from(path)
                .await
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ConfigLoader::load_default().await?,
        };
        let store_path = store.unwrap_or_else(|| config.store.path.clone());
        tracing::debug!(store = %store_path.display(), "using entry store");

        Ok(Self {
            store: EntryStore::new(store_path),
            config,
        })
    }
}

/// Clicked elements for a pick, each with the candidate index to keep.
pub struct Picks {
    pub input: Option<(String, usize)>,
    pub button: Option<(String, usize)>,
}

async fn load_snapshot(path: &Path) -> anyhow::Result<Document> {
    let html = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    parse_html(&html).with_context(|| format!("parsing {}", path.display()))
}

fn locate<'a>(doc: &'a Document, selector: &str) -> anyhow::Result<ElementRef<'a>> {
    match doc.query_selector(selector)? {
        Some(el) => Ok(el),
        None => bail!("No element matches {selector}"),
    }
}

pub async fn select(
    html: &Path,
    target: &str,
    disabled: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let doc = load_snapshot(html).await?;
    let el = locate(&doc, target)?;
    let result = generate_selector(&el, &SelectorOptions::disabling(disabled));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_selector_result(&result));
    }
    Ok(())
}

pub async fn candidates(ctx: &Context, html: &Path, target: &str, json: bool) -> anyhow::Result<()> {
    let doc = load_snapshot(html).await?;
    let el = locate(&doc, target)?;
    let summaries: Vec<CandidateSummary> =
        build_candidate_list(&el, &ctx.config.candidates)
            .iter()
            .map(|c| c.summary())
            .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        println!("{}", format_candidates(&summaries));
    }
    Ok(())
}

pub async fn list_entries(ctx: &Context) -> anyhow::Result<()> {
    let state = ctx.store.load().await?;
    let status = if state.global_settings.enabled { "enabled" } else { "disabled" };
    println!(
        "Replay {}, {} entries ({})",
        status,
        state.entries.len(),
        ctx.store.path().display()
    );
    for entry in &state.entries {
        println!("{}", format_entry(entry, &ctx.config.security));
    }
    Ok(())
}

pub async fn remove_entry(ctx: &Context, id: &str) -> anyhow::Result<()> {
    if !ctx.store.remove_entry(id).await? {
        bail!("No entry with id {id}");
    }
    println!("Removed {id}");
    Ok(())
}

pub async fn set_enabled(ctx: &Context, id: &str, enabled: bool) -> anyhow::Result<()> {
    if !ctx.store.update_entry(id, EntryUpdate::enabled(enabled)).await? {
        bail!("No entry with id {id}");
    }
    println!("{} {id}", if enabled { "Enabled" } else { "Disabled" });
    Ok(())
}

pub async fn set_global(ctx: &Context, enabled: bool) -> anyhow::Result<()> {
    ctx.store
        .update_global_settings(GlobalSettingsUpdate {
            enabled: Some(enabled),
            default_delay: None,
        })
        .await?;
    println!("Replay {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub async fn match_url(ctx: &Context, url: &str) -> anyhow::Result<()> {
    let state = ctx.store.load().await?;
    let entries = entries_to_run(&state, url);
    if entries.is_empty() {
        println!("No entries apply to {url}");
    }
    for entry in entries {
        println!("{}", format_entry(entry, &ctx.config.security));
    }
    Ok(())
}

pub async fn plan(ctx: &Context, url: &str) -> anyhow::Result<()> {
    let state = ctx.store.load().await?;
    for entry in entries_to_run(&state, url) {
        println!("== {} ==", entry.id);
        println!("{}", format_plan(&plan_entry(entry), &ctx.config.security));
    }
    Ok(())
}

/// Actions the driver performed for one entry, plus selectors never found.
#[derive(Debug)]
pub struct EntryReplay {
    pub id: String,
    pub actions: Vec<String>,
    pub missing: Vec<String>,
}

/// Runs entries one at a time so each driver log is drained into its own entry.
async fn replay_entries(
    runner: &ReplayRunner<SnapshotDriver>,
    state: &StoredState,
    url: &str,
) -> anyhow::Result<Vec<EntryReplay>> {
    let mut replays = Vec::new();
    for entry in entries_to_run(state, url) {
        tracing::debug!(entry = %entry.id, url, "replaying entry");
        let report = runner
            .run_entry(entry)
            .await
            .with_context(|| format!("replaying {}", entry.id))?;
        replays.push(EntryReplay {
            id: entry.id.clone(),
            actions: runner.driver().take_log(),
            missing: report.missing,
        });
    }
    Ok(replays)
}

pub async fn replay(ctx: &Context, html: &Path, url: &str) -> anyhow::Result<()> {
    let state = ctx.store.load().await?;
    let runner = ReplayRunner::new(SnapshotDriver::new(load_snapshot(html).await?));

    for replay in replay_entries(&runner, &state, url).await? {
        println!("== {} ==", replay.id);
        for line in replay.actions {
            println!("{line}");
        }
        for selector in replay.missing {
            println!("missing {selector}");
        }
    }
    Ok(())
}

pub async fn pick(
    ctx: &Context,
    html: &Path,
    url: &str,
    picks: Picks,
    value: &str,
) -> anyhow::Result<()> {
    let doc = load_snapshot(html).await?;
    let mut session: PickerSession<ElementRef<'_>> =
        PickerSession::new(ctx.config.candidates)
            .with_execution(ctx.config.execution.settings());

    if let Some((target, index)) = &picks.input {
        session.pick(&locate(&doc, target)?);
        session.select_candidate(*index)?;
    }

    if let Some((target, index)) = &picks.button {
        session.switch_to_button_mode()?;
        session.pick(&locate(&doc, target)?);
        session.select_candidate(*index)?;
    }

    let entry = ctx.store.add_entry(session.confirm(url, value)?).await?;
    println!("Saved {}", format_entry(&entry, &ctx.config.security));
    Ok(())
}
