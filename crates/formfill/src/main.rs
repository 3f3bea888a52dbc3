use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod snapshot;

#[derive(Parser)]
#[command(name = "formfill", version, about = "Pick, save and replay form fills")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./formfill.yaml, then ~/.formfill/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Entry store, overriding the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a selector for one element of an HTML snapshot
    Select {
        /// HTML file
        html: PathBuf,
        /// Selector locating the element to describe
        #[arg(long)]
        target: String,
        /// Attributes to leave out (id, name, type, role, aria-label, placeholder, textContent)
        #[arg(long = "disable")]
        disabled: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Rank pick candidates around a clicked element
    Candidates {
        html: PathBuf,
        /// Selector locating the clicked element
        #[arg(long)]
        target: String,
        #[arg(long)]
        json: bool,
    },
    /// Manage saved entries
    Entries {
        #[command(subcommand)]
        action: EntriesAction,
    },
    /// List enabled entries that apply to a URL
    Match { url: String },
    /// Show the replay steps for every entry that applies to a URL
    Plan { url: String },
    /// Replay applicable entries against an HTML snapshot
    Replay {
        html: PathBuf,
        #[arg(long)]
        url: String,
    },
    /// Pick an input (and optionally a button) and save the entry
    Pick {
        html: PathBuf,
        /// Page URL the snapshot came from
        #[arg(long)]
        url: String,
        /// Clicked element for the input
        #[arg(long)]
        input: Option<String>,
        /// Candidate index to keep for the input
        #[arg(long, default_value_t = 0)]
        input_index: usize,
        /// Clicked element for the button
        #[arg(long)]
        button: Option<String>,
        #[arg(long, default_value_t = 0)]
        button_index: usize,
        /// Value typed into the input on replay
        #[arg(long, default_value = "")]
        value: String,
    },
}

#[derive(Subcommand)]
enum EntriesAction {
    List,
    Remove { id: String },
    Enable { id: String },
    Disable { id: String },
    /// Turn all replay on or off
    Global {
        #[arg(long)]
        enabled: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let ctx = commands::Context::load(args.config.as_deref(), args.store).await?;

    match args.command {
        Command::Select {
            html,
            target,
            disabled,
            json,
        } => commands::select(&html, &target, disabled, json).await,
        Command::Candidates { html, target, json } => {
            commands::candidates(&ctx, &html, &target, json).await
        }
        Command::Entries { action } => match action {
            EntriesAction::List => commands::list_entries(&ctx).await,
            EntriesAction::Remove { id } => commands::remove_entry(&ctx, &id).await,
            EntriesAction::Enable { id } => commands::set_enabled(&ctx, &id, true).await,
            EntriesAction::Disable { id } => commands::set_enabled(&ctx, &id, false).await,
            EntriesAction::Global { enabled } => commands::set_global(&ctx, enabled).await,
        },
        Command::Match { url } => commands::match_url(&ctx, &url).await,
        Command::Plan { url } => commands::plan(&ctx, &url).await,
        Command::Replay { html, url } => commands::replay(&ctx, &html, &url).await,
        Command::Pick {
            html,
            url,
            input,
            input_index,
            button,
            button_index,
            value,
        } => {
            let picks = commands::Picks {
                input: input.map(|sel| (sel, input_index)),
                button: button.map(|sel| (sel, button_index)),
            };
            commands::pick(&ctx, &html, &url, picks, &value).await
        }
    }
}
