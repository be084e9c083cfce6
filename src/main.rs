use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use replay_names::config::{Config, DEFAULT_CONFIG_FILE};
use replay_names::{logging, Session, StdFilesystem};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "replay-names", about = "Tag, renumber and tidy recorded replay clips")]
struct Args {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or change the working folder
    Folder { path: Option<PathBuf> },
    /// List video files, newest name first
    List,
    /// Renumber DVR captures per recording session
    Format {
        #[arg(long)]
        dry_run: bool,
    },
    /// Replace originals with their "Trim" copies
    ReplaceTrims {
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the name a file would get with the given tags
    Preview {
        file: String,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Rename a file so it carries exactly the given tags
    Tag {
        file: String,
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Rename a file to a hand-edited name
    Rename { old: String, new: String },
    /// Manage the tag vocabulary
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
}

#[derive(Subcommand)]
enum TagsAction {
    List,
    Add { tag: String },
    Remove { tag: String },
    Search { query: String },
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn run(args: Args, mut session: Session<StdFilesystem>) -> Result<()> {
    let json = args.json;
    match args.command {
        Command::Folder { path: Some(path) } => {
            let folder = session.select_folder(&path)?;
            emit(json, &folder, || folder.display().to_string())?;
        }
        Command::Folder { path: None } => {
            let folder = session.folder();
            emit(json, &folder, || match &folder {
                Some(f) => f.display().to_string(),
                None => "No folder selected".to_string(),
            })?;
        }
        Command::List => {
            let names: Vec<String> = session
                .list_videos()
                .context("Cannot read folder")?
                .into_iter()
                .map(|e| e.name)
                .collect();
            emit(json, &names, || names.join("\n"))?;
        }
        Command::Format { dry_run: true } => {
            let plan = session.plan_batch_format()?;
            emit(json, &plan, || {
                let mut lines: Vec<String> = plan
                    .renames
                    .iter()
                    .map(|r| format!("{} -> {}", r.from.display(), r.to.display()))
                    .collect();
                lines.extend(plan.collisions.iter().map(|r| {
                    format!("skip {} ({} exists)", r.from.display(), r.to.display())
                }));
                lines.join("\n")
            })?;
        }
        Command::Format { dry_run: false } => {
            let report = session.batch_format()?;
            emit(json, &report, || format!("Formatted {} video files.", report.renamed))?;
        }
        Command::ReplaceTrims { dry_run: true } => {
            let plan = session.plan_replace_trimmed()?;
            emit(json, &plan, || {
                plan.replacements
                    .iter()
                    .map(|r| format!("{} -> {}", r.trimmed.display(), r.original.display()))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::ReplaceTrims { dry_run: false } => {
            let replaced = session
                .replace_trimmed()
                .context("Error replacing file; check the folder for a missing original")?;
            emit(json, &replaced, || {
                if replaced > 0 {
                    format!("Successfully replaced {replaced} trimmed videos.")
                } else {
                    "No matching Trim files and originals found.".to_string()
                }
            })?;
        }
        Command::Preview { file, tags } => {
            let preview = session.preview(&file, &tags);
            emit(json, &preview, || preview.clone())?;
        }
        Command::Tag {
            file,
            tags,
            dry_run,
        } => {
            let mut resolved = Vec::new();
            for tag in &tags {
                let tag = if dry_run {
                    session.resolve_tag(tag)
                } else {
                    session.add_or_select_tag(tag)?
                };
                resolved.extend(tag);
            }
            let new_name = session.preview(&file, &resolved);
            if !dry_run {
                session
                    .apply_rename(&file, &new_name)
                    .with_context(|| format!("Renaming {file} failed"))?;
            }
            emit(json, &new_name, || new_name.clone())?;
        }
        Command::Rename { old, new } => {
            let changed = session
                .apply_rename(&old, &new)
                .with_context(|| format!("Renaming {old} failed"))?;
            emit(json, &changed, || {
                if changed {
                    format!("Renamed to {}", new.trim())
                } else {
                    "Unchanged".to_string()
                }
            })?;
        }
        Command::Tags { action } => match action {
            TagsAction::List => {
                let tags = session.vocabulary().sorted();
                emit(json, &tags, || tags.join("\n"))?;
            }
            TagsAction::Add { tag } => {
                let tag = session.add_or_select_tag(&tag)?;
                emit(json, &tag, || tag.clone().unwrap_or_default())?;
            }
            TagsAction::Remove { tag } => {
                let removed = session.delete_tag(&tag)?;
                emit(json, &removed, || {
                    if removed {
                        format!("Deleted tag '{tag}'")
                    } else {
                        format!("No tag '{tag}'")
                    }
                })?;
            }
            TagsAction::Search { query } => {
                let matches = session.vocabulary().search(&query);
                emit(json, &matches, || matches.join("\n"))?;
            }
        },
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(&args.config);
    logging::init(&config.logging, args.verbose).context("Failed to set up logging")?;
    if let Err(e) = logging::trim_log(&config.logging) {
        error!("Failed to trim log file: {}", e);
    }

    info!("Starting Instant Replay Name Manager");

    let session = Session::new(config, args.config.clone(), StdFilesystem);
    run(args, session)
}
