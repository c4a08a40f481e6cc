//! Profile book management

use super::{print_json, Context};
use clap::Subcommand;
use mydna_cli::output::{format_count, Status};
use mydna_cli::report;
use mydna_core::error::exit_codes;
use mydna_core::profile::{Profile, ProfileBook};
use mydna_core::{Error, ErrorCode};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Import an `{"intolerances": [...]}` upload as a profile
    Import {
        /// Upload file
        file: PathBuf,

        /// Name of the new profile
        #[arg(short, long)]
        name: String,

        /// Replace a profile of the same name
        #[arg(long)]
        replace: bool,
    },

    /// Report integrity problems in the book
    Validate,

    /// Summary counts
    Stats,

    /// Move the items of one profile into another
    Merge { source: String, target: String },

    /// Find profiles by name or item
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// List profiles with their item counts
    List,

    /// Rename a profile
    Rename { old: String, new: String },

    /// Copy a profile under a new name
    Duplicate { name: String, new_name: String },

    /// Delete a profile
    Remove { name: String },
}

pub fn run(ctx: &Context, profiles: Option<&Path>, command: ProfileCommand) -> anyhow::Result<i32> {
    let path = ctx.profiles_path(profiles);

    match command {
        ProfileCommand::Import {
            file,
            name,
            replace,
        } => import(ctx, &path, &file, &name, replace),
        ProfileCommand::Validate => validate(ctx, &path),
        ProfileCommand::Stats => {
            let stats = ctx.load_book(Some(&path))?.stats();
            if ctx.is_json() {
                print_json(&stats)?;
            } else {
                print!("{}", report::render_stats(&stats));
            }
            Ok(exit_codes::SUCCESS)
        }
        ProfileCommand::Merge { source, target } => {
            let mut book = ctx.load_book(Some(&path))?;
            let added = book.merge(&source, &target)?;
            book.save(&path)?;
            if ctx.is_json() {
                print_json(&json!({ "source": source, "target": target, "added": added }))?;
            } else {
                Status::success(&format!(
                    "Merged {} into {} ({} added)",
                    source,
                    target,
                    format_count(added, "intolerance", "intolerances")
                ));
            }
            Ok(exit_codes::SUCCESS)
        }
        ProfileCommand::Search { query } => {
            let book = ctx.load_book(Some(&path))?;
            let hits = book.search(&query);
            if ctx.is_json() {
                print_json(&hits)?;
            } else {
                print!("{}", report::render_search(&query, &hits));
            }
            Ok(exit_codes::SUCCESS)
        }
        ProfileCommand::List => list(ctx, &path),
        ProfileCommand::Rename { old, new } => edit(ctx, &path, |book| {
            book.rename(&old, &new)?;
            Ok(format!("Renamed {} to {}", old, new))
        }),
        ProfileCommand::Duplicate { name, new_name } => edit(ctx, &path, |book| {
            book.duplicate(&name, &new_name)?;
            Ok(format!("Copied {} to {}", name, new_name))
        }),
        ProfileCommand::Remove { name } => edit(ctx, &path, |book| {
            book.remove(&name)?;
            Ok(format!("Removed {}", name))
        }),
    }
}

fn import(ctx: &Context, path: &Path, file: &Path, name: &str, replace: bool) -> anyhow::Result<i32> {
    if !file.exists() {
        return Err(Error::file_not_found(file).into());
    }
    let content = std::fs::read_to_string(file)?;
    let (profile, import_report) = Profile::from_import_json(name, &content)?;

    let mut book = if path.exists() {
        ctx.load_book(Some(path))?
    } else {
        ProfileBook::new()
    };

    if replace {
        book.upsert(profile)?;
    } else {
        book.insert(profile)?;
    }
    book.save(path)?;

    if ctx.is_json() {
        print_json(&json!({ "profile": name, "report": import_report }))?;
    } else {
        Status::success(&report::render_import(name, &import_report));
        if import_report.rejected > 0 {
            Status::warning("Entries need item, category and a level of 1, 2 or 3");
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn validate(ctx: &Context, path: &Path) -> anyhow::Result<i32> {
    let (book, load_report) = ProfileBook::load(path)?;
    let mut issues = book.validate();
    if load_report.rejected > 0 {
        issues.push(format!(
            "{} skipped: missing item, category or level",
            format_count(load_report.rejected, "invalid entry", "invalid entries")
        ));
    }
    if load_report.duplicates > 0 {
        issues.push(format!(
            "{} skipped",
            format_count(load_report.duplicates, "duplicate item", "duplicate items")
        ));
    }

    if ctx.is_json() {
        print_json(&json!({ "valid": issues.is_empty(), "issues": issues }))?;
    } else if issues.is_empty() {
        Status::success(&format!(
            "{} valid",
            format_count(book.len(), "profile", "profiles")
        ));
    } else {
        for issue in &issues {
            Status::warning(issue);
        }
    }

    Ok(if issues.is_empty() {
        exit_codes::SUCCESS
    } else {
        ErrorCode::ValidationError.exit_code()
    })
}

fn list(ctx: &Context, path: &Path) -> anyhow::Result<i32> {
    let book = ctx.load_book(Some(path))?;

    if ctx.is_json() {
        print_json(&book.profiles())?;
        return Ok(exit_codes::SUCCESS);
    }

    if book.is_empty() {
        Status::info("No profiles yet. Import one with `mydna profile import`");
        return Ok(exit_codes::SUCCESS);
    }

    Status::header("Profiles");
    for profile in book.profiles() {
        println!(
            "{} ({})",
            profile.name,
            format_count(profile.items().len(), "intolerance", "intolerances")
        );
    }
    Ok(exit_codes::SUCCESS)
}

/// Load, change and save the book, printing the returned message
fn edit(
    ctx: &Context,
    path: &Path,
    change: impl FnOnce(&mut ProfileBook) -> mydna_core::Result<String>,
) -> anyhow::Result<i32> {
    let mut book = ctx.load_book(Some(path))?;
    let message = change(&mut book)?;
    book.save(path)?;

    if ctx.is_json() {
        print_json(&json!({ "message": message }))?;
    } else {
        Status::success(&message);
    }
    Ok(exit_codes::SUCCESS)
}
