//! Matching commands: scan, test, diet, compare

use super::{print_json, Context};
use crate::ProfileArgs;
use mydna_cli::output::{format_count, Status};
use mydna_cli::report;
use mydna_core::error::exit_codes;
use mydna_matching::batch::{flagged_profiles, scan_profiles};
use mydna_matching::diet::{diet_ingredients_from_json, diet_ingredients_from_text};
use mydna_matching::{
    analyze, clean, partition, scan_with_levels, shared_across, tokenize_with, unique_for,
    ReferenceLists, TestReport,
};
use mydna_telemetry::metrics;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ProfileComparison<'a> {
    profile: &'a str,
    shared: Vec<String>,
    unique: Vec<String>,
}

/// Clean and tokenize label text, then scan it exactly
///
/// Without a profile every profile in the book is scanned.
pub fn scan(ctx: &Context, target: &ProfileArgs, text: &str) -> anyhow::Result<i32> {
    let book = ctx.load_book(target.profiles.as_deref())?;
    let tokens = tokenize_with(&clean(text), &ctx.normalizer_options());
    let options = ctx.scan_options();
    metrics().increment("scans");

    let Some(name) = ctx.profile_name(target) else {
        let lists: ReferenceLists = book.reference_lists().into_iter().collect();
        let scans = scan_profiles(&tokens, &lists, &options);
        let flagged = flagged_profiles(&scans);

        if ctx.is_json() {
            print_json(&scans)?;
        } else {
            print!("{}", report::render_profile_scans(&scans));
            if !flagged.is_empty() {
                Status::flagged(&format!(
                    "{} flagged: {}",
                    format_count(flagged.len(), "profile", "profiles"),
                    flagged.join(", ")
                ));
            }
        }
        return Ok(if flagged.is_empty() {
            exit_codes::SUCCESS
        } else {
            exit_codes::FAILURE
        });
    };

    let profile = book.require(&name)?;
    let result = scan_with_levels(&tokens, &profile.leveled_items(), &options);

    if ctx.is_json() {
        print_json(&result)?;
    } else {
        print!("{}", report::render_scan(&result));
    }

    Ok(if result.has_matches() {
        exit_codes::FAILURE
    } else {
        exit_codes::SUCCESS
    })
}

/// Containment test of a comma or newline separated list
pub fn test(ctx: &Context, target: &ProfileArgs, text: &str) -> anyhow::Result<i32> {
    let book = ctx.load_book(target.profiles.as_deref())?;
    let profile = book.require(&ctx.require_profile_name(target)?)?;
    metrics().increment("tests");

    let result = mydna_matching::test(text, &profile.item_names());
    print_test(ctx, &result)
}

/// Containment analysis of a diet plan file
///
/// Files ending in `.json`, or whose content starts with `{`, are read as
/// JSON documents; anything else as one ingredient per line.
pub fn diet(ctx: &Context, target: &ProfileArgs, file: &Path) -> anyhow::Result<i32> {
    let book = ctx.load_book(target.profiles.as_deref())?;
    let profile = book.require(&ctx.require_profile_name(target)?)?;

    if !file.exists() {
        return Err(mydna_core::Error::file_not_found(file).into());
    }
    let content = std::fs::read_to_string(file)?;
    let is_json = file.extension().is_some_and(|ext| ext == "json")
        || content.trim_start().starts_with('{');

    let ingredients = if is_json {
        diet_ingredients_from_json(&content)?
    } else {
        diet_ingredients_from_text(&content)
    };
    tracing::debug!(ingredients = ingredients.len(), json = is_json, "Read diet plan");
    metrics().increment("diets");

    let result = analyze(&ingredients, &profile.item_names());
    print_test(ctx, &result)
}

/// Shared and unique items across the whole book, or for one profile
/// when `--profile` or `general.default_profile` selects it
pub fn compare(ctx: &Context, target: &ProfileArgs) -> anyhow::Result<i32> {
    let book = ctx.load_book(target.profiles.as_deref())?;
    let lists: ReferenceLists = book.reference_lists().into_iter().collect();

    if let Some(name) = ctx.profile_name(target) {
        let comparison = ProfileComparison {
            profile: &name,
            unique: unique_for(&name, &lists)?,
            shared: shared_across(&lists),
        };
        if ctx.is_json() {
            print_json(&comparison)?;
        } else {
            let partition = mydna_matching::Partition {
                shared: comparison.shared,
                unique: vec![(name.clone(), comparison.unique)],
            };
            print!("{}", report::render_partition(&partition));
        }
        return Ok(exit_codes::SUCCESS);
    }

    let result = partition(&lists);
    if ctx.is_json() {
        print_json(&result)?;
    } else {
        print!("{}", report::render_partition(&result));
    }
    Ok(exit_codes::SUCCESS)
}

fn print_test(ctx: &Context, result: &TestReport) -> anyhow::Result<i32> {
    if ctx.is_json() {
        print_json(result)?;
    } else {
        print!("{}", report::render_test(result));
    }

    Ok(if result.is_clear() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    })
}
