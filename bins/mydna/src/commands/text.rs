//! Text pipeline commands: clean, tokenize, parse, extract

use super::{print_json, Context};
use mydna_core::error::exit_codes;
use mydna_matching::{
    clean as clean_text, extract_candidates_with, parse_ingredients_with, tokenize_with,
    CLEAN_PIPELINE,
};
use serde::Serialize;

#[derive(Serialize)]
struct StepOutput<'a> {
    step: &'a str,
    output: String,
}

pub fn clean(ctx: &Context, text: &str, steps: bool) -> anyhow::Result<i32> {
    if !steps {
        let cleaned = clean_text(text);
        if ctx.is_json() {
            print_json(&cleaned)?;
        } else {
            println!("{}", cleaned);
        }
        return Ok(exit_codes::SUCCESS);
    }

    let mut current = text.to_string();
    let mut outputs = Vec::with_capacity(CLEAN_PIPELINE.len());
    for step in CLEAN_PIPELINE {
        current = step.apply(&current);
        outputs.push(StepOutput {
            step: step.name(),
            output: current.clone(),
        });
    }

    if ctx.is_json() {
        print_json(&outputs)?;
    } else {
        for (index, output) in outputs.iter().enumerate() {
            println!("{}. {}: {}", index + 1, output.step, output.output);
        }
    }
    Ok(exit_codes::SUCCESS)
}

pub fn tokenize(ctx: &Context, text: &str) -> anyhow::Result<i32> {
    let tokens = tokenize_with(&clean_text(text), &ctx.normalizer_options());
    print_list(ctx, &tokens)
}

pub fn parse(ctx: &Context, text: &str) -> anyhow::Result<i32> {
    print_list(ctx, &parse_ingredients_with(text, &ctx.normalizer_options()))
}

pub fn extract(ctx: &Context, text: &str) -> anyhow::Result<i32> {
    let candidates: Vec<String> = extract_candidates_with(text, &ctx.normalizer_options())
        .into_iter()
        .collect();
    print_list(ctx, &candidates)
}

fn print_list(ctx: &Context, items: &[String]) -> anyhow::Result<i32> {
    if ctx.is_json() {
        print_json(&items)?;
    } else {
        for item in items {
            println!("{}", item);
        }
    }
    tracing::debug!(count = items.len(), "Listed tokens");
    Ok(exit_codes::SUCCESS)
}
