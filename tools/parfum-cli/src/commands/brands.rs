//! Brand index commands.

use anyhow::{bail, Result};
use parfum_commerce::prelude::*;
use parfum_commerce::search::{ALPHABET_LETTERS, OTHER_BUCKET};

use super::{BrandsArgs, BrandsCommand};
use crate::context::Context;

/// Run the brands command.
pub async fn run(args: BrandsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BrandsCommand::Index { query, letter } => index(&query, letter, ctx).await,
        BrandsCommand::Search { query } => search(&query, ctx).await,
    }
}

async fn index(query: &str, letter: Option<char>, ctx: &Context) -> Result<()> {
    let letter = letter.map(|c| c.to_ascii_uppercase());
    if let Some(c) = letter {
        if !ALPHABET_LETTERS.contains(&c) {
            bail!("Unknown letter '{}'. Use A-Z or {}.", c, OTHER_BUCKET);
        }
    }

    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let index = shop.brand_index(query).await?;

    if ctx.output.is_json() {
        match letter {
            Some(c) => ctx.output.json(&index.bucket(c)),
            None => ctx.output.json(&index),
        }
        return Ok(());
    }

    if index.is_empty() {
        ctx.output.info("No brands found.");
        return Ok(());
    }

    for bucket in index.buckets() {
        if bucket.items.is_empty() || letter.is_some_and(|c| c != bucket.letter) {
            continue;
        }
        ctx.output.header(&bucket.letter.to_string());
        for brand in &bucket.items {
            ctx.output.list_item(brand);
        }
    }

    let letters: String = index.non_empty_letters().into_iter().collect();
    ctx.output.info("");
    ctx.output
        .info(&format!("{} brands under {}", index.len(), letters));
    Ok(())
}

async fn search(query: &str, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let brands: Vec<String> = shop
        .brands()
        .await?
        .into_iter()
        .filter(|b| matches_search(b, query))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&brands);
        return Ok(());
    }
    if brands.is_empty() {
        ctx.output.info(&format!("No brands match '{}'.", query));
        return Ok(());
    }
    for brand in &brands {
        ctx.output.list_item(brand);
    }
    Ok(())
}
