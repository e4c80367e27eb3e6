//! Catalog browsing commands.

use anyhow::Result;
use parfum_commerce::prelude::*;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;

const LIST_WIDTHS: [usize; 5] = [38, 28, 14, 18, 6];

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::List {
            brand,
            family,
            in_stock,
            sort,
            page,
        } => {
            let mut query = CatalogQuery::new()
                .with_sort(sort.parse()?)
                .with_pagination(page, ctx.config.shop.catalog_page_size);
            if let Some(brand) = brand {
                query = query.with_filter(CatalogFilter::Brand(brand));
            }
            if let Some(family) = family {
                query = query.with_filter(CatalogFilter::Family(family));
            }
            if in_stock {
                query = query.with_filter(CatalogFilter::InStock);
            }
            list(&query, ctx).await
        }
        CatalogCommand::Search { query, page } => search(&query, page, ctx).await,
        CatalogCommand::Show { product } => show(&ProductId::new(product), ctx).await,
        CatalogCommand::Sets => sets(ctx).await,
        CatalogCommand::Set { set } => set_detail(&DiscoverySetId::new(set), ctx).await,
    }
}

async fn list(query: &CatalogQuery, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);

    let spinner = ctx.output.spinner("Loading catalog...");
    let results = shop.catalog(query).await;
    spinner.finish_and_clear();
    print_results(&results?, ctx);
    Ok(())
}

async fn search(text: &str, page: i64, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);

    let spinner = ctx.output.spinner(&format!("Searching for '{}'...", text));
    let results = shop.search(text, page).await;
    spinner.finish_and_clear();
    let results = results?;
    // Search events are rows too.
    conn.persist().await?;

    ctx.output.header(&format!("Results for '{}'", text));
    print_results(&results, ctx);
    Ok(())
}

fn print_results(results: &SearchResults<ProductListing>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(results);
        return;
    }
    if results.is_empty() {
        ctx.output.info("No products found.");
        return;
    }

    ctx.output
        .table_row(&["NAME", "BRAND", "FROM", "SIZES", "STOCK"], &LIST_WIDTHS);
    for listing in &results.items {
        let price = listing
            .price_bani()
            .map(format_price)
            .unwrap_or_else(|| "-".to_string());
        let sizes = listing
            .skus
            .iter()
            .map(|s| s.size_ml.to_string())
            .collect::<Vec<_>>()
            .join("/");
        let sizes = if sizes.is_empty() { "-".to_string() } else { format!("{} ml", sizes) };
        let stock = if listing.in_stock() { "yes" } else { "no" };
        ctx.output.table_row(
            &[&listing.product.name, &listing.product.brand, &price, &sizes, stock],
            &LIST_WIDTHS,
        );
    }

    let p = &results.pagination;
    ctx.output.info("");
    ctx.output.info(&format!(
        "Page {} of {} ({}-{} of {} products)",
        p.page,
        p.total_pages,
        p.start_item(),
        p.end_item(),
        p.total
    ));
}

async fn show(id: &ProductId, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let listing = shop.product_detail(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    let product = &listing.product;
    ctx.output.header(&product.title());
    ctx.output.kv("id", product.id.as_str());
    if let Some(concentration) = &product.concentration {
        ctx.output.kv("concentration", concentration);
    }
    if let Some(family) = &product.family {
        ctx.output.kv("family", family);
    }
    if let Some(year) = product.launch_year {
        ctx.output.kv("launched", &year.to_string());
    }
    if let Some(rating) = product.rating {
        ctx.output
            .kv("rating", &format!("{:.1} ({} reviews)", rating, product.review_count));
    }
    for (label, notes) in [
        ("top notes", &product.top_notes),
        ("heart notes", &product.mid_notes),
        ("base notes", &product.base_notes),
    ] {
        if !notes.is_empty() {
            ctx.output.kv(label, &notes.join(", "));
        }
    }
    if let Some(description) = &product.description {
        ctx.output.info("");
        ctx.output.info(description);
    }

    ctx.output.header("Sizes");
    if listing.skus.is_empty() {
        ctx.output.info("Not available yet.");
    }
    let default_id = listing.default_sku.as_ref().map(|s| &s.id);
    for sku in &listing.skus {
        let marker = if Some(&sku.id) == default_id { " (default)" } else { "" };
        let stock = if sku.in_stock() {
            format!("{} in stock", sku.stock)
        } else {
            "out of stock".to_string()
        };
        ctx.output.list_item(&format!(
            "{} - {} - {} [{}]{}",
            sku.display_size(),
            format_price(sku.price_bani),
            stock,
            sku.id,
            marker
        ));
    }
    Ok(())
}

async fn sets(ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let sets = shop.discovery_sets().await?;

    if ctx.output.is_json() {
        ctx.output.json(&sets);
        return Ok(());
    }
    ctx.output.header("Discovery sets");
    if sets.is_empty() {
        ctx.output.info("No active discovery sets.");
        return Ok(());
    }
    for set in &sets {
        let kind = if set.is_customizable { "build your own" } else { "curated" };
        ctx.output.list_item(&format!(
            "{} - {} - {} - {} [{}]",
            set.name,
            set.size_label(),
            format_price(set.base_price_bani),
            kind,
            set.id
        ));
    }
    Ok(())
}

async fn set_detail(id: &DiscoverySetId, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let detail = shop.discovery_set_detail(id).await?;
    let suggestions = if detail.config.is_customizable {
        shop.recommendations(Some(id)).await?
    } else {
        Vec::new()
    };

    if ctx.output.is_json() {
        let slots: Vec<_> = detail
            .slots
            .iter()
            .map(|s| {
                serde_json::json!({
                    "slot_index": s.slot_index,
                    "sku_id": s.sku.id,
                    "product_id": s.product.id,
                    "name": s.product.title(),
                })
            })
            .collect();
        ctx.output.json(&serde_json::json!({
            "config": detail.config,
            "slots": slots,
            "missing": detail.missing,
            "recommendations": suggestions.iter().map(|l| &l.product.id).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    let config = &detail.config;
    ctx.output.header(&config.name);
    ctx.output.kv("size", &config.size_label());
    ctx.output.kv("price", &format_price(config.base_price_bani));
    if !config.is_active {
        ctx.output.warn("This set is not available for purchase.");
    }
    if let Some(description) = &config.description {
        ctx.output.info(description);
    }

    if config.is_customizable {
        ctx.output.info(&format!(
            "Pick {} samples of {} ml.",
            config.total_slots, config.slot_volume_ml
        ));
        if !suggestions.is_empty() {
            ctx.output.header("Suggestions");
            for listing in &suggestions {
                ctx.output
                    .list_item(&format!("{} [{}]", listing.product.title(), listing.product.id));
            }
        }
        return Ok(());
    }

    ctx.output.header("Contents");
    for slot in &detail.slots {
        ctx.output.list_item(&format!(
            "{}. {} ({})",
            slot.slot_index,
            slot.product.title(),
            slot.sku.display_size()
        ));
    }
    for sku_id in &detail.missing {
        ctx.output.warn(&format!("SKU {} is no longer in the catalog", sku_id));
    }
    Ok(())
}
