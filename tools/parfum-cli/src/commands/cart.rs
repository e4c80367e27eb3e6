//! Cart quote and checkout commands.
//!
//! A cart file is a JSON array of lines:
//!
//! ```json
//! [
//!   { "product_id": "p-aventus", "quantity": 2 },
//!   { "sku_id": "s-santal-2" },
//!   { "set_id": "set-duo" },
//!   { "set_id": "set-custom", "skus": ["s-aventus-2", "s-santal-2"] }
//! ]
//! ```

use anyhow::{bail, Context as _, Result};
use parfum_commerce::prelude::*;
use parfum_store::{Backend, Storefront};
use serde::{Deserialize, Serialize};

use super::{CartArgs, CartCommand, CheckoutArgs};
use crate::context::Context;

const QUOTE_WIDTHS: [usize; 4] = [40, 10, 5, 14];

/// One line of a cart file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CartLine {
    CustomSet {
        set_id: DiscoverySetId,
        skus: Vec<SkuId>,
        #[serde(default = "one")]
        quantity: i64,
    },
    Set {
        set_id: DiscoverySetId,
        #[serde(default = "one")]
        quantity: i64,
    },
    Sku {
        sku_id: SkuId,
        #[serde(default = "one")]
        quantity: i64,
    },
    Product {
        product_id: ProductId,
        #[serde(default = "one")]
        quantity: i64,
    },
}

fn one() -> i64 {
    1
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Quote { cart } => {
            let lines = read_lines(ctx, &cart).await?;
            let conn = ctx.connect().await?;
            let shop = ctx.storefront(&conn);
            let cart = build_cart(&shop, &lines, ctx).await?;
            let quote = shop.quote(&cart)?;

            if ctx.output.is_json() {
                ctx.output.json(&quote);
                return Ok(());
            }
            print_quote(&quote, shop.shipping_policy(), ctx);
            Ok(())
        }
    }
}

/// Place an order from a cart file and a customer form.
pub async fn checkout(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let lines = read_lines(ctx, &args.cart).await?;
    let form_path = ctx.resolve_path(&args.form);
    let form: CheckoutForm = serde_json::from_str(
        &tokio::fs::read_to_string(&form_path)
            .await
            .with_context(|| format!("Failed to read {}", form_path.display()))?,
    )
    .with_context(|| format!("Invalid checkout form {}", form_path.display()))?;

    let conn = ctx.connect().await?;
    let shop = ctx.storefront(&conn);
    let mut cart = build_cart(&shop, &lines, ctx).await?;
    let quote = shop.quote(&cart)?;

    if !ctx.output.is_json() {
        print_quote(&quote, shop.shipping_policy(), ctx);
        ctx.output.info("");
    }
    if !ctx.confirm(&format!(
        "Place order for {} ({})?",
        form.customer_name.trim(),
        quote.total.display()
    ))? {
        ctx.output.warn("Aborted.");
        return Ok(());
    }

    let spinner = ctx.output.spinner("Placing order...");
    let placed = shop.place_order(&mut cart, form).await;
    spinner.finish_and_clear();
    let placed = match placed {
        Ok(placed) => placed,
        Err(e) => {
            for field in e.field_errors() {
                ctx.output.warn(&format!("{}: {}", field.field, field.message));
            }
            return Err(e).context("Checkout failed");
        }
    };
    conn.persist().await?;

    if ctx.output.is_json() {
        ctx.output.json(&placed);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Order {} placed: {} items, total {}",
        placed.order.id,
        placed.items.len(),
        placed.order.total().display()
    ));
    Ok(())
}

async fn read_lines(ctx: &Context, file: &str) -> Result<Vec<CartLine>> {
    let path = ctx.resolve_path(file);
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let lines: Vec<CartLine> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid cart file {}", path.display()))?;
    if lines.is_empty() {
        bail!("{} has no cart lines", path.display());
    }
    Ok(lines)
}

/// Add every line through the storefront, the same path the shop pages use.
async fn build_cart(
    shop: &Storefront<dyn Backend>,
    lines: &[CartLine],
    ctx: &Context,
) -> Result<Cart> {
    let mut cart = Cart::new();
    for line in lines {
        match line {
            CartLine::Product {
                product_id,
                quantity,
            } => {
                if shop
                    .add_product_to_cart(&mut cart, product_id, *quantity)
                    .await?
                    .is_none()
                {
                    ctx.output
                        .warn(&format!("{} has no sizes yet, skipped", product_id));
                }
            }
            CartLine::Sku { sku_id, quantity } => {
                shop.add_sku_to_cart(&mut cart, sku_id, *quantity).await?;
            }
            CartLine::Set { set_id, quantity } => {
                shop.add_predefined_bundle(&mut cart, set_id, *quantity)
                    .await?;
            }
            CartLine::CustomSet {
                set_id,
                skus,
                quantity,
            } => {
                shop.add_custom_bundle(&mut cart, set_id, skus, *quantity)
                    .await?;
            }
        }
    }
    ctx.output
        .debug(&format!("{} entries, {} items", cart.entries.len(), cart.item_count()));
    Ok(cart)
}

fn print_quote(quote: &CartQuote, policy: &ShippingPolicy, ctx: &Context) {
    ctx.output.header("Cart");
    ctx.output
        .table_row(&["ITEM", "SIZE", "QTY", "TOTAL"], &QUOTE_WIDTHS);
    for line in &quote.lines {
        ctx.output.table_row(
            &[
                &line.name,
                &line.size_label,
                &line.quantity.to_string(),
                &line.line_total.display(),
            ],
            &QUOTE_WIDTHS,
        );
    }
    ctx.output.info("");
    ctx.output.kv("subtotal", &quote.subtotal.display());
    let shipping = if quote.has_free_shipping() {
        "free".to_string()
    } else {
        quote.shipping.display()
    };
    ctx.output.kv("shipping", &shipping);
    ctx.output.kv("total", &quote.total.display());
    if let Some(remaining) = policy.remaining_for_free(quote.subtotal) {
        if !quote.lines.is_empty() {
            ctx.output.info(&format!(
                "Add {} more for free shipping.",
                remaining.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_shapes() {
        let lines: Vec<CartLine> = serde_json::from_str(
            r#"[
                {"product_id": "p-aventus", "quantity": 2},
                {"sku_id": "s-santal-2"},
                {"set_id": "set-duo"},
                {"set_id": "set-custom", "skus": ["s-aventus-2", "s-santal-2"], "quantity": 3}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            lines,
            vec![
                CartLine::Product {
                    product_id: ProductId::new("p-aventus"),
                    quantity: 2
                },
                CartLine::Sku {
                    sku_id: SkuId::new("s-santal-2"),
                    quantity: 1
                },
                CartLine::Set {
                    set_id: DiscoverySetId::new("set-duo"),
                    quantity: 1
                },
                CartLine::CustomSet {
                    set_id: DiscoverySetId::new("set-custom"),
                    skus: vec![SkuId::new("s-aventus-2"), SkuId::new("s-santal-2")],
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn test_cart_line_rejects_unknown_shape() {
        let result: Result<Vec<CartLine>, _> = serde_json::from_str(r#"[{"brand": "Creed"}]"#);
        assert!(result.is_err());
    }
}
