//! Back-office order commands.

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, NaiveDate, Utc};
use parfum_commerce::prelude::*;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

const ORDER_WIDTHS: [usize; 6] = [38, 24, 28, 12, 14, 17];

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrdersCommand::List {
            search,
            status,
            min_total,
            max_total,
            from,
            to,
            sort,
            page,
        } => {
            let mut view = OrdersView::new();
            view.set_search(search);
            view.set_status(status.as_deref().map(str::parse).transpose()?);
            view.set_min_total(min_total);
            view.set_max_total(max_total);
            view.set_sort(sort.parse()?);
            view.set_page(page);

            let filter = OrderFilter::new().created_between(
                from.as_deref().map(parse_day).transpose()?,
                to.as_deref().map(parse_day).transpose()?,
            );
            list(&filter, &view, ctx).await
        }
        OrdersCommand::Show { order } => show(&OrderId::new(order), ctx).await,
        OrdersCommand::Status { order, status } => {
            update_status(&OrderId::new(order), status.parse()?, ctx).await
        }
        OrdersCommand::Shipping { order, lei } => {
            if !lei.is_finite() {
                bail!("Shipping must be a number of lei");
            }
            update_shipping(&OrderId::new(order), Money::from_decimal(lei), ctx).await
        }
    }
}

/// Midnight UTC at the start of a `YYYY-MM-DD` day.
fn parse_day(value: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))?;
    Ok(day.and_hms_opt(0, 0, 0).map(|t| t.and_utc()).unwrap_or_default())
}

async fn list(filter: &OrderFilter, view: &OrdersView, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let admin = ctx.admin(&conn).await?;

    let spinner = ctx.output.spinner("Loading orders...");
    let page = admin.orders(filter, view).await;
    spinner.finish_and_clear();
    let page = page?;

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }
    if page.is_empty() {
        ctx.output.info("No orders match.");
        return Ok(());
    }

    ctx.output.table_row(
        &["ID", "CUSTOMER", "EMAIL", "STATUS", "TOTAL", "PLACED"],
        &ORDER_WIDTHS,
    );
    for order in &page.rows {
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &order.customer_name,
                &order.customer_email,
                &status_badge(order.status),
                &order.total().display(),
                &order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ],
            &ORDER_WIDTHS,
        );
    }

    let p = &page.pagination;
    ctx.output.info("");
    ctx.output.info(&format!(
        "Page {} of {} ({} orders, sorted by {})",
        p.page,
        p.total_pages,
        p.total,
        view.sort()
    ));
    Ok(())
}

async fn show(id: &OrderId, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let admin = ctx.admin(&conn).await?;
    let detail = admin.order_detail(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&detail);
        return Ok(());
    }

    let order = &detail.order;
    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output
        .kv("placed", &order.created_at.format("%Y-%m-%d %H:%M UTC").to_string());
    ctx.output.kv("customer", &order.customer_name);
    ctx.output.kv("email", &order.customer_email);
    ctx.output.kv("phone", &order.customer_phone);
    ctx.output.kv("address", &order.shipping_address.one_line());
    if let Some(notes) = &order.notes {
        ctx.output.kv("notes", notes);
    }

    ctx.output.header("Items");
    for item in &detail.items {
        ctx.output.list_item(&format!(
            "{} × {} = {}",
            item.quantity,
            item.display_name(),
            format_price(item.line_total_bani)
        ));
        if let Ok(snapshot) = item.parsed_snapshot() {
            for slot in snapshot.slots() {
                ctx.output.info(&format!(
                    "    {}. {} {} ({} ml)",
                    slot.slot_index, slot.brand, slot.product_name, slot.size_ml
                ));
            }
        }
    }

    ctx.output.info("");
    ctx.output.kv("subtotal", &order.subtotal().display());
    ctx.output.kv("shipping", &order.shipping().display());
    ctx.output.kv("total", &order.total().display());

    for warning in detail.integrity.warnings() {
        ctx.output.warn(&warning);
    }
    Ok(())
}

async fn update_status(id: &OrderId, status: OrderStatus, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let admin = ctx.admin(&conn).await?;

    if !ctx.confirm(&format!("Mark order {} as {}?", id, status.display_name()))? {
        ctx.output.warn("Aborted.");
        return Ok(());
    }
    let order = admin.update_status(id, status).await?;
    conn.persist().await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Order {} is now {}",
        order.id,
        status_badge(order.status)
    ));
    Ok(())
}

async fn update_shipping(id: &OrderId, shipping: Money, ctx: &Context) -> Result<()> {
    let conn = ctx.connect().await?;
    let admin = ctx.admin(&conn).await?;

    if !ctx.confirm(&format!(
        "Set shipping for order {} to {}?",
        id,
        shipping.display()
    ))? {
        ctx.output.warn("Aborted.");
        return Ok(());
    }
    let order = admin.update_shipping(id, shipping.amount_bani).await?;
    conn.persist().await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Order {}: shipping {}, total {}",
        order.id,
        order.shipping().display(),
        order.total().display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_day() {
        let day = parse_day("2026-03-08").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2026, 3, 8));
        assert_eq!(day.hour(), 0);

        assert!(parse_day("08.03.2026").is_err());
        assert!(parse_day("").is_err());
    }
}
