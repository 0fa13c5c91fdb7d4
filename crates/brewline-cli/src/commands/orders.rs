use brewline_client::OrderQuery;
use brewline_core::{Order, OrderStatus};
use brewline_state::AppStores;
use chrono::{Duration, Local};

use super::OrdersCommands;

/// Dispatch an `orders` sub-command.
///
/// # Errors
///
/// Returns an error if the request fails, if nobody is signed in, or if
/// checkout has no shop or an empty cart.
pub(crate) async fn run(app: &AppStores, command: OrdersCommands) -> anyhow::Result<()> {
    match command {
        OrdersCommands::List { status, size } => {
            let query = OrderQuery {
                size: Some(size),
                order_status: status.map(|s| OrderStatus::from(s).code()),
                ..OrderQuery::default()
            };
            let orders = app.orders.fetch_orders(&query).await?;
            print_orders(&orders);
        }
        OrdersCommands::Checkout {
            store,
            payment_method,
            pickup,
            remarks,
        } => {
            let store_id = store
                .or_else(|| app.locations.snapshot().selected_store().map(|s| s.id))
                .ok_or_else(|| {
                    anyhow::anyhow!("no shop chosen; pass --store or run `stores select` first")
                })?;
            let pickup = pickup.unwrap_or_else(default_pickup_time);
            let order = app
                .checkout(store_id, payment_method, &pickup, remarks.as_deref())
                .await?;
            println!(
                "placed order {} for {} (pickup {pickup})",
                order.order_no, order.total_amount
            );
        }
        OrdersCommands::Cancel { id } => {
            let order = app.orders.cancel_order(id).await?;
            println!("order {} is now {}", order.order_no, order.order_status);
        }
    }
    Ok(())
}

/// Fifteen minutes from now, in the local-time form the order API expects.
fn default_pickup_time() -> String {
    (Local::now() + Duration::minutes(15))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("no orders found");
        return;
    }

    println!("{:<6}{:<22}{:<12}{:>10}  PICKUP", "ID", "ORDER NO", "STATUS", "TOTAL");
    for order in orders {
        println!(
            "{:<6}{:<22}{:<12}{:>10}  {}",
            order.id,
            order.order_no,
            order.order_status.as_str(),
            order.total_amount,
            order.pickup_time.as_deref().unwrap_or("-")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pickup_time_is_local_iso_without_zone() {
        let pickup = default_pickup_time();
        assert_eq!(pickup.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&pickup, "%Y-%m-%dT%H:%M:%S").is_ok());
    }
}
