use brewline_core::NewCartItem;
use brewline_state::AppStores;

use super::CartCommands;

/// Dispatch a `cart` sub-command.
///
/// # Errors
///
/// Returns an error if the product cannot be found or a cart index is out
/// of range.
pub(crate) async fn run(app: &AppStores, command: CartCommands) -> anyhow::Result<()> {
    match command {
        CartCommands::Add {
            product_id,
            quantity,
            size,
            temperature,
            addons,
        } => {
            let product = app.catalog.fetch_product_by_id(product_id).await?.data;
            app.cart.add_to_cart(NewCartItem {
                product_id: product.id,
                product_no: product.product_no,
                name: product.name.clone(),
                price: product.price,
                quantity,
                image_url: product.image_url,
                size,
                temperature,
                addons,
            });
            println!("added {quantity} x {} to the cart", product.name);
            print_cart(app);
        }
        CartCommands::List => print_cart(app),
        CartCommands::Update { index, quantity } => {
            app.cart.update_quantity(index, quantity)?;
            print_cart(app);
        }
        CartCommands::Remove { index } => {
            let removed = app.cart.remove_from_cart(index)?;
            println!("removed {}", removed.name);
            print_cart(app);
        }
        CartCommands::Clear => {
            app.cart.clear_cart();
            println!("cart cleared");
        }
    }
    Ok(())
}

fn print_cart(app: &AppStores) {
    let cart = app.cart.snapshot();
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    println!("{:<4}{:<24}{:<18}{:>5}{:>10}", "#", "ITEM", "OPTIONS", "QTY", "TOTAL");
    for (index, item) in cart.items.iter().enumerate() {
        let options = [item.size.as_deref(), item.temperature.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/");
        println!(
            "{:<4}{:<24}{:<18}{:>5}{:>10}",
            index,
            super::clip(&item.name, 20),
            options,
            item.quantity,
            item.total
        );
    }
    println!("{} items, total {}", cart.cart_count(), cart.cart_total());
}
