use brewline_state::AppStores;

/// List products, optionally limited to one category.
///
/// # Errors
///
/// Returns an error only when the server is unreachable and offline
/// fallback is disabled.
pub(crate) async fn run_products(app: &AppStores, category: Option<i64>) -> anyhow::Result<()> {
    let products = match category {
        Some(id) => app.catalog.fetch_products_by_category(id).await?,
        None => app.catalog.fetch_products().await?,
    };
    super::note_source(&products);

    let active: Vec<_> = products.data.iter().filter(|p| p.is_active()).collect();
    if active.is_empty() {
        println!("no products available");
        return Ok(());
    }

    println!("{:<6}{:<8}{:<28}{:>8}", "ID", "CODE", "NAME", "PRICE");
    for product in active {
        println!(
            "{:<6}{:<8}{:<28}{:>8}",
            product.id,
            product.product_no,
            super::clip(&product.name, 24),
            product.price
        );
    }
    Ok(())
}

/// List product categories.
///
/// # Errors
///
/// See [`run_products`].
pub(crate) async fn run_categories(app: &AppStores) -> anyhow::Result<()> {
    let categories = app.catalog.fetch_categories().await?;
    super::note_source(&categories);

    println!("{:<6}{:<16}DESCRIPTION", "ID", "NAME");
    for category in &categories.data {
        println!("{:<6}{:<16}{}", category.id, category.name, category.description);
    }
    Ok(())
}
