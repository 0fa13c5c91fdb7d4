use brewline_client::RecommendQuery;
use brewline_state::AppStores;
use chrono::Utc;

/// Print personalized picks, running promotions and bundles.
///
/// # Errors
///
/// Returns an error only when the server is unreachable and offline
/// fallback is disabled.
pub(crate) async fn run(app: &AppStores, limit: u32) -> anyhow::Result<()> {
    let query = RecommendQuery {
        customer_id: app.auth.snapshot().user.as_ref().map(|u| u.id),
        limit: Some(limit),
        store_id: app.locations.snapshot().selected_store().map(|s| s.id),
    };

    let picks = app.recommendations.get_personalized_recommendations(&query).await?;
    super::note_source(&picks);
    println!("RECOMMENDED");
    for rec in &picks.data {
        println!(
            "  {:<24}{:>8}  {}",
            super::clip(&rec.product.name, 20),
            rec.product.price,
            rec.reason
        );
    }

    app.recommendations.get_promotion_recommendations(&query).await?;
    let state = app.recommendations.snapshot();
    println!("PROMOTIONS");
    for promo in state.active_promotions(Utc::now()) {
        println!(
            "  {:<24}until {}  {}",
            super::clip(&promo.title, 20),
            promo.end_time.format("%Y-%m-%d"),
            promo.description
        );
    }

    let bundles = app.recommendations.get_product_combinations(&query).await?;
    println!("BUNDLES");
    for bundle in &bundles.data {
        println!(
            "  {:<24}{:>8}  save {}",
            super::clip(&bundle.name, 20),
            bundle.discount_price,
            bundle.saving
        );
    }
    Ok(())
}
