use brewline_core::{Coordinates, Store};
use brewline_state::AppStores;

use super::StoresCommands;

/// Dispatch a `stores` sub-command.
///
/// # Errors
///
/// Returns an error if a lookup fails with no fallback, or if a favorite
/// change is rejected by the server.
pub(crate) async fn run(app: &AppStores, command: StoresCommands) -> anyhow::Result<()> {
    match command {
        StoresCommands::Nearby {
            latitude,
            longitude,
            radius,
        } => {
            let origin = latitude.zip(longitude).map(|(lat, lng)| Coordinates::new(lat, lng));
            let stores = app.locations.get_nearby_stores(origin, radius).await?;
            super::note_source(&stores);
            print_stores(&stores.data);
        }
        StoresCommands::Search { keyword } => {
            let stores = app.locations.search_stores(&keyword, None).await?;
            super::note_source(&stores);
            print_stores(&stores.data);
        }
        StoresCommands::Favorite { id: None, .. } => {
            let stores = app.locations.get_favorite_stores().await?;
            print_stores(&stores);
        }
        StoresCommands::Favorite {
            id: Some(id),
            remove,
        } => {
            app.locations.toggle_favorite(id, !remove).await?;
            if remove {
                println!("store {id} removed from favorites");
            } else {
                println!("store {id} added to favorites");
            }
        }
        StoresCommands::Select { id } => {
            let store = app.locations.get_store_detail(id).await?;
            super::note_source(&store);
            app.locations.select_store(&store.data);
            println!("selected {} ({})", store.data.name, store.data.address);
        }
    }
    Ok(())
}

fn print_stores(stores: &[Store]) {
    if stores.is_empty() {
        println!("no stores found");
        return;
    }

    println!("{:<6}{:<24}{:>10}  {:<6}{:<4}ADDRESS", "ID", "NAME", "DISTANCE", "OPEN", "FAV");
    for store in stores {
        let distance = store
            .distance
            .map_or_else(String::new, |m| format!("{:.1} km", m / 1000.0));
        println!(
            "{:<6}{:<24}{:>10}  {:<6}{:<4}{}",
            store.id,
            super::clip(&store.name, 20),
            distance,
            if store.is_open { "yes" } else { "no" },
            if store.is_favorite { "*" } else { "" },
            store.address
        );
    }
}
