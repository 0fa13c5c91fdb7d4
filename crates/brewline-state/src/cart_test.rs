use super::*;
use crate::persistence::MemoryStorage;

fn item(product_id: i64, cents: i64, quantity: u32) -> NewCartItem {
    NewCartItem {
        product_id,
        product_no: format!("P{product_id:03}"),
        name: format!("Product {product_id}"),
        price: Decimal::new(cents, 2),
        quantity,
        image_url: String::new(),
        size: Some("medium".to_string()),
        temperature: Some("hot".to_string()),
        addons: None,
    }
}

fn store() -> (CartStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (CartStore::new(storage.clone()), storage)
}

#[test]
fn same_variant_merges_into_one_line() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 2));
    cart.add_to_cart(item(1, 350, 1));

    let state = cart.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity, 3);
    assert_eq!(state.items[0].total, Decimal::new(1050, 2));
}

#[test]
fn repeated_additions_sum_quantities() {
    let (cart, _) = store();
    let quantities = [1_u32, 4, 2, 7];
    for q in quantities {
        cart.add_to_cart(item(5, 325, q));
    }
    let state = cart.snapshot();
    let expected: u32 = quantities.iter().sum();
    assert_eq!(state.items[0].quantity, expected);
    assert_eq!(state.items[0].total, Decimal::new(325, 2) * Decimal::from(expected));
}

#[test]
fn different_variant_appends_new_line() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 1));
    let mut iced = item(1, 350, 1);
    iced.temperature = Some("iced".to_string());
    cart.add_to_cart(iced);

    let mut with_addons = item(1, 350, 1);
    with_addons.addons = Some(vec![2, 1]);
    cart.add_to_cart(with_addons);

    assert_eq!(cart.snapshot().items.len(), 3);
    assert_eq!(cart.cart_count(), 3);
}

#[test]
fn update_quantity_clamps_to_one() {
    let (cart, _) = store();
    cart.add_to_cart(item(2, 475, 3));
    for q in [0, -1, -40] {
        cart.update_quantity(0, q).unwrap();
        let state = cart.snapshot();
        assert_eq!(state.items[0].quantity, 1);
        assert_eq!(state.items[0].total, Decimal::new(475, 2));
    }
}

#[test]
fn out_of_range_index_is_rejected_without_change() {
    let (cart, storage) = store();
    cart.add_to_cart(item(2, 475, 1));
    let before = cart.snapshot();
    let persisted_before = storage.get(keys::CART).unwrap();

    let err = cart.update_quantity(3, 5).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 1 }));
    let err = cart.remove_from_cart(1).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 1, len: 1 }));

    assert_eq!(*cart.snapshot(), *before);
    assert_eq!(storage.get(keys::CART).unwrap(), persisted_before);
}

#[test]
fn remove_recomputes_derived_values() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 2));
    cart.add_to_cart(item(4, 250, 1));

    let removed = cart.remove_from_cart(0).unwrap();
    assert_eq!(removed.product_id, 1);
    assert_eq!(cart.cart_count(), 1);
    assert_eq!(cart.cart_total(), Decimal::new(250, 2));
    assert!(!cart.is_empty());

    cart.remove_from_cart(0).unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.cart_total(), Decimal::ZERO);
}

#[test]
fn persisted_cart_round_trips_into_fresh_store() {
    let (cart, storage) = store();
    cart.add_to_cart(item(1, 350, 2));
    let mut custom = item(7, 495, 1);
    custom.addons = Some(vec![3]);
    cart.add_to_cart(custom);
    cart.update_quantity(1, 4).unwrap();

    let reloaded = CartStore::new(storage);
    assert_eq!(reloaded.snapshot().items, cart.snapshot().items);
}

#[test]
fn malformed_persisted_cart_loads_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::CART, r#"[{"productId": "oops"}]"#).unwrap();
    let cart = CartStore::new(storage);
    assert!(cart.is_empty());
}

#[test]
fn clear_cart_persists_empty_list() {
    let (cart, storage) = store();
    cart.add_to_cart(item(1, 350, 1));
    cart.clear_cart();
    assert!(cart.is_empty());
    assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
}

#[test]
fn reload_picks_up_external_changes() {
    let (cart, storage) = store();
    cart.add_to_cart(item(1, 350, 1));
    storage.set(keys::CART, "[]").unwrap();
    cart.reload();
    assert!(cart.is_empty());
}

#[test]
fn order_lines_mirror_cart() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 2));
    cart.add_to_cart(item(4, 250, 1));

    let lines = cart.to_order_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].total, Some(Decimal::new(700, 2)));
}

#[test]
fn subscribers_see_each_mutation() {
    let (cart, _) = store();
    let mut rx = cart.subscribe();
    cart.add_to_cart(item(1, 350, 1));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().cart_count(), 1);
}

#[test]
fn remove_lines_keeps_units_added_after_the_read() {
    let (cart, storage) = store();
    cart.add_to_cart(item(1, 350, 2));
    cart.add_to_cart(item(4, 250, 1));
    let ordered = cart.snapshot().items.clone();

    cart.add_to_cart(item(1, 350, 1));
    cart.add_to_cart(item(7, 495, 1));
    cart.remove_lines(&ordered);

    let state = cart.snapshot();
    let left: Vec<(i64, u32)> = state.items.iter().map(|l| (l.product_id, l.quantity)).collect();
    assert_eq!(left, vec![(1, 1), (7, 1)]);
    assert_eq!(state.items[0].total, Decimal::new(350, 2));

    let persisted: Vec<CartItem> =
        serde_json::from_str(&storage.get(keys::CART).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, state.items);
}

#[test]
fn remove_lines_ignores_lines_already_gone() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 1));
    let ordered = cart.snapshot().items.clone();
    cart.clear_cart();

    cart.remove_lines(&ordered);
    assert!(cart.is_empty());
}

#[test]
fn update_quantity_on_missing_line_reports_length() {
    let (cart, _) = store();
    cart.add_to_cart(item(1, 350, 1));

    let err = cart.update_quantity(3, 2).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 1 }));
    let removed = cart.remove_from_cart(0).unwrap();
    assert_eq!(removed.product_id, 1);
}
