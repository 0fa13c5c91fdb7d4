//! Built-in static catalogue served when the API cannot be reached.
//!
//! Only read-style catalogue data lives here. Account data (orders, profile,
//! favorites) has no fallback.

use brewline_core::{
    Category, ComboProduct, Product, ProductCombination, ProductStatus, Promotion,
    Recommendation, RecommendedProduct, Store,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

const CATALOGUE_TIMESTAMP: &str = "2023-01-01T00:00:00Z";

fn product(
    id: i64,
    name: &str,
    cents: i64,
    description: &str,
    image: &str,
    category_id: i64,
) -> Product {
    Product {
        id,
        product_no: format!("P{id:03}"),
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        description: description.to_string(),
        image_url: format!("https://images.unsplash.com/{image}?auto=format&fit=crop&w=500&q=60"),
        category_id,
        status: ProductStatus::Active,
        created_at: Some(CATALOGUE_TIMESTAMP.to_string()),
        updated_at: Some(CATALOGUE_TIMESTAMP.to_string()),
    }
}

#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(1, "Americano", 350, "Classic black coffee made with espresso and hot water", "photo-1509042239860-f550ce710b93", 1),
        product(2, "Latte", 475, "Espresso with steamed milk and a small layer of foam", "photo-1541167760496-1628856ab772", 1),
        product(3, "Cappuccino", 450, "Equal parts espresso, steamed milk, and foam", "photo-1559056199-5f2371125432", 1),
        product(4, "Croissant", 250, "Buttery, flaky pastry", "photo-1555244162-803834f7003b", 2),
        product(5, "Blueberry Muffin", 325, "Fresh blueberry muffin with a crumb topping", "photo-1590845908939-57f40a875779", 2),
        product(6, "Vanilla Latte", 475, "Latte with vanilla syrup", "photo-1537725525291-634ef8e08313", 1),
        product(7, "Caramel Macchiato", 495, "Espresso with steamed milk, caramel syrup, and foam", "photo-1579145893815-1a104d82c26d", 1),
        product(8, "Chocolate Croissant", 300, "Croissant filled with chocolate", "photo-1586495777744-4413f21062fa", 2),
    ]
}

#[must_use]
pub fn products_in_category(category_id: i64) -> Vec<Product> {
    products()
        .into_iter()
        .filter(|p| p.category_id == category_id)
        .collect()
}

#[must_use]
pub fn product_by_id(id: i64) -> Option<Product> {
    products().into_iter().find(|p| p.id == id)
}

#[must_use]
pub fn categories() -> Vec<Category> {
    [
        (1, "Coffee", "Hot and cold coffee drinks"),
        (2, "Pastries", "Fresh baked goods"),
        (3, "Tea", "Various types of tea"),
        (4, "Smoothies", "Fruit and vegetable smoothies"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id,
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Flagship locations around the default coordinates.
#[must_use]
pub fn stores() -> Vec<Store> {
    let store = |id: i64, name: &str, address: &str, latitude: f64, longitude: f64, rating: f64| Store {
        id,
        name: name.to_string(),
        address: address.to_string(),
        phone: format!("010-8888-00{id:02}"),
        latitude,
        longitude,
        distance: None,
        rating,
        review_count: 0,
        opening_hours: "07:00-22:00".to_string(),
        is_favorite: false,
        is_open: true,
        features: vec!["wifi".to_string(), "takeaway".to_string()],
        image: String::new(),
    };
    vec![
        store(1, "Brewline Wangfujing", "138 Wangfujing Street, Dongcheng", 39.9139, 116.4103, 4.8),
        store(2, "Brewline Sanlitun", "19 Sanlitun Road, Chaoyang", 39.9368, 116.4551, 4.7),
        store(3, "Brewline Zhongguancun", "27 Zhongguancun Street, Haidian", 39.9834, 116.3160, 4.6),
    ]
}

#[must_use]
pub fn store_by_id(id: i64) -> Option<Store> {
    stores().into_iter().find(|s| s.id == id)
}

fn recommended(product: &Product, category_name: &str, rating: f64, review_count: u32) -> RecommendedProduct {
    RecommendedProduct {
        id: product.id,
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        image: product.image_url.clone(),
        category_id: product.category_id,
        category_name: category_name.to_string(),
        rating,
        review_count,
        is_hot: true,
        is_new: false,
        ingredients: Vec::new(),
    }
}

#[must_use]
pub fn recommendations() -> Vec<Recommendation> {
    let catalogue = products();
    let picks: [(usize, &str, f64, u32, &str, f64, &[&str]); 3] = [
        (0, "Coffee", 4.8, 1250, "Based on your past orders", 0.95, &["popular", "classic"]),
        (1, "Coffee", 4.9, 2100, "Most ordered this week", 0.92, &["popular", "bestseller"]),
        (5, "Coffee", 4.7, 860, "Customers who like lattes also order this", 0.88, &["sweet"]),
    ];
    picks
        .into_iter()
        .filter_map(|(index, category, rating, reviews, reason, score, tags)| {
            catalogue.get(index).map(|p| Recommendation {
                product: recommended(p, category, rating, reviews),
                reason: reason.to_string(),
                score,
                tags: tags.iter().map(ToString::to_string).collect(),
            })
        })
        .collect()
}

/// Promotions are relative to `now`, so the fallback always shows
/// currently running offers.
#[must_use]
pub fn promotions(now: DateTime<Utc>) -> Vec<Promotion> {
    vec![
        Promotion {
            id: 1,
            title: "New member offer".to_string(),
            description: "10 off your first order".to_string(),
            discount: Decimal::from(10),
            start_time: now,
            end_time: now + Duration::days(7),
            image: String::new(),
        },
        Promotion {
            id: 2,
            title: "Wednesday coffee day".to_string(),
            description: "15% off all coffee".to_string(),
            discount: Decimal::new(85, 2),
            start_time: now,
            end_time: now + Duration::days(1),
            image: String::new(),
        },
    ]
}

#[must_use]
pub fn combinations() -> Vec<ProductCombination> {
    let combo = |id: i64, name: &str, items: &[(i64, &str, i64)], discount_cents: i64| {
        let products: Vec<ComboProduct> = items
            .iter()
            .map(|&(id, name, cents)| ComboProduct {
                id,
                name: name.to_string(),
                price: Decimal::new(cents, 2),
            })
            .collect();
        let total_price: Decimal = products.iter().map(|p| p.price).sum();
        let discount_price = Decimal::new(discount_cents, 2);
        ProductCombination {
            id,
            name: name.to_string(),
            products,
            total_price,
            discount_price,
            saving: total_price - discount_price,
            image: String::new(),
        }
    };
    vec![
        combo(1, "Breakfast set", &[(1, "Americano", 350), (4, "Croissant", 250)], 500),
        combo(2, "Afternoon set", &[(6, "Vanilla Latte", 475), (5, "Blueberry Muffin", 325)], 700),
    ]
}
