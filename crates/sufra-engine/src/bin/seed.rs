//! # Seed Data Generator
//!
//! Populates the database with demo restaurants, dishes and promo codes for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p sufra-engine --bin seed
//!
//! # Specify database path
//! cargo run -p sufra-engine --bin seed -- --db ./data/sufra.db
//! ```
//!
//! Amounts below are minor units (qirsh): 1200 = 12.00 JOD.

use std::env;

use chrono::{Duration, Utc};

use sufra_core::{Discount, Dish, Money, Promo, Restaurant};
use sufra_engine::{CatalogStore, Database, DbConfig};

/// (restaurant, base delivery fee in qirsh, open, dishes as (name, price, available))
const RESTAURANTS: &[(&str, i64, bool, &[(&str, i64, bool)])] = &[
    (
        "Beit Sitti",
        250,
        true,
        &[
            ("Mansaf", 1200, true),
            ("Maqluba", 950, true),
            ("Musakhan", 850, true),
            ("Kunafa", 450, true),
            ("Seasonal Soup", 350, false),
        ],
    ),
    (
        "Falafel Al-Quds",
        150,
        true,
        &[
            ("Falafel Sandwich", 180, true),
            ("Hummus Plate", 320, true),
            ("Fattet Hummus", 420, true),
            ("Mint Lemonade", 200, true),
        ],
    ),
    (
        "Shawarma Reem",
        300,
        false,
        &[
            ("Shawarma Wrap", 250, true),
            ("Shawarma Plate", 550, true),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./sufra_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sufra Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./sufra_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Sufra Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let catalog = db.catalog();

    // Check existing data
    if catalog.restaurant(1).await?.is_some() {
        println!("⚠ Database already seeded");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut restaurant_id = 0;
    let mut dish_id = 0;
    for (name, base_fee, is_open, dishes) in RESTAURANTS {
        restaurant_id += 1;

        catalog
            .insert_restaurant(&Restaurant {
                id: restaurant_id,
                name: name.to_string(),
                is_open: *is_open,
                base_delivery_fee: Money::from_minor(*base_fee),
            })
            .await?;

        for (dish_name, price, is_available) in *dishes {
            dish_id += 1;

            catalog
                .insert_dish(&Dish {
                    id: dish_id,
                    restaurant_id,
                    name: dish_name.to_string(),
                    price: Money::from_minor(*price),
                    is_available: *is_available,
                })
                .await?;
        }

        println!("  {} ({} dishes)", name, dishes.len());
    }

    println!();
    println!("Seeding promos...");

    let promos = db.promos();
    let now = Utc::now();

    for promo in demo_promos(now) {
        promos.insert_promo(&promo).await?;
        println!("  {}", promo.code);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Demo promo codes covering each discount shape and eligibility rule.
fn demo_promos(now: chrono::DateTime<Utc>) -> Vec<Promo> {
    vec![
        // 10% off + free delivery above 40.00, the headline campaign
        Promo {
            code: "SAVE10".to_string(),
            discount: Discount::Percentage { bps: 1000 },
            free_delivery: true,
            minimum_order: Money::from_minor(4000),
            is_active: true,
            expires_at: Some(now + Duration::days(30)),
            usage_limit: None,
            times_used: 0,
            restaurant_scope: None,
        },
        // Flat 5.00 off, limited to the first 100 redemptions
        Promo {
            code: "WELCOME5".to_string(),
            discount: Discount::Fixed {
                amount: Money::from_minor(500),
            },
            free_delivery: false,
            minimum_order: Money::zero(),
            is_active: true,
            expires_at: None,
            usage_limit: Some(100),
            times_used: 0,
            restaurant_scope: None,
        },
        // Free delivery only, scoped to restaurant 1
        Promo {
            code: "SITTIFREE".to_string(),
            discount: Discount::None,
            free_delivery: true,
            minimum_order: Money::from_minor(1000),
            is_active: true,
            expires_at: None,
            usage_limit: None,
            times_used: 0,
            restaurant_scope: Some(1),
        },
        // Already expired, for exercising the skip path
        Promo {
            code: "RAMADAN24".to_string(),
            discount: Discount::Percentage { bps: 1500 },
            free_delivery: false,
            minimum_order: Money::zero(),
            is_active: true,
            expires_at: Some(now - Duration::days(400)),
            usage_limit: None,
            times_used: 0,
            restaurant_scope: None,
        },
    ]
}
