//! # Seed Data Generator
//!
//! Populates the database with master data for development.
//!
//! ## Usage
//! ```bash
//! # 200 products (default), plus the fixed warehouses and sellers
//! cargo run -p maestro-db --bin seed
//!
//! # Custom amount
//! cargo run -p maestro-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p maestro-db --bin seed -- --db ./data/maestro.db
//! ```
//!
//! ## Generated Data
//! - Warehouses: one per city below, every third one flagged e-commerce
//! - Products: `{CATEGORY}-{NNNN}` codes, gross price = net + 19% IVA,
//!   one in seven inactive
//! - Sellers: two per branch

use std::env;

use maestro_core::{Money, ProductFields, SellerFields, WarehouseFields};
use maestro_db::{Database, DbConfig, ProductRepository, SellerRepository, WarehouseRepository};

/// Cities used for warehouse and branch names.
const CITIES: &[(&str, &str)] = &[
    ("STGO", "Santiago"),
    ("VALP", "Valparaíso"),
    ("CONC", "Concepción"),
    ("ANTO", "Antofagasta"),
    ("TEMU", "Temuco"),
    ("PMON", "Puerto Montt"),
];

/// Product categories for realistic test data.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEB",
        &["Bebida Cola", "Agua Mineral", "Jugo Naranja", "Té Helado", "Energética"],
    ),
    (
        "ABA",
        &["Arroz Grado 1", "Fideos Spaghetti", "Aceite Maravilla", "Azúcar", "Harina"],
    ),
    (
        "LAC",
        &["Leche Entera", "Yogur Frutilla", "Queso Gauda", "Mantequilla", "Crema"],
    ),
    (
        "FER",
        &["Tornillo Zincado", "Martillo", "Huincha de Medir", "Cinta Aisladora", "Alicate"],
    ),
];

/// Size variants appended to product names, with the price step they add.
const SIZES: &[(&str, i64)] = &[("Chico", 0), ("Mediano", 400), ("Grande", 900), ("Pack", 2500)];

const FIRST_NAMES: &[&str] = &["Juan", "María", "Pedro", "Camila", "Diego", "Valentina"];
const LAST_NAMES: &[&str] = &["Pérez", "González", "Muñoz", "Rojas", "Díaz", "Soto"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./maestro_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Maestro Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./maestro_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Maestro Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await? + db.warehouses().count().await?;
    if existing > 0 {
        println!("⚠ Database already has data ({} rows)", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Warehouses
    let warehouses = db.warehouses();
    for (idx, (code, city)) in CITIES.iter().enumerate() {
        let fields = WarehouseFields {
            code: format!("B-{}", code),
            description: format!("Bodega {}", city),
            address: Some(format!("Av. Principal {}, {}", 100 + idx * 37, city)),
            ecommerce: idx % 3 == 0,
        };
        warehouses.create(&fields).await?;
    }
    println!("✓ {} warehouses", CITIES.len());

    // Sellers
    let sellers = db.sellers();
    let mut seller_count = 0;
    for (idx, (_, city)) in CITIES.iter().enumerate() {
        for slot in 0..2 {
            let n = idx * 2 + slot;
            let first = FIRST_NAMES[n % FIRST_NAMES.len()];
            let last = LAST_NAMES[(n / FIRST_NAMES.len() + n) % LAST_NAMES.len()];
            let fields = SellerFields {
                description: format!("{} {}", first, last),
                username: format!("{}{}{}", &first[..1], last, n).to_lowercase(),
                branch: format!("Sucursal {}", city),
            };
            sellers.create(&fields).await?;
            seller_count += 1;
        }
    }
    println!("✓ {} sellers", seller_count);

    // Products
    println!();
    println!("Generating products...");
    let products = db.products();
    let mut generated = 0;

    'outer: for round in 0.. {
        for (category, names) in CATEGORIES {
            for name in names.iter() {
                for (size, price_step) in SIZES {
                    if generated >= count {
                        break 'outer;
                    }
                    let fields = generate_product(category, name, size, *price_step, round, generated);
                    if let Err(e) = products.create(&fields).await {
                        eprintln!("Failed to insert {}: {}", fields.code, e);
                        continue;
                    }
                    generated += 1;

                    if generated % 100 == 0 {
                        println!("  Generated {} products...", generated);
                    }
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Verifying search...");
    let page = products
        .list(&maestro_core::ListFilters::search("leche"), None)
        .await?;
    println!("  Search 'leche': {} results", page.total);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(
    category: &str,
    name: &str,
    size: &str,
    price_step: i64,
    round: usize,
    seed: usize,
) -> ProductFields {
    // Net price: $500 - $9.500 plus the size step, whole pesos
    let net_units = 500 + ((seed * 137) % 9000) as i64 + price_step;
    // Gross = net + 19% IVA, rounded to whole pesos
    let gross_units = (net_units * 119 + 50) / 100;

    let description = if round == 0 {
        format!("{} {}", name, size)
    } else {
        format!("{} {} Lote {}", name, size, round + 1)
    };

    ProductFields {
        code: format!("{}-{:04}", category, seed),
        description,
        net_price: Money::from_units(net_units),
        gross_price: Money::from_units(gross_units),
        active: seed % 7 != 0,
    }
}
