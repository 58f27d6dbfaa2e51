//! # Seed Data Generator
//!
//! Populates the database with development data.
//!
//! ## Usage
//! ```bash
//! cargo run -p geruest-db --bin seed
//!
//! # Specify database path
//! cargo run -p geruest-db --bin seed -- --db ./data/geruest.db
//! ```
//!
//! ## Generated Data
//! - Customers (one company, one private client) with a project each
//! - Text templates for every category
//! - Position templates (`EINR`, `MIETE4W`, `TRANSP`, ...)
//! - A draft quote built from the position templates

use chrono::{Datelike, Utc};
use clap::Parser;
use geruest_core::{
    Customer, Document, DocumentKind, PositionKind, PositionTemplate, Project, TemplateCategory,
    TextTemplate,
};
use geruest_db::{Database, DbConfig};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Gerüst ERP seed data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./geruest_dev.db")]
    db: String,
}

/// (shortcode, name, kind, unit, price in cents, percentage)
const POSITIONS: &[(&str, &str, PositionKind, &str, i64, Option<i64>)] = &[
    ("EINR", "Einrüstung Fassadengerüst", PositionKind::Labor, "qm", 850, None),
    ("AUFB", "Aufbau (60 % der Einrüstung)", PositionKind::Labor, "qm", 850, Some(60)),
    ("ABB", "Abbau (40 % der Einrüstung)", PositionKind::Labor, "qm", 850, Some(40)),
    ("MIETE4W", "Gerüstmiete je angefangene Woche ab 4. Woche", PositionKind::Rental, "qm", 85, None),
    ("NETZ", "Gerüstnetz liefern und montieren", PositionKind::Material, "qm", 190, None),
    ("TRANSP", "An- und Abtransport", PositionKind::Transport, "psch.", 28000, None),
];

const TEXTS: &[(TemplateCategory, &str, &str)] = &[
    (TemplateCategory::Subject, "Fassadengerüst", "Angebot Fassadengerüst"),
    (
        TemplateCategory::Intro,
        "Standard",
        "Sehr geehrte Damen und Herren,\nvielen Dank für Ihre Anfrage. Gerne bieten wir Ihnen an:",
    ),
    (
        TemplateCategory::PaymentTerms,
        "14 Tage netto",
        "Zahlbar innerhalb von 14 Tagen nach Rechnungsdatum ohne Abzug.",
    ),
    (
        TemplateCategory::Closing,
        "Standard",
        "Wir freuen uns auf Ihren Auftrag.\nMit freundlichen Grüßen",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("🌱 Gerüst ERP Seed Data Generator");
    println!("=================================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.documents().count(None).await?;
    if existing > 0 {
        println!("⚠ Database already has {} documents", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Customers and projects
    let company = Customer {
        id: Uuid::new_v4().to_string(),
        company: Some("Hansen Bau GmbH".to_string()),
        first_name: "Jens".to_string(),
        last_name: "Hansen".to_string(),
        street: Some("Am Kai".to_string()),
        house_number: Some("7".to_string()),
        postal_code: Some("24103".to_string()),
        city: Some("Kiel".to_string()),
        created_at: now,
    };
    let private = Customer {
        id: Uuid::new_v4().to_string(),
        company: None,
        first_name: "Anna".to_string(),
        last_name: "Schröder".to_string(),
        street: Some("Birkenallee".to_string()),
        house_number: Some("21a".to_string()),
        postal_code: Some("24937".to_string()),
        city: Some("Flensburg".to_string()),
        created_at: now,
    };

    for customer in [&company, &private] {
        db.customers().insert(customer).await?;
    }
    println!("✓ Inserted 2 customers");

    let project = Project {
        id: Uuid::new_v4().to_string(),
        customer_id: company.id.clone(),
        name: "Fassadensanierung Holtenauer Str.".to_string(),
        site_address: Some("Holtenauer Str. 112, 24105 Kiel".to_string()),
        created_at: now,
    };
    db.projects().insert(&project).await?;
    println!("✓ Inserted 1 project");

    // Templates
    let mut texts = Vec::with_capacity(TEXTS.len());
    for (category, name, text) in TEXTS {
        let template = TextTemplate {
            id: Uuid::new_v4().to_string(),
            category: *category,
            name: name.to_string(),
            text: text.to_string(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.templates().save_text(&template).await?;
        texts.push(template);
    }
    println!("✓ Inserted {} text templates", texts.len());

    let mut positions = Vec::with_capacity(POSITIONS.len());
    for (shortcode, name, kind, unit, price_cents, percentage) in POSITIONS {
        let template = PositionTemplate {
            id: Uuid::new_v4().to_string(),
            shortcode: shortcode.to_string(),
            name: name.to_string(),
            description: name.to_string(),
            kind: *kind,
            unit: unit.to_string(),
            default_price: Some(Decimal::new(*price_cents, 2)),
            default_quantity: None,
            default_percentage: percentage.map(Decimal::from),
            category: Some("Fassade".to_string()),
            active: true,
            created_at: now,
            updated_at: now,
        };
        db.templates().save_position(&template).await?;
        positions.push(template);
    }
    println!("✓ Inserted {} position templates", positions.len());

    // Sample quote
    let number = db.documents().next_number(DocumentKind::Quote, now.year()).await?;
    let mut quote = Document::new_quote(number, now)?;
    quote.assign_customer(&company)?;
    quote.assign_project(&project)?;
    for template in &texts {
        quote.apply_text_template(template)?;
    }

    let area = Decimal::from(420);
    for template in &positions {
        let mut line = template.to_line_item();
        if template.unit == "qm" {
            line.quantity = area;
        }
        quote.add_line(line)?;
    }
    quote.set_discount_percent(Decimal::from(3))?;

    db.documents().insert(&quote).await?;

    let totals = quote.totals()?.rounded();
    println!(
        "✓ Inserted quote {} ({} lines, gross {})",
        quote.number,
        quote.lines.len(),
        geruest_core::money::format_eur(totals.gross)
    );

    println!();
    println!("🎉 Seed complete!");

    Ok(())
}
