//! Template command - text snippets and position templates.

use chrono::Utc;
use clap::{Args, Subcommand};
use geruest_core::money::{format_eur, format_percent};
use geruest_core::{PositionKind, PositionTemplate, TemplateCategory, TextTemplate};
use geruest_db::Database;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{parse_decimal, require, Context};
use crate::error::CliResult;
use crate::output;

/// Arguments for the template command.
#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    command: TemplateCommand,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List text templates
    Texts(TextsArgs),

    /// List position templates
    Positions(PositionsArgs),

    /// Create or update a text template
    SaveText(SaveTextArgs),

    /// Create or update a position template (matched by shortcode)
    SavePosition(SavePositionArgs),

    /// Delete a text template by id
    DeleteText(IdArg),

    /// Delete a position template by shortcode
    DeletePosition(ShortcodeArg),
}

#[derive(Args)]
struct TextsArgs {
    /// subject, intro, payment_terms or closing
    #[arg(long)]
    category: Option<TemplateCategory>,

    /// Include inactive templates
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct PositionsArgs {
    /// Include inactive templates
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct SaveTextArgs {
    /// Update this template instead of creating one
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    category: TemplateCategory,

    #[arg(long)]
    name: String,

    #[arg(long)]
    text: String,

    /// Store as inactive
    #[arg(long)]
    inactive: bool,
}

#[derive(Args)]
struct SavePositionArgs {
    /// Shortcode, e.g. EINR
    shortcode: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    kind: PositionKind,

    #[arg(long, default_value = "St.")]
    unit: String,

    #[arg(long)]
    description: Option<String>,

    /// Default unit price in euros
    #[arg(long, value_parser = parse_decimal)]
    price: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    quantity: Option<Decimal>,

    /// Default billed percentage (0-100)
    #[arg(long, value_parser = parse_decimal)]
    percentage: Option<Decimal>,

    /// Grouping label
    #[arg(long)]
    category: Option<String>,

    /// Store as inactive
    #[arg(long)]
    inactive: bool,
}

#[derive(Args)]
struct IdArg {
    id: String,
}

#[derive(Args)]
struct ShortcodeArg {
    shortcode: String,
}

/// Run the template command.
pub async fn run(args: TemplateArgs, ctx: &Context) -> CliResult<()> {
    let db = ctx.open_db().await?;

    let result = match args.command {
        TemplateCommand::Texts(args) => list_texts(&db, args, ctx).await,
        TemplateCommand::Positions(args) => list_positions(&db, args, ctx).await,
        TemplateCommand::SaveText(args) => save_text(&db, args, ctx).await,
        TemplateCommand::SavePosition(args) => save_position(&db, args, ctx).await,
        TemplateCommand::DeleteText(args) => {
            db.templates().delete_text(&args.id).await?;
            info!(id = %args.id, "Text template deleted");
            println!("Textvorlage {} gelöscht", args.id);
            Ok(())
        }
        TemplateCommand::DeletePosition(args) => {
            let template = require(
                db.templates()
                    .get_position_by_shortcode(&args.shortcode)
                    .await?,
                "Position template",
                &args.shortcode,
            )?;
            db.templates().delete_position(&template.id).await?;
            info!(shortcode = %template.shortcode, "Position template deleted");
            println!("Positionsvorlage {} gelöscht", template.shortcode);
            Ok(())
        }
    };

    db.close().await;
    result
}

async fn list_texts(db: &Database, args: TextsArgs, ctx: &Context) -> CliResult<()> {
    let templates = db.templates().list_text(args.category, !args.all).await?;
    if ctx.json {
        return output::print_json(&templates);
    }

    for t in &templates {
        let first_line = t.text.lines().next().unwrap_or("");
        println!(
            "{}  {:<14} {:<24} {}{}",
            t.id,
            t.category.as_str(),
            t.name,
            first_line,
            if t.active { "" } else { "  (inaktiv)" }
        );
    }
    Ok(())
}

async fn list_positions(db: &Database, args: PositionsArgs, ctx: &Context) -> CliResult<()> {
    let templates = db.templates().list_positions(!args.all).await?;
    if ctx.json {
        return output::print_json(&templates);
    }

    for t in &templates {
        println!(
            "{:<10} {:<10} {:<6} {:>12} {:>6}  {}{}",
            t.shortcode,
            t.kind.label_de(),
            t.unit,
            t.default_price.map(format_eur).unwrap_or_default(),
            t.default_percentage.map(format_percent).unwrap_or_default(),
            t.name,
            if t.active { "" } else { "  (inaktiv)" }
        );
    }
    Ok(())
}

async fn save_text(db: &Database, args: SaveTextArgs, ctx: &Context) -> CliResult<()> {
    let now = Utc::now();
    let existing = match &args.id {
        Some(id) => Some(require(db.templates().get_text(id).await?, "Text template", id)?),
        None => None,
    };

    let template = TextTemplate {
        id: existing
            .as_ref()
            .map(|t| t.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        category: args.category,
        name: args.name,
        text: args.text,
        active: !args.inactive,
        created_at: existing.as_ref().map(|t| t.created_at).unwrap_or(now),
        updated_at: now,
    };

    db.templates().save_text(&template).await?;
    info!(id = %template.id, category = %template.category.as_str(), "Text template saved");

    if ctx.json {
        return output::print_json(&template);
    }
    println!("{}  {}", template.id, template.name);
    Ok(())
}

async fn save_position(db: &Database, args: SavePositionArgs, ctx: &Context) -> CliResult<()> {
    let now = Utc::now();
    let existing = db
        .templates()
        .get_position_by_shortcode(&args.shortcode)
        .await?;

    let template = PositionTemplate {
        id: existing
            .as_ref()
            .map(|t| t.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        shortcode: args.shortcode.trim().to_uppercase(),
        description: args.description.unwrap_or_else(|| args.name.clone()),
        name: args.name,
        kind: args.kind,
        unit: args.unit,
        default_price: args.price,
        default_quantity: args.quantity,
        default_percentage: args.percentage,
        category: args.category,
        active: !args.inactive,
        created_at: existing.as_ref().map(|t| t.created_at).unwrap_or(now),
        updated_at: now,
    };

    db.templates().save_position(&template).await?;
    info!(
        shortcode = %template.shortcode,
        updated = existing.is_some(),
        "Position template saved"
    );

    if ctx.json {
        return output::print_json(&template);
    }
    println!("{}  {}", template.shortcode, template.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TemplateArgs,
    }

    #[test]
    fn test_save_position_arguments() {
        let argv = [
            "template", "save-position", "aufb", "--name", "Aufbau", "--kind", "lohn",
            "--unit", "qm", "--price", "8,50", "--percentage", "60",
        ];
        match Harness::try_parse_from(argv).unwrap().args.command {
            TemplateCommand::SavePosition(args) => {
                assert_eq!(args.kind, PositionKind::Labor);
                assert_eq!(args.price, Some(dec!(8.50)));
                assert_eq!(args.percentage, Some(dec!(60)));
                assert!(!args.inactive);
            }
            _ => panic!("expected save-position"),
        }
    }

    #[test]
    fn test_text_category_is_validated() {
        let argv = ["template", "texts", "--category", "footer"];
        assert!(Harness::try_parse_from(argv).is_err());

        let argv = ["template", "texts", "--category", "payment-terms"];
        assert!(Harness::try_parse_from(argv).is_ok());
    }
}
