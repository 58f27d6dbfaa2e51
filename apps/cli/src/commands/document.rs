//! Document command - quotes and invoices.
//!
//! ## Editing Flow
//! ```text
//! load by number ──► geruest-core edit (rules, validation) ──► save (version check)
//! ```
//! Every edit is a load/modify/save round trip. A concurrent edit between
//! load and save surfaces as `[CONFLICT]`.

use chrono::{Datelike, Utc};
use clap::{ArgGroup, Args, Subcommand};
use geruest_core::calculator::{KindSummary, QuoteComparison};
use geruest_core::money::{format_eur, format_percent};
use geruest_core::{
    CoreError, Document, DocumentKind, DocumentStatus, LineItem, PositionKind, Totals,
};
use geruest_db::{Database, DocumentFilter};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::{parse_decimal, require, Context};
use crate::error::{CliError, CliResult};
use crate::output;

/// Arguments for the document command.
#[derive(Args)]
pub struct DocumentArgs {
    #[command(subcommand)]
    command: DocumentCommand,
}

#[derive(Subcommand)]
enum DocumentCommand {
    /// Create an empty draft quote or invoice
    New(NewArgs),

    /// Show a document with lines and totals
    Show(NumberArg),

    /// List documents
    List(ListArgs),

    /// Append a line, from scratch or from a position template
    AddLine(AddLineArgs),

    /// Change fields of an existing line
    UpdateLine(UpdateLineArgs),

    /// Remove a line
    RemoveLine(PositionArgs),

    /// Copy quantity, unit, price and percentage from another line
    Link(LinkArgs),

    /// Set or clear the discount
    Discount(DiscountArgs),

    /// Set the VAT rate
    Vat(VatArgs),

    /// Assign a customer and optionally one of their projects
    Assign(AssignArgs),

    /// Fill subject, intro, payment terms or closing from a text template
    ApplyText(ApplyTextArgs),

    /// Move a document to another status
    Status(StatusArgs),

    /// Create a draft invoice from an accepted quote
    Invoice(NumberArg),

    /// Record a payment received on a sent invoice
    Pay(PayArgs),

    /// Compare a quote with the invoices created from it
    Compare(NumberArg),
}

#[derive(Args)]
struct NumberArg {
    /// Document number, e.g. A-2026-0001
    number: String,
}

#[derive(Args)]
struct NewArgs {
    /// quote or invoice
    kind: DocumentKind,

    /// Customer id
    #[arg(long)]
    customer: Option<String>,

    /// Project id (requires --customer)
    #[arg(long, requires = "customer")]
    project: Option<String>,

    /// VAT rate in percent [default: configured rate]
    #[arg(long, value_parser = parse_decimal)]
    vat: Option<Decimal>,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    kind: Option<DocumentKind>,

    #[arg(long)]
    status: Option<DocumentStatus>,

    /// Customer id
    #[arg(long)]
    customer: Option<String>,

    #[arg(long, default_value_t = 50)]
    limit: u32,
}

/// Line fields settable from the command line.
#[derive(Args, Default)]
struct LineFields {
    /// material, labor, rental, transport or other (German names accepted)
    #[arg(long)]
    kind: Option<PositionKind>,

    #[arg(long, value_parser = parse_decimal)]
    quantity: Option<Decimal>,

    /// Unit price in euros
    #[arg(long, value_parser = parse_decimal)]
    price: Option<Decimal>,

    /// Unit label (St., m, qm, lfdm, ...)
    #[arg(long)]
    unit: Option<String>,

    /// Bill only this share of quantity × price (0-100)
    #[arg(long, value_parser = parse_decimal)]
    percentage: Option<Decimal>,

    #[arg(long)]
    description: Option<String>,
}

impl LineFields {
    fn apply(self, line: &mut LineItem) {
        if let Some(kind) = self.kind {
            line.kind = kind;
        }
        if let Some(quantity) = self.quantity {
            line.quantity = quantity;
        }
        if let Some(price) = self.price {
            line.unit_price = price;
        }
        if let Some(unit) = self.unit {
            line.unit = unit;
        }
        if let Some(percentage) = self.percentage {
            line.percentage = (!percentage.is_zero()).then_some(percentage);
        }
        if let Some(description) = self.description {
            line.description = description;
        }
    }
}

#[derive(Args)]
struct AddLineArgs {
    number: String,

    /// Start from a position template (shortcode, e.g. EINR)
    #[arg(long)]
    template: Option<String>,

    #[command(flatten)]
    fields: LineFields,
}

#[derive(Args)]
struct UpdateLineArgs {
    number: String,

    /// Position label, e.g. 03
    position: String,

    #[command(flatten)]
    fields: LineFields,
}

#[derive(Args)]
struct PositionArgs {
    number: String,
    position: String,
}

#[derive(Args)]
struct LinkArgs {
    number: String,

    /// Line to change
    position: String,

    /// Line to copy values from
    target: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("discount").required(true).args(["percent", "amount", "clear"])))]
struct DiscountArgs {
    number: String,

    /// Discount in percent of the subtotal
    #[arg(long, value_parser = parse_decimal)]
    percent: Option<Decimal>,

    /// Fixed discount in euros
    #[arg(long, value_parser = parse_decimal)]
    amount: Option<Decimal>,

    /// Remove any discount
    #[arg(long)]
    clear: bool,
}

#[derive(Args)]
struct VatArgs {
    number: String,

    /// VAT rate in percent
    #[arg(value_parser = parse_decimal)]
    rate: Decimal,
}

#[derive(Args)]
struct AssignArgs {
    number: String,

    /// Customer id
    customer: String,

    /// Project id of that customer
    #[arg(long)]
    project: Option<String>,
}

#[derive(Args)]
struct ApplyTextArgs {
    number: String,

    /// Text template id
    template: String,
}

#[derive(Args)]
struct StatusArgs {
    number: String,

    /// Target status (draft, sent, accepted, paid, ...)
    status: DocumentStatus,
}

#[derive(Args)]
struct PayArgs {
    number: String,

    /// Amount received in euros
    #[arg(value_parser = parse_decimal)]
    amount: Decimal,
}

/// JSON shape of `doc show`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentView<'a> {
    document: &'a Document,
    totals: Totals,
    by_kind: Vec<KindSummary>,
    /// Invoices only.
    #[serde(skip_serializing_if = "Option::is_none")]
    open_amount: Option<Decimal>,
}

/// JSON shape of `doc compare`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonView {
    quote: String,
    invoices: Vec<String>,
    #[serde(flatten)]
    comparison: QuoteComparison,
}

/// Run the document command.
pub async fn run(args: DocumentArgs, ctx: &Context) -> CliResult<()> {
    let db = ctx.open_db().await?;
    let result = execute(&db, args.command, ctx).await;
    db.close().await;
    result
}

async fn execute(db: &Database, command: DocumentCommand, ctx: &Context) -> CliResult<()> {
    match command {
        DocumentCommand::New(args) => create(db, args, ctx).await,
        DocumentCommand::Show(args) => show(db, &args.number, ctx).await,
        DocumentCommand::List(args) => list(db, args, ctx).await,
        DocumentCommand::AddLine(args) => add_line(db, args, ctx).await,
        DocumentCommand::UpdateLine(args) => {
            edit(db, &args.number, ctx, |doc| {
                doc.update_line(&args.position, |line| args.fields.apply(line))?;
                Ok(format!("Position {} geändert", args.position))
            })
            .await
        }
        DocumentCommand::RemoveLine(args) => {
            edit(db, &args.number, ctx, |doc| {
                doc.remove_line(&args.position)?;
                Ok(format!("Position {} entfernt", args.position))
            })
            .await
        }
        DocumentCommand::Link(args) => {
            edit(db, &args.number, ctx, |doc| {
                doc.link_line(&args.position, &args.target)?;
                Ok(format!(
                    "Position {} verknüpft mit {}",
                    args.position, args.target
                ))
            })
            .await
        }
        DocumentCommand::Discount(args) => set_discount(db, args, ctx).await,
        DocumentCommand::Vat(args) => {
            edit(db, &args.number, ctx, |doc| {
                doc.set_vat_rate(args.rate)?;
                Ok(format!("MwSt. auf {} gesetzt", format_percent(args.rate)))
            })
            .await
        }
        DocumentCommand::Assign(args) => assign(db, args, ctx).await,
        DocumentCommand::ApplyText(args) => {
            let template = require(
                db.templates().get_text(&args.template).await?,
                "Text template",
                &args.template,
            )?;
            edit(db, &args.number, ctx, |doc| {
                doc.apply_text_template(&template)?;
                Ok(format!("Textvorlage '{}' übernommen", template.name))
            })
            .await
        }
        DocumentCommand::Status(args) => {
            let now = Utc::now();
            edit(db, &args.number, ctx, |doc| {
                let from = doc.status;
                doc.transition_to(args.status, now)?;
                info!(number = %doc.number, %from, to = %args.status, "Status changed");
                Ok(format!("Status {} → {}", from, args.status))
            })
            .await
        }
        DocumentCommand::Invoice(args) => invoice(db, &args.number, ctx).await,
        DocumentCommand::Pay(args) => {
            let now = Utc::now();
            edit(db, &args.number, ctx, |doc| {
                let status = doc.record_payment(args.amount, now)?;
                info!(number = %doc.number, amount = %args.amount, %status, "Payment recorded");
                Ok(format!(
                    "Zahlung {} gebucht, offen {}",
                    format_eur(args.amount),
                    format_eur(doc.open_amount()?)
                ))
            })
            .await
        }
        DocumentCommand::Compare(args) => compare(db, &args.number, ctx).await,
    }
}

async fn load(db: &Database, number: &str) -> CliResult<Document> {
    let doc = db.documents().get_by_number(number.trim()).await?;
    require(doc, "Document", number)
}

/// Load, modify through `change`, save. `change` returns the confirmation text.
async fn edit<F>(db: &Database, number: &str, ctx: &Context, change: F) -> CliResult<()>
where
    F: FnOnce(&mut Document) -> CliResult<String>,
{
    let mut doc = load(db, number).await?;
    let message = change(&mut doc)?;
    db.documents().save(&mut doc).await?;
    debug!(number = %doc.number, version = doc.version, "Document saved");
    confirm(&doc, &message, ctx)
}

fn confirm(doc: &Document, message: &str, ctx: &Context) -> CliResult<()> {
    if ctx.json {
        return print_view(doc);
    }
    let gross = doc.totals()?.gross;
    println!("{}: {} (Brutto {})", doc.number, message, format_eur(gross));
    Ok(())
}

fn print_view(doc: &Document) -> CliResult<()> {
    output::print_json(&DocumentView {
        document: doc,
        totals: doc.totals()?.rounded(),
        by_kind: doc.summary_by_kind()?,
        open_amount: match doc.kind {
            DocumentKind::Invoice => Some(doc.open_amount()?),
            DocumentKind::Quote => None,
        },
    })
}

async fn create(db: &Database, args: NewArgs, ctx: &Context) -> CliResult<()> {
    let now = Utc::now();
    let number = db.documents().next_number(args.kind, now.year()).await?;

    let mut doc = Document::new(args.kind, number, now)?;
    doc.set_vat_rate(args.vat.unwrap_or(ctx.config.default_vat_rate))?;

    if let Some(customer_id) = &args.customer {
        let customer = require(
            db.customers().get_by_id(customer_id).await?,
            "Customer",
            customer_id,
        )?;
        doc.assign_customer(&customer)?;
    }
    if let Some(project_id) = &args.project {
        let project = require(db.projects().get_by_id(project_id).await?, "Project", project_id)?;
        doc.assign_project(&project)?;
    }

    db.documents().insert(&doc).await?;
    info!(number = %doc.number, kind = %doc.kind, "Document created");

    confirm(&doc, "angelegt", ctx)
}

async fn show(db: &Database, number: &str, ctx: &Context) -> CliResult<()> {
    let doc = load(db, number).await?;
    if ctx.json {
        return print_view(&doc);
    }

    let title = match doc.kind {
        DocumentKind::Quote => "Angebot",
        DocumentKind::Invoice => "Rechnung",
    };

    println!("{}", ctx.config.company_name);
    println!();
    println!("{} {}  [{}]", title, doc.number, doc.status);
    if !doc.customer_name.is_empty() {
        println!("{}", doc.customer_name);
    }
    if let Some(address) = &doc.customer_address {
        println!("{}", address);
    }
    if let Some(quote_id) = &doc.quote_id {
        if let Some(quote) = db.documents().get_by_id(quote_id).await? {
            println!("zu Angebot {}", quote.number);
        }
    }
    println!();

    for text in [&doc.subject, &doc.intro] {
        if !text.is_empty() {
            println!("{}", text);
            println!();
        }
    }

    print!("{}", output::lines_table(&doc.lines)?);
    println!();
    print!(
        "{}",
        output::kind_summary(&doc.summary_by_kind()?, doc.kind.excluded_kinds())
    );
    println!();
    print!(
        "{}",
        output::totals_block(&doc.totals()?, doc.discount_percent, doc.vat_rate)
    );
    let payment = output::payment_block(&doc)?;
    if !payment.is_empty() {
        println!();
        print!("{}", payment);
    }
    if doc.is_past_due(Utc::now().date_naive()) {
        println!("  Zahlung überfällig");
    }

    for text in [&doc.payment_terms, &doc.closing] {
        if !text.is_empty() {
            println!();
            println!("{}", text);
        }
    }
    Ok(())
}

async fn list(db: &Database, args: ListArgs, ctx: &Context) -> CliResult<()> {
    let mut filter = DocumentFilter::new().limit(args.limit);
    if let Some(kind) = args.kind {
        filter = filter.kind(kind);
    }
    if let Some(status) = args.status {
        filter = filter.status(status);
    }
    if let Some(customer) = args.customer {
        filter = filter.customer(customer);
    }

    let docs = db.documents().list(&filter).await?;
    debug!(count = docs.len(), "Documents listed");

    if ctx.json {
        return output::print_json(&docs);
    }
    if docs.is_empty() {
        println!("Keine Dokumente gefunden.");
    }
    for doc in &docs {
        println!("{}", output::document_row(doc)?);
    }
    Ok(())
}

async fn add_line(db: &Database, args: AddLineArgs, ctx: &Context) -> CliResult<()> {
    let mut line = match &args.template {
        Some(shortcode) => {
            let template = require(
                db.templates().get_position_by_shortcode(shortcode).await?,
                "Position template",
                shortcode,
            )?;
            template.to_line_item()
        }
        None => {
            let kind = args
                .fields
                .kind
                .ok_or_else(|| CliError::validation("--kind is required without --template"))?;
            let price = args
                .fields
                .price
                .ok_or_else(|| CliError::validation("--price is required without --template"))?;
            LineItem::new("", kind, Decimal::ONE, price)
        }
    };
    args.fields.apply(&mut line);

    edit(db, &args.number, ctx, |doc| {
        let position = doc.add_line(line)?;
        Ok(format!("Position {} hinzugefügt", position))
    })
    .await
}

async fn set_discount(db: &Database, args: DiscountArgs, ctx: &Context) -> CliResult<()> {
    edit(db, &args.number, ctx, |doc| {
        if args.clear {
            doc.clear_discount()?;
            return Ok("Rabatt entfernt".to_string());
        }
        if let Some(percent) = args.percent {
            doc.set_discount_percent(percent)?;
            return Ok(format!("Rabatt {}", format_percent(percent)));
        }
        match args.amount {
            Some(amount) => {
                doc.set_discount_amount(amount)?;
                Ok(format!("Rabatt {}", format_eur(amount)))
            }
            None => Err(CliError::validation(
                "one of --percent, --amount or --clear is required",
            )),
        }
    })
    .await
}

async fn assign(db: &Database, args: AssignArgs, ctx: &Context) -> CliResult<()> {
    let customer = require(
        db.customers().get_by_id(&args.customer).await?,
        "Customer",
        &args.customer,
    )?;
    let project = match &args.project {
        Some(id) => Some(require(db.projects().get_by_id(id).await?, "Project", id)?),
        None => None,
    };

    edit(db, &args.number, ctx, |doc| {
        doc.assign_customer(&customer)?;
        if let Some(project) = &project {
            doc.assign_project(project)?;
        }
        Ok(format!("Kunde {} zugeordnet", customer.display_name()))
    })
    .await
}

async fn invoice(db: &Database, quote_number: &str, ctx: &Context) -> CliResult<()> {
    let quote = load(db, quote_number).await?;
    let now = Utc::now();
    let number = db
        .documents()
        .next_number(DocumentKind::Invoice, now.year())
        .await?;

    let mut invoice = Document::invoice_from_quote(&quote, number, now)?;
    if invoice.payment_terms.trim().is_empty() {
        invoice.payment_terms = ctx.config.payment_terms();
    }
    let due = invoice.set_payment_due(ctx.config.payment_days)?;
    debug!(invoice = %invoice.number, %due, "Payment due date set");

    db.documents().insert(&invoice).await?;
    info!(quote = %quote.number, invoice = %invoice.number, "Invoice created from quote");

    confirm(&invoice, &format!("aus Angebot {} erstellt", quote.number), ctx)
}

async fn compare(db: &Database, quote_number: &str, ctx: &Context) -> CliResult<()> {
    let quote = load(db, quote_number).await?;
    if quote.kind != DocumentKind::Quote {
        return Err(CoreError::WrongDocumentKind {
            number: quote.number,
            expected: DocumentKind::Quote.to_string(),
            actual: quote.kind.to_string(),
        }
        .into());
    }

    let invoices: Vec<Document> = db
        .documents()
        .invoices_for_quote(&quote.id)
        .await?
        .into_iter()
        .filter(|inv| inv.status != DocumentStatus::Cancelled)
        .collect();

    let quote_gross = quote.totals()?.gross;
    let mut billed = Decimal::ZERO;
    for inv in &invoices {
        billed = billed
            .checked_add(inv.totals()?.gross)
            .ok_or(CoreError::AmountOverflow { step: "billed total" })?;
    }
    let comparison = QuoteComparison::between(quote_gross, billed)?;

    if ctx.json {
        return output::print_json(&ComparisonView {
            quote: quote.number,
            invoices: invoices.into_iter().map(|inv| inv.number).collect(),
            comparison,
        });
    }

    println!("Angebot {}", quote.number);
    if invoices.is_empty() {
        println!("  noch keine Rechnungen");
    }
    for inv in &invoices {
        println!("  {}", output::document_row(inv)?);
    }
    println!();
    print!("{}", output::comparison_block(&comparison));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use clap::Parser;
    use geruest_db::DbConfig;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: DocumentArgs,
    }

    fn parse(argv: &[&str]) -> DocumentCommand {
        let mut full = vec!["doc"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args.command
    }

    #[test]
    fn test_line_fields_apply_only_given_values() {
        let mut line = LineItem::new("01", PositionKind::Labor, dec!(420), dec!(8.50))
            .with_unit("qm")
            .with_percentage(dec!(60));

        LineFields {
            quantity: Some(dec!(380)),
            percentage: Some(Decimal::ZERO),
            ..LineFields::default()
        }
        .apply(&mut line);

        assert_eq!(line.quantity, dec!(380));
        assert_eq!(line.unit_price, dec!(8.50));
        assert_eq!(line.unit, "qm");
        assert_eq!(line.percentage, None);
    }

    #[test]
    fn test_add_line_parses_german_kind_and_comma() {
        match parse(&["add-line", "A-2026-0001", "--kind", "Miete", "--price", "0,85"]) {
            DocumentCommand::AddLine(args) => {
                assert_eq!(args.fields.kind, Some(PositionKind::Rental));
                assert_eq!(args.fields.price, Some(dec!(0.85)));
                assert!(args.template.is_none());
            }
            _ => panic!("expected add-line"),
        }
    }

    #[test]
    fn test_discount_requires_exactly_one_option() {
        let mut full = vec!["doc", "discount", "A-2026-0001"];
        assert!(Harness::try_parse_from(full.clone()).is_err());

        full.extend(["--percent", "10", "--amount", "5"]);
        assert!(Harness::try_parse_from(full).is_err());

        match parse(&["discount", "A-2026-0001", "--clear"]) {
            DocumentCommand::Discount(args) => assert!(args.clear),
            _ => panic!("expected discount"),
        }
    }

    #[test]
    fn test_status_argument_accepts_dashes() {
        match parse(&["status", "R-2026-0003", "partially-paid"]) {
            DocumentCommand::Status(args) => {
                assert_eq!(args.status, DocumentStatus::PartiallyPaid)
            }
            _ => panic!("expected status"),
        }
    }

    #[test]
    fn test_project_requires_customer() {
        let argv = ["doc", "new", "quote", "--project", "p1"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_pay_parses_comma_amount() {
        match parse(&["pay", "R-2026-0001", "396,15"]) {
            DocumentCommand::Pay(args) => assert_eq!(args.amount, dec!(396.15)),
            _ => panic!("expected pay"),
        }
    }

    // =========================================================================
    // Round trips against an in-memory database
    // =========================================================================

    async fn setup() -> (Database, Context, Document) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ctx = Context::new(AppConfig::default(), true);

        let mut quote = Document::new_quote("A-2026-0001", Utc::now()).unwrap();
        quote
            .add_line(LineItem::new("", PositionKind::Material, dec!(10), dec!(15.00)))
            .unwrap();
        quote
            .add_line(LineItem::new("", PositionKind::Rental, dec!(1), dec!(500.00)))
            .unwrap();
        quote.set_discount_percent(dec!(10)).unwrap();
        db.documents().insert(&quote).await.unwrap();

        (db, ctx, quote)
    }

    async fn run_doc(db: &Database, ctx: &Context, argv: &[&str]) -> CliResult<()> {
        execute(db, parse(argv), ctx).await
    }

    #[tokio::test]
    async fn test_accepted_quote_is_locked_for_edits() {
        let (db, ctx, quote) = setup().await;

        run_doc(&db, &ctx, &["status", "A-2026-0001", "accepted"]).await.unwrap();

        let err = run_doc(&db, &ctx, &["vat", "A-2026-0001", "7"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let stored = db.documents().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, DocumentStatus::Accepted);
        assert_eq!(stored.vat_rate, dec!(19));
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_edit_saves_through_version_check() {
        let (db, ctx, quote) = setup().await;

        run_doc(&db, &ctx, &["vat", "A-2026-0001", "7"]).await.unwrap();
        run_doc(&db, &ctx, &["remove-line", "A-2026-0001", "02"]).await.unwrap();

        let stored = db.documents().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.vat_rate, dec!(7));
        assert_eq!(stored.lines.len(), 1);

        let err = run_doc(&db, &ctx, &["remove-line", "A-2026-0001", "09"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invoice_and_payment_flow() {
        let (db, ctx, quote) = setup().await;

        let err = run_doc(&db, &ctx, &["invoice", "A-2026-0001"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        run_doc(&db, &ctx, &["status", "A-2026-0001", "accepted"]).await.unwrap();
        run_doc(&db, &ctx, &["invoice", "A-2026-0001"]).await.unwrap();

        let invoices = db.documents().invoices_for_quote(&quote.id).await.unwrap();
        assert_eq!(invoices.len(), 1);
        let invoice = &invoices[0];
        assert_eq!(invoice.number, format!("R-{}-0001", Utc::now().year()));
        assert!(invoice.due_date.is_some());
        assert!(invoice.payment_terms.contains("14"));
        assert_eq!(invoice.totals().unwrap().gross, dec!(696.15));

        let number = invoice.number.as_str();
        run_doc(&db, &ctx, &["status", number, "sent"]).await.unwrap();
        run_doc(&db, &ctx, &["pay", number, "300"]).await.unwrap();

        let partly = db.documents().get_by_number(number).await.unwrap().unwrap();
        assert_eq!(partly.status, DocumentStatus::PartiallyPaid);
        assert_eq!(partly.open_amount().unwrap(), dec!(396.15));

        run_doc(&db, &ctx, &["pay", number, "396,15"]).await.unwrap();
        let paid = db.documents().get_by_number(number).await.unwrap().unwrap();
        assert_eq!(paid.status, DocumentStatus::Paid);
        assert_eq!(paid.open_amount().unwrap(), Decimal::ZERO);

        let err = run_doc(&db, &ctx, &["pay", number, "1"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        run_doc(&db, &ctx, &["compare", "A-2026-0001"]).await.unwrap();
    }
}
