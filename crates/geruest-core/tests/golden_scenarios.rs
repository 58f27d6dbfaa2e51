//! End-to-end checks of the calculator against hand-computed documents.

use chrono::Utc;
use geruest_core::calculator::{compute_totals, Totals, TotalsParams};
use geruest_core::money::format_eur;
use geruest_core::types::{LineItem, PositionKind};
use geruest_core::{CoreError, Document, DocumentKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn scaffold_lines() -> Vec<LineItem> {
    vec![
        LineItem::new("01", PositionKind::Material, dec!(10), dec!(15.00)),
        LineItem::new("02", PositionKind::Rental, dec!(1), dec!(500.00)),
    ]
}

fn assert_totals(totals: Totals, expected: [Decimal; 5]) {
    let r = totals.rounded();
    assert_eq!(
        [r.subtotal, r.discount, r.net, r.vat_amount, r.gross],
        expected
    );
}

#[test]
fn quote_excludes_rental_and_applies_percent_discount() {
    let params = TotalsParams::new()
        .discount_percent(dec!(10))
        .vat_rate(dec!(19))
        .exclude(PositionKind::Rental);

    let totals = compute_totals(&scaffold_lines(), &params).unwrap();
    assert_totals(
        totals,
        [dec!(150.00), dec!(15.00), dec!(135.00), dec!(25.65), dec!(160.65)],
    );
    assert_eq!(format_eur(totals.gross), "160,65 €");
}

#[test]
fn invoice_bills_every_line() {
    let params = TotalsParams::new().vat_rate(dec!(19));

    let totals = compute_totals(&scaffold_lines(), &params).unwrap();
    assert_totals(
        totals,
        [dec!(650.00), dec!(0), dec!(650.00), dec!(123.50), dec!(773.50)],
    );
    assert_eq!(format_eur(totals.gross), "773,50 €");
}

#[test]
fn percentage_line_bills_its_share() {
    let lines = [LineItem::new("01", PositionKind::Material, dec!(1), dec!(1000))
        .with_percentage(dec!(30))];
    let params = TotalsParams::new().vat_rate(Decimal::ZERO);

    let totals = compute_totals(&lines, &params).unwrap();
    assert_totals(
        totals,
        [dec!(300.00), dec!(0), dec!(300.00), dec!(0), dec!(300.00)],
    );
}

#[test]
fn document_kind_drives_exclusion() {
    let now = Utc::now();
    let mut quote = Document::new(DocumentKind::Quote, "A-2026-0001", now).unwrap();
    let mut invoice = Document::new(DocumentKind::Invoice, "R-2026-0001", now).unwrap();

    for line in scaffold_lines() {
        quote.add_line(line.clone()).unwrap();
        invoice.add_line(line).unwrap();
    }
    quote.set_discount_percent(dec!(10)).unwrap();

    assert_eq!(quote.totals().unwrap().rounded().gross, dec!(160.65));
    assert_eq!(invoice.totals().unwrap().rounded().gross, dec!(773.50));
}

#[test]
fn identical_inputs_give_identical_totals() {
    let lines = scaffold_lines();
    let params = TotalsParams::new()
        .discount_amount(dec!(12.34))
        .vat_rate(dec!(7));

    let first = compute_totals(&lines, &params).unwrap();
    for _ in 0..10 {
        assert_eq!(compute_totals(&lines, &params).unwrap(), first);
    }
}

#[test]
fn oversized_discount_never_makes_totals_negative() {
    let params = TotalsParams::new().discount_amount(dec!(10000));
    let totals = compute_totals(&scaffold_lines(), &params).unwrap();

    assert_eq!(totals.net, Decimal::ZERO);
    assert_eq!(totals.gross, Decimal::ZERO);
}

#[test]
fn invalid_input_is_reported_before_computing() {
    let mut lines = scaffold_lines();
    lines.push(LineItem::new("03", PositionKind::Transport, dec!(-1), dec!(80)));

    let err = compute_totals(&lines, &TotalsParams::new()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert!(err.to_string().contains("position 03"));
}
