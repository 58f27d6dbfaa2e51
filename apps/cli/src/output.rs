//! Text rendering for terminal output.
//!
//! Every renderer returns a `String` so the layout can be tested without
//! capturing stdout. Amounts go through [`format_eur`]; nothing here rounds
//! on its own.

use geruest_core::calculator::{KindSummary, QuoteComparison};
use geruest_core::money::{format_eur, format_percent};
use geruest_core::{Document, DocumentKind, LineItem, PositionKind, Totals};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CliResult;

const DESCRIPTION_WIDTH: usize = 40;

/// Prints any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Totals block ("Zwischensumme" … "Brutto").
///
/// The discount row is only shown when a discount applies.
pub fn totals_block(
    totals: &Totals,
    discount_percent: Option<Decimal>,
    vat_rate: Decimal,
) -> String {
    let totals = totals.rounded();
    let mut rows = vec![("Zwischensumme".to_string(), format_eur(totals.subtotal))];

    if !totals.discount.is_zero() {
        let label = match discount_percent.filter(|p| *p > Decimal::ZERO) {
            Some(pct) => format!("Rabatt ({})", format_percent(pct)),
            None => "Rabatt".to_string(),
        };
        rows.push((label, format_eur(-totals.discount)));
    }

    rows.push(("Netto".to_string(), format_eur(totals.net)));
    rows.push((
        format!("MwSt. {}", format_percent(vat_rate)),
        format_eur(totals.vat_amount),
    ));
    rows.push(("Brutto".to_string(), format_eur(totals.gross)));

    align_pairs(&rows)
}

/// Line table: position, kind, quantity, unit, unit price, percentage, total.
pub fn lines_table(lines: &[LineItem]) -> CliResult<String> {
    if lines.is_empty() {
        return Ok("  (keine Positionen)\n".to_string());
    }

    let mut out = String::new();
    for line in lines {
        let pct = line
            .effective_percentage()
            .map(format_percent)
            .unwrap_or_default();
        let link = line
            .linked_position
            .as_deref()
            .map(|p| format!(" → {}", p))
            .unwrap_or_default();

        out.push_str(&format!(
            "  {:<4} {:<10} {:>10} {:<6} {:>14} {:>7} {:>14}  {}{}\n",
            line.position,
            line.kind.label_de(),
            line.quantity.normalize().to_string().replace('.', ","),
            line.unit,
            format_eur(line.unit_price),
            pct,
            format_eur(line.line_total()?),
            plain_text(&line.description, DESCRIPTION_WIDTH),
            link,
        ));
    }
    Ok(out)
}

/// Per-kind overview ("Positionsübersicht nach Typ").
pub fn kind_summary(summary: &[KindSummary], excluded: &[PositionKind]) -> String {
    let rows: Vec<(String, String)> = summary
        .iter()
        .map(|s| {
            let marker = if excluded.contains(&s.kind) {
                " (nicht in Summe)"
            } else {
                ""
            };
            (
                format!("{} × {}{}", s.count, s.kind.label_de(), marker),
                format_eur(s.total),
            )
        })
        .collect();
    align_pairs(&rows)
}

/// Quote vs invoice comparison.
pub fn comparison_block(cmp: &QuoteComparison) -> String {
    let mut rows = vec![
        ("Angebot brutto".to_string(), format_eur(cmp.quote_gross)),
        ("Rechnung brutto".to_string(), format_eur(cmp.invoice_gross)),
        ("Differenz".to_string(), format_eur(cmp.difference)),
    ];
    if let Some(pct) = cmp.difference_percent {
        rows.push(("Differenz %".to_string(), format_percent(pct.round_dp(1))));
    }
    rows.push(("Offen".to_string(), format_eur(cmp.remaining)));
    if let Some(pct) = cmp.billed_percent {
        rows.push(("Abgerechnet".to_string(), format_percent(pct.round_dp(1))));
    }
    align_pairs(&rows)
}

/// Due date, paid and open amount of an invoice; empty for quotes.
pub fn payment_block(doc: &Document) -> CliResult<String> {
    if doc.kind != DocumentKind::Invoice {
        return Ok(String::new());
    }

    let mut rows = Vec::new();
    if let Some(due) = doc.due_date {
        rows.push(("Fällig am".to_string(), due.format("%d.%m.%Y").to_string()));
    }
    rows.push(("Bezahlt".to_string(), format_eur(doc.paid_amount)));
    rows.push(("Offen".to_string(), format_eur(doc.open_amount()?)));
    Ok(align_pairs(&rows))
}

/// One-line summary used by `doc list`.
pub fn document_row(doc: &Document) -> CliResult<String> {
    let gross = doc.totals()?.gross;
    Ok(format!(
        "{:<12} {:<15} {:<28} {:>14}  {}",
        doc.number,
        doc.status.as_str(),
        truncate(&doc.customer_name, 28),
        format_eur(gross),
        doc.updated_at.format("%d.%m.%Y"),
    ))
}

fn align_pairs(rows: &[(String, String)]) -> String {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(label, value)| {
            format!(
                "  {}{}  {:>width$}\n",
                label,
                " ".repeat(label_width - label.chars().count()),
                value,
                width = value_width
            )
        })
        .collect()
}

/// First line of a description with rich-text tags removed.
fn plain_text(html: &str, max: usize) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    truncate(first, max)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_block_quote_scenario() {
        let totals = Totals {
            subtotal: dec!(150),
            discount: dec!(15),
            net: dec!(135),
            vat_amount: dec!(25.65),
            gross: dec!(160.65),
        };
        let text = totals_block(&totals, Some(dec!(10)), dec!(19));

        assert!(text.contains("Rabatt (10 %)"));
        assert!(text.contains("-15,00 €"));
        assert!(text.contains("MwSt. 19 %"));
        assert!(text.contains("160,65 €"));
    }

    #[test]
    fn test_payment_block_only_for_invoices() {
        use chrono::{NaiveDate, Utc};

        let quote = Document::new_quote("A-2026-0001", Utc::now()).unwrap();
        assert!(payment_block(&quote).unwrap().is_empty());

        let mut invoice = Document::new_invoice("R-2026-0001", Utc::now()).unwrap();
        invoice
            .add_line(LineItem::new("", PositionKind::Labor, dec!(1), dec!(100)))
            .unwrap();
        invoice.due_date = NaiveDate::from_ymd_opt(2026, 4, 13);
        invoice.paid_amount = dec!(19);

        let text = payment_block(&invoice).unwrap();
        assert!(text.contains("13.04.2026"));
        assert!(text.contains("19,00 €"));
        assert!(text.contains("100,00 €"));
    }

    #[test]
    fn test_totals_block_hides_zero_discount() {
        let text = totals_block(&Totals::zero(), None, dec!(19));
        assert!(!text.contains("Rabatt"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_lines_table_shows_percentage_and_total() {
        let lines = vec![
            LineItem::new("01", PositionKind::Labor, dec!(1), dec!(1000))
                .with_percentage(dec!(30))
                .with_description("<p>Aufbau <b>Fassade</b></p>"),
        ];
        let table = lines_table(&lines).unwrap();

        assert!(table.contains("30 %"));
        assert!(table.contains("300,00 €"));
        assert!(table.contains("Aufbau Fassade"));
    }

    #[test]
    fn test_kind_summary_marks_excluded() {
        let summary = vec![KindSummary {
            kind: PositionKind::Rental,
            count: 1,
            total: dec!(500),
        }];
        let text = kind_summary(&summary, &[PositionKind::Rental]);
        assert!(text.contains("nicht in Summe"));
        assert!(text.contains("500,00 €"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Gerüst", 10), "Gerüst");
        assert_eq!(truncate("Fassadengerüst", 6), "Fassa…");
    }
}
