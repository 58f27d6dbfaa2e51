//! Calc and net commands - totals for ad-hoc line items and the VAT
//! add-back for gross amounts, no database involved.
//!
//! ## Input
//! A JSON array of line items, from a file or `-` for stdin:
//! ```json
//! [
//!   { "position": "01", "kind": "material", "quantity": "10", "unitPrice": "15.00" },
//!   { "position": "02", "kind": "rental", "quantity": "1", "unitPrice": "500.00" }
//! ]
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use geruest_core::calculator::{summarize_by_kind, KindSummary};
use geruest_core::{
    compute_totals, net_from_gross, DocumentKind, LineItem, PositionKind, Totals, TotalsParams,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{parse_decimal, Context};
use crate::error::CliResult;
use crate::output;

/// Arguments for the calc command.
#[derive(Args)]
pub struct CalcArgs {
    /// JSON file with line items, `-` for stdin
    input: PathBuf,

    /// Discount in percent of the subtotal (wins over --discount-amount)
    #[arg(long, value_parser = parse_decimal)]
    discount_percent: Option<Decimal>,

    /// Fixed discount in euros
    #[arg(long, value_parser = parse_decimal)]
    discount_amount: Option<Decimal>,

    /// VAT rate in percent [default: configured rate]
    #[arg(long, value_parser = parse_decimal)]
    vat: Option<Decimal>,

    /// Leave a position kind out of the totals (repeatable)
    #[arg(long)]
    exclude: Vec<PositionKind>,

    /// Use the exclusions of a document kind (quote leaves out rental)
    #[arg(long, conflicts_with = "exclude")]
    kind: Option<DocumentKind>,
}

/// Arguments for the net command.
#[derive(Args)]
pub struct NetArgs {
    /// Gross amount in euros
    #[arg(value_parser = parse_decimal, allow_hyphen_values = true)]
    gross: Decimal,

    /// VAT rate in percent [default: configured rate]
    #[arg(long, value_parser = parse_decimal)]
    vat: Option<Decimal>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalcOutput {
    totals: Totals,
    rounded: Totals,
    by_kind: Vec<KindSummary>,
    excluded: Vec<PositionKind>,
}

/// Run the calc command.
pub fn run(args: CalcArgs, ctx: &Context) -> CliResult<()> {
    let lines = read_lines(&args.input)?;
    let params = build_params(&args, ctx.config.default_vat_rate);
    debug!(lines = lines.len(), excluded = ?params.exclude_kinds, "Computing totals");

    let totals = compute_totals(&lines, &params)?;
    let by_kind = summarize_by_kind(&lines)?;

    if ctx.json {
        return output::print_json(&CalcOutput {
            totals,
            rounded: totals.rounded(),
            by_kind,
            excluded: params.exclude_kinds,
        });
    }

    print!("{}", output::lines_table(&lines)?);
    println!();
    print!("{}", output::kind_summary(&by_kind, &params.exclude_kinds));
    println!();
    print!(
        "{}",
        output::totals_block(&totals, params.discount_percent, params.effective_vat_rate())
    );
    Ok(())
}

/// Run the net command.
pub fn run_net(args: NetArgs, ctx: &Context) -> CliResult<()> {
    let vat_rate = args.vat.unwrap_or(ctx.config.default_vat_rate);
    let totals = net_from_gross(args.gross, vat_rate)?;
    debug!(gross = %args.gross, %vat_rate, net = %totals.net, "Gross split");

    if ctx.json {
        return output::print_json(&totals.rounded());
    }
    print!("{}", output::totals_block(&totals, None, vat_rate));
    Ok(())
}

fn read_lines(input: &Path) -> CliResult<Vec<LineItem>> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn build_params(args: &CalcArgs, default_vat: Decimal) -> TotalsParams {
    let mut params = TotalsParams::new().vat_rate(args.vat.unwrap_or(default_vat));

    if let Some(pct) = args.discount_percent {
        params = params.discount_percent(pct);
    }
    if let Some(amount) = args.discount_amount {
        params = params.discount_amount(amount);
    }

    let excluded: Vec<PositionKind> = match args.kind {
        Some(kind) => kind.excluded_kinds().to_vec(),
        None => args.exclude.clone(),
    };
    for kind in excluded {
        params = params.exclude(kind);
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CalcArgs,
    }

    fn parse(argv: &[&str]) -> CalcArgs {
        let mut full = vec!["calc"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    fn scenario_lines() -> Vec<LineItem> {
        vec![
            LineItem::new("01", PositionKind::Material, dec!(10), dec!(15.00)),
            LineItem::new("02", PositionKind::Rental, dec!(1), dec!(500.00)),
        ]
    }

    #[test]
    fn test_kind_flag_derives_exclusions() {
        let args = parse(&["lines.json", "--kind", "quote", "--discount-percent", "10"]);
        let params = build_params(&args, dec!(19));
        let totals = compute_totals(&scenario_lines(), &params).unwrap().rounded();

        assert_eq!(params.exclude_kinds, vec![PositionKind::Rental]);
        assert_eq!(totals.gross, dec!(160.65));
    }

    #[test]
    fn test_defaults_to_configured_vat() {
        let args = parse(&["lines.json"]);
        let params = build_params(&args, dec!(7));
        assert_eq!(params.effective_vat_rate(), dec!(7));

        let args = parse(&["lines.json", "--vat", "19"]);
        let totals = compute_totals(&scenario_lines(), &build_params(&args, dec!(7))).unwrap();
        assert_eq!(totals.gross, dec!(773.50));
    }

    #[test]
    fn test_german_decimal_comma_in_flags() {
        let args = parse(&["-", "--discount-amount", "12,50", "--exclude", "rental"]);
        assert_eq!(args.discount_amount, Some(dec!(12.50)));
        assert_eq!(args.exclude, vec![PositionKind::Rental]);
    }

    #[test]
    fn test_kind_and_exclude_conflict() {
        let argv = ["calc", "x.json", "--kind", "quote", "--exclude", "rental"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[derive(Parser)]
    struct NetHarness {
        #[command(flatten)]
        args: NetArgs,
    }

    #[test]
    fn test_net_arguments() {
        let args = NetHarness::try_parse_from(["net", "119,00", "--vat", "7"]).unwrap().args;
        assert_eq!(args.gross, dec!(119.00));
        assert_eq!(args.vat, Some(dec!(7)));

        let credit = NetHarness::try_parse_from(["net", "-59,50"]).unwrap().args;
        assert_eq!(credit.gross, dec!(-59.50));
        assert!(credit.vat.is_none());
    }

    #[test]
    fn test_run_net_rejects_negative_rate() {
        let ctx = Context::new(crate::config::AppConfig::default(), true);
        let args = NetHarness::try_parse_from(["net", "100", "--vat=-19"]).unwrap().args;
        let err = run_net(args, &ctx).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_read_lines_from_file() {
        let path = std::env::temp_dir().join(format!("geruest-calc-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"position":"01","kind":"material","quantity":"1","unitPrice":"1000","percentage":"30"},
                {"position":2,"kind":"labor","quantity":10,"unitPrice":15}]"#,
        )
        .unwrap();

        let lines = read_lines(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_total().unwrap(), dec!(300));
        assert_eq!(lines[1].position, "02");
    }
}
