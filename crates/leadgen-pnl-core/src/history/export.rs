use rust_decimal::{Decimal, RoundingStrategy};

use super::snapshot::HistoryEntry;
use crate::error::LeadGenError;
use crate::profit::params::BusinessLine;
use crate::LeadGenResult;

/// Byte-order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &str = "\u{feff}";

const TOTAL_COLUMNS: [&str; 9] = [
    "timestamp",
    "avg_cost_per_lead",
    "total_daily_leads",
    "total_revenue",
    "total_promo_cost",
    "total_labor_cost",
    "total_variable_cost",
    "total_gross_profit",
    "total_roi",
];

const LINE_COLUMNS: [&str; 5] = ["daily_leads", "conv_rate", "derived_cost", "revenue", "gross_profit"];

fn fixed2(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn header_row() -> Vec<String> {
    let mut headers: Vec<String> = TOTAL_COLUMNS.iter().map(|c| c.to_string()).collect();
    for line in BusinessLine::ALL {
        headers.extend(LINE_COLUMNS.iter().map(|c| format!("{}_{}", line.key(), c)));
    }
    headers
}

fn entry_row(entry: &HistoryEntry) -> Vec<String> {
    let result = &entry.result_snapshot;
    let params = &entry.params_snapshot;
    let mut row = vec![
        entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        fixed2(entry.avg_cost_per_lead),
        fixed2(entry.total_daily_leads),
        fixed2(result.total.revenue),
        fixed2(result.total.promo_cost),
        fixed2(result.total.labor_cost),
        fixed2(result.total.other_costs),
        fixed2(result.total.gross_profit),
        fixed2(result.total.roi),
    ];
    for line in BusinessLine::ALL {
        let category = params.categories.get(line);
        let figures = result.line(line);
        let derived_cost = match line {
            BusinessLine::Wuchuang => entry.wuchuang_cost,
            BusinessLine::Geren => entry.geren_cost,
            BusinessLine::Sifa => entry.sifa_cost,
        };
        row.push(fixed2(params.total_daily_leads.saturating_mul(category.lead_ratio)));
        row.push(fixed2(category.conv_rate));
        row.push(fixed2(derived_cost));
        row.push(fixed2(figures.revenue));
        row.push(fixed2(figures.gross_profit));
    }
    row
}

/// Flatten history entries into CSV text (BOM, header, one row per entry).
pub fn history_to_csv(entries: &[HistoryEntry]) -> LeadGenResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(header_row())?;
    for entry in entries {
        wtr.write_record(entry_row(entry))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| LeadGenError::Export(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| LeadGenError::Export(e.to_string()))?;
    Ok(format!("{UTF8_BOM}{body}"))
}
