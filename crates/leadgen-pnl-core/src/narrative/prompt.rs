use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::profit::model::{LineResult, ProfitResult};

fn whole(value: Decimal) -> String {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}

fn ratio(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn split_line(out: &mut String, index: usize, line: &LineResult) {
    let _ = writeln!(
        out,
        "{index}. {}: revenue {}, gross profit {}, ROI {}, derived acquisition cost per lead about {}.",
        line.name,
        whole(line.revenue),
        whole(line.gross_profit),
        ratio(line.roi),
        whole(line.derived_cost),
    );
}

/// Build the diagnostic-report request sent to the text-generation service.
pub fn build_prompt(result: &ProfitResult) -> String {
    let total = &result.total;
    let mut out = String::new();

    out.push_str(
        "Acting as a senior corporate finance and operations analyst (CFO perspective), \
         write a diagnostic report on the following monthly projection for a paid-search \
         lead-generation testing business.\n\n",
    );

    out.push_str("[Overall financials]\n");
    let _ = writeln!(out, "- Monthly revenue: {}", whole(total.revenue));
    let _ = writeln!(
        out,
        "- Monthly total cost: {} (promotion {}, allocated labor {}, variable costs {})",
        whole(total.total_cost),
        whole(total.promo_cost),
        whole(total.labor_cost),
        whole(total.other_costs),
    );
    let _ = writeln!(out, "- Gross profit: {}", whole(total.gross_profit));
    let _ = writeln!(out, "- Blended ROI (revenue / promotion): {}", ratio(total.roi));

    out.push_str("\n[Business lines]\n");
    split_line(&mut out, 1, &result.wuchuang);
    split_line(&mut out, 2, &result.geren);
    let _ = writeln!(
        out,
        "3. {}: revenue {}, gross profit {}, configured cost per lead {} \
         (zero-profit threshold recommended at about {}).",
        result.sifa.name,
        whole(result.sifa.revenue),
        whole(result.sifa.gross_profit),
        whole(result.sifa.derived_cost),
        whole(total.recommended_sifa_cost),
    );

    out.push_str(
        "\nStructure the report as follows, concisely, using bold text and emoji where helpful:\n\
         1. Health overview: a direct verdict on how sound the current profit model is.\n\
         2. Profit leak diagnosis: whether promotion, labor and lab costs are out of balance, \
         and which line is the weak spot.\n\
         3. Optimization plan: three concrete actions on the funnel or staff efficiency \
         (for example raising a conversion rate or shifting traffic mix).\n\
         Output the content directly, without pleasantries.\n",
    );
    out
}
