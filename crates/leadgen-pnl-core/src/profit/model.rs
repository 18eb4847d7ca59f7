use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::params::{BusinessLine, BusinessParameters, Category, LabCost, SifaCostMode};
use crate::types::{
    safe_div, saturating_sum, with_metadata, ComputationOutput, Money, Rate, DAYS_PER_MONTH,
};

/// Staffing buffer applied to raw capacity-driven headcount before rounding up.
pub const HEADCOUNT_BUFFER: Decimal = dec!(1.4);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Monthly figures for one business line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub line: BusinessLine,
    pub name: String,
    pub daily_leads: Decimal,
    pub monthly_leads: Decimal,
    pub deals: Decimal,
    pub revenue: Money,
    /// derived_cost * monthly_leads
    pub promo_cost: Money,
    /// In-sales labor plus lead-share of every shared pool
    pub labor_cost: Money,
    /// Lab cost + commission + processing fees
    pub other_costs: Money,
    pub total_cost: Money,
    pub gross_profit: Money,
    /// revenue / promo_cost
    pub roi: Decimal,
    /// Per-lead acquisition cost attributed to the line
    pub derived_cost: Money,
    pub exact_insales_headcount: Decimal,
    /// Whole number of in-sales heads
    pub insales_headcount: Decimal,
}

/// Aggregate figures across the three lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalResult {
    pub name: String,
    pub revenue: Money,
    /// The full monthly promotion budget (avg cost * daily leads * 30)
    pub promo_cost: Money,
    pub labor_cost: Money,
    pub other_costs: Money,
    pub total_cost: Money,
    pub gross_profit: Money,
    pub roi: Decimal,
    pub exact_presales_headcount: Decimal,
    /// Whole number of pre-sales heads
    pub presales_headcount: Decimal,
    pub insales_headcount: Decimal,
    /// Per-lead judicial cost at which that line breaks even
    pub recommended_sifa_cost: Money,
    /// Promotion budget left for the two ratio-split lines
    pub remaining_promo_budget: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub wuchuang: LineResult,
    pub geren: LineResult,
    pub sifa: LineResult,
    pub total: TotalResult,
}

impl ProfitResult {
    pub fn line(&self, line: BusinessLine) -> &LineResult {
        match line {
            BusinessLine::Wuchuang => &self.wuchuang,
            BusinessLine::Geren => &self.geren,
            BusinessLine::Sifa => &self.sifa,
        }
    }

    pub fn lines(&self) -> [&LineResult; 3] {
        [&self.wuchuang, &self.geren, &self.sifa]
    }
}

/// Per-lead costs of the two ratio-split lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub wuchuang: Money,
    pub geren: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Headcount needed for `load` at `capacity` per head, with the staffing
/// buffer. Returns the unrounded figure and its ceiling; both are zero for a
/// non-positive capacity and the rounded count never goes below zero.
pub fn staff_headcount(load: Decimal, capacity: Decimal) -> (Decimal, Decimal) {
    let exact = safe_div(load.saturating_mul(HEADCOUNT_BUFFER), capacity);
    let rounded = exact.ceil().max(Decimal::ZERO);
    (exact, rounded)
}

/// Split the remaining promotion budget between the two ratio-split lines
/// so that `wuchuang / geren == weight ratio` and
/// `wuchuang * leads_w + geren * leads_g == remaining`.
///
/// Both costs are zero when there is no budget left, no weighted volume to
/// carry it, or the geren weight is not positive.
pub fn split_remaining_budget(
    remaining: Money,
    wuchuang_weight: Decimal,
    geren_weight: Decimal,
    wuchuang_monthly_leads: Decimal,
    geren_monthly_leads: Decimal,
) -> BudgetSplit {
    let zero = BudgetSplit {
        wuchuang: Decimal::ZERO,
        geren: Decimal::ZERO,
    };
    if geren_weight <= Decimal::ZERO {
        return zero;
    }
    // Weighted lead volume; each line's cost is remaining * weight / volume
    let weighted_volume = geren_weight
        .saturating_mul(geren_monthly_leads)
        .saturating_add(wuchuang_weight.saturating_mul(wuchuang_monthly_leads));
    if weighted_volume <= Decimal::ZERO || remaining <= Decimal::ZERO {
        return zero;
    }
    BudgetSplit {
        wuchuang: safe_div(remaining.saturating_mul(wuchuang_weight), weighted_volume),
        geren: safe_div(remaining.saturating_mul(geren_weight), weighted_volume),
    }
}

/// Shared cost pools, computed once per evaluation.
struct SharedPools {
    total_daily_leads: Decimal,
    presales_labor: Money,
    promo_labor: Money,
    top_management: Money,
    center_salary: Money,
    insales_salary: Money,
}

/// Everything about a line that does not depend on its promotion cost.
struct LineFigures {
    daily_leads: Decimal,
    monthly_leads: Decimal,
    deals: Decimal,
    revenue: Money,
    variable_cost: Money,
    labor_cost: Money,
    exact_headcount: Decimal,
    headcount: Decimal,
}

fn line_figures(category: &Category, total_daily_leads: Decimal, pools: &SharedPools) -> LineFigures {
    let daily_leads = total_daily_leads.saturating_mul(category.lead_ratio);
    let monthly_leads = daily_leads.saturating_mul(DAYS_PER_MONTH);
    let deals = monthly_leads.saturating_mul(category.conv_rate);
    let revenue = deals.saturating_mul(category.unit_price);

    let lab_cost = match category.lab_cost {
        LabCost::PerDeal(cost) => deals.saturating_mul(cost),
        LabCost::RevenueShare(rate) => revenue.saturating_mul(rate),
    };
    let commission = revenue.saturating_mul(category.var_cost_rate);
    let processing = deals.saturating_mul(category.process_cost);
    let variable_cost = saturating_sum([lab_cost, commission, processing]);

    let (exact_headcount, headcount) = staff_headcount(daily_leads, category.capacity);
    let insales_labor = headcount.saturating_mul(pools.insales_salary);

    let share: Rate = safe_div(daily_leads, pools.total_daily_leads);
    let labor_cost = saturating_sum([
        insales_labor,
        pools.presales_labor.saturating_mul(share),
        pools.promo_labor.saturating_mul(share),
        category.center_managers.saturating_mul(pools.center_salary),
        pools.top_management.saturating_mul(share),
    ]);

    LineFigures {
        daily_leads,
        monthly_leads,
        deals,
        revenue,
        variable_cost,
        labor_cost,
        exact_headcount,
        headcount,
    }
}

/// Per-lead judicial cost at which that line's gross profit is zero,
/// floored at zero.
fn break_even_cost(figures: &LineFigures) -> Money {
    let headroom = figures
        .revenue
        .saturating_sub(figures.variable_cost)
        .saturating_sub(figures.labor_cost)
        .max(Decimal::ZERO);
    safe_div(headroom, figures.monthly_leads)
}

fn finish_line(line: BusinessLine, category: &Category, figures: &LineFigures, derived_cost: Money) -> LineResult {
    let promo_cost = derived_cost.saturating_mul(figures.monthly_leads);
    let total_cost = saturating_sum([promo_cost, figures.labor_cost, figures.variable_cost]);
    LineResult {
        line,
        name: category.name.clone(),
        daily_leads: figures.daily_leads,
        monthly_leads: figures.monthly_leads,
        deals: figures.deals,
        revenue: figures.revenue,
        promo_cost,
        labor_cost: figures.labor_cost,
        other_costs: figures.variable_cost,
        total_cost,
        gross_profit: figures.revenue.saturating_sub(total_cost),
        roi: safe_div(figures.revenue, promo_cost),
        derived_cost,
        exact_insales_headcount: figures.exact_headcount,
        insales_headcount: figures.headcount,
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Compute the monthly profit-and-loss projection for one parameter set.
///
/// Pure and total: every non-positive denominator resolves to zero and
/// every figure too large for `Decimal` saturates at its bound, so any
/// numeric input produces a result.
pub fn evaluate(params: &BusinessParameters) -> ProfitResult {
    let total_daily_leads = params.total_daily_leads;

    let daily_promo = params.avg_cost_per_lead.saturating_mul(total_daily_leads);
    let total_monthly_promo_cost = daily_promo.saturating_mul(DAYS_PER_MONTH);

    let daily_consults = if total_daily_leads > Decimal::ZERO {
        safe_div(total_daily_leads, params.presales.lead_rate)
    } else {
        Decimal::ZERO
    };
    let (exact_presales_headcount, presales_headcount) =
        staff_headcount(daily_consults, params.presales.capacity);

    let pools = SharedPools {
        total_daily_leads,
        presales_labor: presales_headcount.saturating_mul(params.presales.salary),
        promo_labor: params.promo_labor_cost,
        top_management: params
            .management
            .top_managers
            .saturating_mul(params.management.top_salary),
        center_salary: params.management.center_salary,
        insales_salary: params.insales_salary,
    };

    let cats = &params.categories;
    let wuchuang = line_figures(&cats.wuchuang, total_daily_leads, &pools);
    let geren = line_figures(&cats.geren, total_daily_leads, &pools);
    let sifa = line_figures(&cats.sifa, total_daily_leads, &pools);

    // --- Judicial line: break-even pricing ---
    let recommended_sifa_cost = break_even_cost(&sifa);
    let sifa_cost = match params.cost_ratio.sifa_cost {
        SifaCostMode::Manual(cost) => cost,
        SifaCostMode::Auto => {
            recommended_sifa_cost.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        }
    };

    // --- Ratio-split lines share what is left ---
    let remaining_promo_budget =
        total_monthly_promo_cost.saturating_sub(sifa_cost.saturating_mul(sifa.monthly_leads));
    let split = split_remaining_budget(
        remaining_promo_budget,
        params.cost_ratio.wuchuang,
        params.cost_ratio.geren,
        wuchuang.monthly_leads,
        geren.monthly_leads,
    );

    let wuchuang = finish_line(BusinessLine::Wuchuang, &cats.wuchuang, &wuchuang, split.wuchuang);
    let geren = finish_line(BusinessLine::Geren, &cats.geren, &geren, split.geren);
    let sifa = finish_line(BusinessLine::Sifa, &cats.sifa, &sifa, sifa_cost);

    let lines = [&wuchuang, &geren, &sifa];
    let revenue: Money = saturating_sum(lines.iter().map(|l| l.revenue));
    let labor_cost: Money = saturating_sum(lines.iter().map(|l| l.labor_cost));
    let other_costs: Money = saturating_sum(lines.iter().map(|l| l.other_costs));
    let insales_headcount = saturating_sum(lines.iter().map(|l| l.insales_headcount));
    let total_cost = saturating_sum([total_monthly_promo_cost, labor_cost, other_costs]);

    let total = TotalResult {
        name: "Total".to_string(),
        revenue,
        promo_cost: total_monthly_promo_cost,
        labor_cost,
        other_costs,
        total_cost,
        gross_profit: revenue.saturating_sub(total_cost),
        roi: safe_div(revenue, total_monthly_promo_cost),
        exact_presales_headcount,
        presales_headcount,
        insales_headcount,
        recommended_sifa_cost,
        remaining_promo_budget,
    };

    ProfitResult {
        wuchuang,
        geren,
        sifa,
        total,
    }
}

/// Evaluate the projection and wrap it with methodology, assumptions and
/// consistency warnings.
pub fn analyze_profit(params: &BusinessParameters) -> ComputationOutput<ProfitResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let ratio_sum = params.categories.lead_ratio_sum();
    if ratio_sum != Decimal::ONE {
        warnings.push(format!(
            "Lead ratios sum to {ratio_sum}, not 1; line volumes do not add up to total_daily_leads"
        ));
    }
    if params.cost_ratio.geren <= Decimal::ZERO {
        warnings.push(
            "cost_ratio.geren is not positive; ratio-split lines receive no promotion cost".to_string(),
        );
    }

    let result = evaluate(params);

    if result.total.remaining_promo_budget <= Decimal::ZERO {
        warnings.push(format!(
            "Judicial promotion spend exhausts the shared budget (remaining {}); \
             ratio-split lines receive no promotion cost",
            result.total.remaining_promo_budget.round_dp(2)
        ));
    }
    if let SifaCostMode::Manual(cost) = params.cost_ratio.sifa_cost {
        if cost > result.total.recommended_sifa_cost {
            warnings.push(format!(
                "Manual judicial cost {cost} is above the break-even cost {}; the line runs at a loss",
                result.total.recommended_sifa_cost.round_dp(1)
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Monthly P&L with break-even judicial pricing and weighted promotion split",
        &serde_json::json!({
            "days_per_month": DAYS_PER_MONTH.to_string(),
            "headcount_buffer": HEADCOUNT_BUFFER.to_string(),
            "avg_cost_per_lead": params.avg_cost_per_lead.to_string(),
            "total_daily_leads": params.total_daily_leads.to_string(),
            "sifa_cost": params.cost_ratio.sifa_cost,
        }),
        warnings,
        elapsed,
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profit::params::BusinessParameters;

    fn tolerance() -> Decimal {
        dec!(0.000001)
    }

    #[test]
    fn test_monthly_promo_budget_matches_inputs() {
        // 280 * 200 * 30
        let result = evaluate(&BusinessParameters::default());
        assert_eq!(result.total.promo_cost, dec!(1680000));
    }

    #[test]
    fn test_monthly_leads_follow_lead_ratios() {
        let result = evaluate(&BusinessParameters::default());
        assert_eq!(result.wuchuang.monthly_leads, dec!(1200));
        assert_eq!(result.geren.monthly_leads, dec!(3600));
        assert_eq!(result.sifa.monthly_leads, dec!(1200));
    }

    #[test]
    fn test_revenue_per_line() {
        let result = evaluate(&BusinessParameters::default());
        // 1200 * 0.3 * 2500
        assert_eq!(result.wuchuang.revenue, dec!(900000));
        // 3600 * 0.26 * 1500
        assert_eq!(result.geren.revenue, dec!(1404000));
        // 1200 * 0.26 * 2500
        assert_eq!(result.sifa.revenue, dec!(780000));
        assert_eq!(result.total.revenue, dec!(3084000));
    }

    #[test]
    fn test_variable_costs_by_lab_cost_mode() {
        let result = evaluate(&BusinessParameters::default());
        // 360 deals * 600 + 900000 * 0.05 + 360 * 230
        assert_eq!(result.wuchuang.other_costs, dec!(343800));
        // 936 deals * 345 + 1404000 * 0.05 + 936 * 75
        assert_eq!(result.geren.other_costs, dec!(463320));
        // 780000 * 0.6 + 780000 * 0.05 + 0
        assert_eq!(result.sifa.other_costs, dec!(507000));
    }

    #[test]
    fn test_headcounts() {
        let result = evaluate(&BusinessParameters::default());
        // 200 / 0.2 = 1000 consults; 1000 / 180 * 1.4 = 7.77.. -> 8
        assert_eq!(result.total.presales_headcount, dec!(8));
        // 40 / 7 * 1.4 = 8
        assert_eq!(result.wuchuang.insales_headcount, dec!(8));
        // 120 / 12 * 1.4 = 14
        assert_eq!(result.geren.insales_headcount, dec!(14));
        // 40 / 9 * 1.4 = 6.22.. -> 7
        assert_eq!(result.sifa.insales_headcount, dec!(7));
        assert_eq!(result.total.insales_headcount, dec!(29));
    }

    #[test]
    fn test_labor_cost_allocation() {
        let result = evaluate(&BusinessParameters::default());
        // in-sales 7 * 5000 = 35000
        // pre-sales 8 * 4500 = 36000 * 0.2 = 7200
        // promo labor 40000 * 0.2 = 8000
        // center 1 * 11000 + top 30000 * 0.2 = 17000
        assert_eq!(result.sifa.labor_cost, dec!(67200));
    }

    #[test]
    fn test_recommended_sifa_cost_is_break_even() {
        let result = evaluate(&BusinessParameters::default());
        // (780000 - 507000 - 67200) / 1200 = 171.5
        assert_eq!(result.total.recommended_sifa_cost, dec!(171.5));
        assert_eq!(result.sifa.derived_cost, dec!(171.5));
        assert_eq!(result.sifa.gross_profit, Decimal::ZERO);
    }

    #[test]
    fn test_auto_sifa_cost_rounds_to_one_decimal() {
        let mut params = BusinessParameters::default();
        params.categories.sifa.unit_price = dec!(2501);
        let result = evaluate(&params);
        let recommended = result.total.recommended_sifa_cost;
        assert_eq!(
            result.sifa.derived_cost,
            recommended.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        );
        assert!(result.sifa.derived_cost.scale() <= 1);
    }

    #[test]
    fn test_recommended_sifa_cost_floors_at_zero() {
        let mut params = BusinessParameters::default();
        params.categories.sifa.lab_cost = LabCost::RevenueShare(dec!(1.5));
        let result = evaluate(&params);
        assert_eq!(result.total.recommended_sifa_cost, Decimal::ZERO);
        assert_eq!(result.sifa.derived_cost, Decimal::ZERO);
        assert_eq!(result.sifa.roi, Decimal::ZERO);
    }

    #[test]
    fn test_manual_sifa_cost_overrides_recommendation() {
        let mut params = BusinessParameters::default();
        params.cost_ratio.sifa_cost = SifaCostMode::Manual(dec!(200));
        let result = evaluate(&params);
        assert_eq!(result.sifa.derived_cost, dec!(200));
        assert_eq!(result.sifa.promo_cost, dec!(240000));
        // recommendation is still reported
        assert_eq!(result.total.recommended_sifa_cost, dec!(171.5));
        assert_eq!(result.total.remaining_promo_budget, dec!(1440000));
    }

    #[test]
    fn test_weighted_split_exhausts_remaining_budget() {
        let result = evaluate(&BusinessParameters::default());
        let remaining = result.total.remaining_promo_budget;
        // 1680000 - 171.5 * 1200
        assert_eq!(remaining, dec!(1474200));
        let spent = result.wuchuang.derived_cost * result.wuchuang.monthly_leads
            + result.geren.derived_cost * result.geren.monthly_leads;
        assert!((spent - remaining).abs() < tolerance());
        // 3:2 weights
        let ratio = result.wuchuang.derived_cost / result.geren.derived_cost;
        assert!((ratio - dec!(1.5)).abs() < tolerance());
    }

    #[test]
    fn test_line_promo_costs_match_total_budget() {
        let result = evaluate(&BusinessParameters::default());
        let line_promo: Decimal = result.lines().iter().map(|l| l.promo_cost).sum();
        assert!((line_promo - result.total.promo_cost).abs() < tolerance());
    }

    #[test]
    fn test_split_zero_when_budget_exhausted() {
        let split = split_remaining_budget(dec!(-10), dec!(3), dec!(2), dec!(100), dec!(100));
        assert_eq!(split.wuchuang, Decimal::ZERO);
        assert_eq!(split.geren, Decimal::ZERO);

        let split = split_remaining_budget(Decimal::ZERO, dec!(3), dec!(2), dec!(100), dec!(100));
        assert_eq!(split.wuchuang, Decimal::ZERO);
    }

    #[test]
    fn test_split_zero_without_weighted_volume() {
        let split = split_remaining_budget(dec!(1000), dec!(3), dec!(2), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(split.wuchuang, Decimal::ZERO);
        assert_eq!(split.geren, Decimal::ZERO);
    }

    #[test]
    fn test_split_zero_for_non_positive_geren_weight() {
        let split = split_remaining_budget(dec!(1000), dec!(3), Decimal::ZERO, dec!(10), dec!(10));
        assert_eq!(split.wuchuang, Decimal::ZERO);
        assert_eq!(split.geren, Decimal::ZERO);
    }

    #[test]
    fn test_split_zero_wuchuang_weight_gives_all_to_geren() {
        let split = split_remaining_budget(dec!(1000), Decimal::ZERO, dec!(2), dec!(10), dec!(50));
        assert_eq!(split.wuchuang, Decimal::ZERO);
        assert_eq!(split.geren, dec!(20));
    }

    #[test]
    fn test_roi_is_revenue_over_promo() {
        let result = evaluate(&BusinessParameters::default());
        assert_eq!(result.total.roi, dec!(3084000) / dec!(1680000));
        assert_eq!(result.sifa.roi, dec!(780000) / dec!(205800));
    }

    #[test]
    fn test_zero_leads_is_all_zero_and_total() {
        let mut params = BusinessParameters::default();
        params.total_daily_leads = Decimal::ZERO;
        let result = evaluate(&params);
        assert_eq!(result.total.revenue, Decimal::ZERO);
        assert_eq!(result.total.promo_cost, Decimal::ZERO);
        assert_eq!(result.total.roi, Decimal::ZERO);
        assert_eq!(result.total.presales_headcount, Decimal::ZERO);
        assert_eq!(result.total.recommended_sifa_cost, Decimal::ZERO);
        for line in result.lines() {
            assert_eq!(line.derived_cost, Decimal::ZERO);
            assert_eq!(line.insales_headcount, Decimal::ZERO);
        }
        // center managers are still paid; top management has no lead-share to land on
        assert_eq!(result.total.labor_cost, dec!(55000));
    }

    #[test]
    fn test_non_positive_capacities_and_rates_do_not_fail() {
        let mut params = BusinessParameters::default();
        params.presales.capacity = Decimal::ZERO;
        params.presales.lead_rate = dec!(-0.5);
        params.categories.wuchuang.capacity = dec!(-1);
        params.categories.geren.capacity = Decimal::ZERO;
        let result = evaluate(&params);
        assert_eq!(result.total.presales_headcount, Decimal::ZERO);
        assert_eq!(result.total.exact_presales_headcount, Decimal::ZERO);
        assert_eq!(result.wuchuang.insales_headcount, Decimal::ZERO);
        assert_eq!(result.geren.insales_headcount, Decimal::ZERO);
    }

    #[test]
    fn test_staff_headcount_buffer() {
        let (exact, rounded) = staff_headcount(dec!(100), dec!(10));
        assert_eq!(exact, dec!(14));
        assert_eq!(rounded, dec!(14));
        let (_, rounded) = staff_headcount(dec!(1), dec!(10));
        assert_eq!(rounded, dec!(1));
        let (exact, rounded) = staff_headcount(dec!(100), Decimal::ZERO);
        assert_eq!(exact, Decimal::ZERO);
        assert_eq!(rounded, Decimal::ZERO);
    }

    #[test]
    fn test_staff_headcount_beyond_u32_range() {
        // 1e10 * 1.4 heads at one lead each
        let (exact, rounded) = staff_headcount(dec!(10_000_000_000), dec!(1));
        assert_eq!(exact, dec!(14_000_000_000));
        assert_eq!(rounded, dec!(14_000_000_000));
    }

    #[test]
    fn test_split_with_tiny_geren_weight() {
        let split = split_remaining_budget(dec!(1000), dec!(1000), Decimal::new(1, 28), dec!(10), dec!(10));
        assert!(split.geren >= Decimal::ZERO);
        assert!(split.geren < dec!(0.000001));
        // the whole budget lands on the ten wuchuang leads
        assert!((split.wuchuang - dec!(100)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let params = BusinessParameters::default();
        assert_eq!(evaluate(&params), evaluate(&params));
    }

    #[test]
    fn test_analyze_profit_warns_on_ratio_mismatch() {
        let params = BusinessParameters::default().with_lead_ratio(BusinessLine::Geren, dec!(0.9));
        let output = analyze_profit(&params);
        assert!(output.warnings.iter().any(|w| w.contains("Lead ratios sum to")));
    }

    #[test]
    fn test_analyze_profit_warns_on_exhausted_budget() {
        let mut params = BusinessParameters::default();
        params.cost_ratio.sifa_cost = SifaCostMode::Manual(dec!(5000));
        let output = analyze_profit(&params);
        assert!(output.warnings.iter().any(|w| w.contains("exhausts the shared budget")));
        assert!(output.warnings.iter().any(|w| w.contains("runs at a loss")));
        assert_eq!(output.result.wuchuang.derived_cost, Decimal::ZERO);
        assert_eq!(output.result.geren.derived_cost, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_profit_clean_defaults() {
        let output = analyze_profit(&BusinessParameters::default());
        assert!(output.warnings.is_empty(), "{:?}", output.warnings);
        assert_eq!(output.result, evaluate(&BusinessParameters::default()));
    }
}
