use leadgen_pnl_core::profit::model::{split_remaining_budget, staff_headcount};
use leadgen_pnl_core::profit::{
    analyze_profit, evaluate, BusinessLine, BusinessParameters, LabCost, SifaCostMode,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn tolerance() -> Decimal {
    dec!(0.0000001)
}

/// A spread of consistent parameter sets (ratios summing to one).
fn scenarios() -> Vec<BusinessParameters> {
    let base = BusinessParameters::default();
    let mut out = vec![base.clone()];
    for (cost, leads) in [(150, 80), (280, 200), (420, 350), (90, 10)] {
        out.push(BusinessParameters {
            avg_cost_per_lead: Decimal::from(cost),
            total_daily_leads: Decimal::from(leads),
            ..base.clone()
        });
    }
    out.push(base.clone().with_lead_ratio(BusinessLine::Wuchuang, dec!(0.35)));
    out.push(
        base.clone()
            .with_lead_ratio(BusinessLine::Geren, dec!(0.45))
            .with_unit_price(BusinessLine::Geren, dec!(1800)),
    );
    let mut manual = base.clone();
    manual.cost_ratio.sifa_cost = SifaCostMode::Manual(dec!(120));
    out.push(manual);
    out
}

// ===========================================================================
// End-to-end figures
// ===========================================================================

#[test]
fn test_default_scenario_end_to_end() {
    let params = BusinessParameters::default();
    let result = evaluate(&params);

    // 280 * 200 * 30
    assert_eq!(result.total.promo_cost, dec!(1_680_000));
    for line in BusinessLine::ALL {
        let ratio = params.categories.get(line).lead_ratio;
        assert_eq!(result.line(line).monthly_leads, dec!(200) * ratio * dec!(30));
    }

    // 1,680,000 - 171.5 * 1200
    assert_eq!(result.total.remaining_promo_budget, dec!(1_474_200));
    // 1,474,200 / (3600 + 1.5 * 1200) = 273, wuchuang = 273 * 1.5
    assert_eq!(result.geren.derived_cost, dec!(273));
    assert_eq!(result.wuchuang.derived_cost, dec!(409.5));
    assert_eq!(result.sifa.derived_cost, dec!(171.5));
}

#[test]
fn test_line_promo_costs_add_up_to_budget() {
    let result = evaluate(&BusinessParameters::default());
    let per_line: Decimal = result.lines().iter().map(|l| l.promo_cost).sum();
    assert_eq!(per_line, result.total.promo_cost);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_total_revenue_is_plain_sum() {
    for params in scenarios() {
        let result = evaluate(&params);
        let sum: Decimal = result.lines().iter().map(|l| l.revenue).sum();
        assert_eq!(sum, result.total.revenue);
    }
}

#[test]
fn test_split_exhausts_remaining_budget() {
    for params in scenarios() {
        let result = evaluate(&params);
        let remaining = result.total.remaining_promo_budget;
        let spent = result.wuchuang.derived_cost * result.wuchuang.monthly_leads
            + result.geren.derived_cost * result.geren.monthly_leads;
        if remaining > Decimal::ZERO {
            assert!(
                (spent - remaining).abs() < tolerance(),
                "spent {spent} vs remaining {remaining}"
            );
        } else {
            assert_eq!(result.wuchuang.derived_cost, Decimal::ZERO);
            assert_eq!(result.geren.derived_cost, Decimal::ZERO);
        }
    }
}

#[test]
fn test_split_honours_weight_ratio() {
    let split = split_remaining_budget(dec!(100_000), dec!(2), dec!(1), dec!(100), dec!(300));
    // geren = 100000 / (300 + 2 * 100) = 200
    assert_eq!(split.geren, dec!(200));
    assert_eq!(split.wuchuang, dec!(400));
}

#[test]
fn test_split_zero_when_nothing_to_split() {
    let zero = Decimal::ZERO;
    let none = split_remaining_budget(dec!(-5), dec!(1.5), dec!(1), dec!(100), dec!(100));
    assert_eq!((none.wuchuang, none.geren), (zero, zero));

    let no_volume = split_remaining_budget(dec!(5000), dec!(1.5), dec!(1), zero, zero);
    assert_eq!((no_volume.wuchuang, no_volume.geren), (zero, zero));

    let no_weight = split_remaining_budget(dec!(5000), dec!(1.5), zero, dec!(100), dec!(100));
    assert_eq!((no_weight.wuchuang, no_weight.geren), (zero, zero));
}

#[test]
fn test_recommended_sifa_cost_never_negative() {
    let mut params = BusinessParameters::default();
    for price in [100, 500, 1000, 2500, 6000] {
        params.categories.sifa.unit_price = Decimal::from(price);
        let result = evaluate(&params);
        assert!(result.total.recommended_sifa_cost >= Decimal::ZERO);
    }
    params.categories.sifa.unit_price = dec!(100);
    assert_eq!(evaluate(&params).total.recommended_sifa_cost, Decimal::ZERO);
}

#[test]
fn test_headcount_at_least_plain_ceiling() {
    for capacity in [dec!(1), dec!(7), dec!(9), dec!(12), dec!(180)] {
        for load in [
            dec!(0),
            dec!(1),
            dec!(40),
            dec!(120),
            dec!(1000),
            dec!(333.3),
            dec!(5_000_000_000),
        ] {
            let (_, rounded) = staff_headcount(load, capacity);
            let plain = (load / capacity).ceil();
            assert!(rounded >= plain, "load {load} capacity {capacity}");
            assert_eq!(rounded, rounded.trunc());
        }
    }
}

#[test]
fn test_headcount_zero_for_non_positive_capacity() {
    assert_eq!(staff_headcount(dec!(50), Decimal::ZERO), (Decimal::ZERO, Decimal::ZERO));
    assert_eq!(staff_headcount(dec!(50), dec!(-3)), (Decimal::ZERO, Decimal::ZERO));
}

#[test]
fn test_large_headcount_is_still_paid() {
    let mut params = BusinessParameters::default();
    params.total_daily_leads = dec!(10_000_000_000);
    params.categories.geren.capacity = dec!(1);
    let result = evaluate(&params);
    // 1e10 * 0.6 * 1.4
    assert_eq!(result.geren.insales_headcount, dec!(8_400_000_000));
    assert!(result.total.presales_headcount > Decimal::ZERO);
    assert!(result.geren.labor_cost >= dec!(8_400_000_000) * params.insales_salary);
}

#[test]
fn test_evaluate_is_idempotent() {
    for params in scenarios() {
        assert_eq!(evaluate(&params), evaluate(&params));
    }
}

// ===========================================================================
// Degenerate inputs
// ===========================================================================

#[test]
fn test_zero_everything_does_not_panic() {
    let mut params = BusinessParameters::default();
    params.total_daily_leads = Decimal::ZERO;
    params.presales.capacity = Decimal::ZERO;
    params.presales.lead_rate = Decimal::ZERO;
    for line in BusinessLine::ALL {
        params.categories.get_mut(line).capacity = dec!(-1);
    }
    let result = evaluate(&params);
    assert_eq!(result.total.revenue, Decimal::ZERO);
    assert_eq!(result.total.roi, Decimal::ZERO);
    assert_eq!(result.total.presales_headcount, Decimal::ZERO);
    assert_eq!(result.total.insales_headcount, Decimal::ZERO);
    assert_eq!(result.total.recommended_sifa_cost, Decimal::ZERO);
}

#[test]
fn test_tiny_presales_lead_rate_saturates() {
    let mut params = BusinessParameters::default();
    params.presales.lead_rate = Decimal::new(1, 28);
    let result = evaluate(&params);
    assert_eq!(result.total.exact_presales_headcount, Decimal::MAX / dec!(180));
    assert!(result.total.presales_headcount > dec!(1_000_000_000_000));
    // pre-sales labor swamps everything else
    assert!(result.total.gross_profit < Decimal::ZERO);
    assert_eq!(result.total.recommended_sifa_cost, Decimal::ZERO);
}

#[test]
fn test_tiny_geren_weight_sends_budget_to_wuchuang() {
    let mut params = BusinessParameters::default();
    params.cost_ratio.geren = Decimal::new(1, 28);
    params.cost_ratio.wuchuang = dec!(1000);
    let result = evaluate(&params);
    assert!(result.geren.derived_cost >= Decimal::ZERO);
    assert!(result.geren.derived_cost < dec!(0.000001));
    // nearly all of the 1,474,200 lands on the 1200 wuchuang leads
    assert!((result.wuchuang.promo_cost - dec!(1_474_200)).abs() < dec!(1));
}

#[test]
fn test_extreme_volumes_and_costs_saturate() {
    let mut params = BusinessParameters::default();
    params.avg_cost_per_lead = dec!(1_000_000_000_000_000);
    params.total_daily_leads = dec!(100_000_000_000_000);
    let result = evaluate(&params);
    assert_eq!(result.total.promo_cost, Decimal::MAX);
    assert_eq!(result.total.total_cost, Decimal::MAX);
    assert!(result.total.gross_profit <= Decimal::ZERO);
    assert!(result.total.roi >= Decimal::ZERO);
}

#[test]
fn test_bound_magnitude_inputs_do_not_panic() {
    for magnitude in [Decimal::MAX, Decimal::MIN, Decimal::new(1, 28), Decimal::new(-1, 28)] {
        let mut params = BusinessParameters::default();
        params.avg_cost_per_lead = magnitude;
        params.total_daily_leads = magnitude;
        params.insales_salary = magnitude;
        params.presales.salary = magnitude;
        params.presales.lead_rate = magnitude;
        params.cost_ratio.wuchuang = magnitude;
        params.cost_ratio.geren = magnitude;
        for line in BusinessLine::ALL {
            let category = params.categories.get_mut(line);
            category.unit_price = magnitude;
            category.capacity = magnitude;
            category.lead_ratio = magnitude;
        }
        let output = analyze_profit(&params);
        assert!(output.result.total.presales_headcount >= Decimal::ZERO);
        assert!(output.result.total.recommended_sifa_cost >= Decimal::ZERO);
    }
}

#[test]
fn test_manual_sifa_cost_above_break_even_loses_money() {
    let mut params = BusinessParameters::default();
    params.cost_ratio.sifa_cost = SifaCostMode::Manual(dec!(200));
    let output = analyze_profit(&params);
    // (171.5 - 200) * 1200
    assert_eq!(output.result.sifa.gross_profit, dec!(-34_200));
    assert!(output.warnings.iter().any(|w| w.contains("runs at a loss")));
}

#[test]
fn test_sifa_spend_exhausting_budget_zeroes_split() {
    let mut params = BusinessParameters::default();
    params.cost_ratio.sifa_cost = SifaCostMode::Manual(dec!(1500));
    let output = analyze_profit(&params);
    assert!(output.result.total.remaining_promo_budget < Decimal::ZERO);
    assert_eq!(output.result.wuchuang.derived_cost, Decimal::ZERO);
    assert_eq!(output.result.geren.derived_cost, Decimal::ZERO);
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("exhausts the shared budget")));
}

#[test]
fn test_revenue_share_lab_cost_on_any_line() {
    let mut params = BusinessParameters::default();
    params.categories.wuchuang.lab_cost = LabCost::RevenueShare(dec!(0.2));
    let result = evaluate(&params);
    // 900000 * 0.2 + 900000 * 0.05 + 360 * 230
    assert_eq!(result.wuchuang.other_costs, dec!(307_800));
}

#[test]
fn test_inconsistent_ratios_are_flagged_not_fixed() {
    let mut params = BusinessParameters::default();
    params.categories.geren.lead_ratio = dec!(0.7);
    let output = analyze_profit(&params);
    assert_eq!(output.result.geren.monthly_leads, dec!(4200));
    assert!(output.warnings.iter().any(|w| w.contains("Lead ratios sum to")));
}
