use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LeadGenError;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Business lines
// ---------------------------------------------------------------------------

/// The three product lines sharing the paid-traffic funnel.
///
/// `Wuchuang` (non-invasive prenatal) and `Geren` (personal) receive their
/// per-lead promotion cost from the weighted budget split. `Sifa` (judicial)
/// is priced at its break-even acquisition cost unless manually overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessLine {
    Wuchuang,
    Geren,
    Sifa,
}

impl BusinessLine {
    pub const ALL: [BusinessLine; 3] = [BusinessLine::Wuchuang, BusinessLine::Geren, BusinessLine::Sifa];

    pub fn key(self) -> &'static str {
        match self {
            BusinessLine::Wuchuang => "wuchuang",
            BusinessLine::Geren => "geren",
            BusinessLine::Sifa => "sifa",
        }
    }

    /// True for the line whose cost comes from the break-even rule.
    pub fn is_break_even(self) -> bool {
        matches!(self, BusinessLine::Sifa)
    }

    /// Per-deal processing fee implied by a unit price, rounded to 2dp.
    /// `None` for the judicial line, whose fee is not price-linked.
    pub fn derived_process_cost(self, unit_price: Money) -> Option<Money> {
        let fee = match self {
            BusinessLine::Wuchuang => unit_price.saturating_mul(dec!(0.08)).saturating_add(dec!(30)),
            BusinessLine::Geren => unit_price.saturating_mul(dec!(0.03)).saturating_add(dec!(30)),
            BusinessLine::Sifa => return None,
        };
        Some(fee.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Floor per-deal lab cost used by the matrix "floor lab cost" mode.
    pub fn floor_lab_cost(self) -> Option<Money> {
        match self {
            BusinessLine::Wuchuang => Some(dec!(300)),
            BusinessLine::Geren => Some(dec!(230)),
            BusinessLine::Sifa => None,
        }
    }
}

impl fmt::Display for BusinessLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BusinessLine {
    type Err = LeadGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wuchuang" => Ok(BusinessLine::Wuchuang),
            "geren" => Ok(BusinessLine::Geren),
            "sifa" => Ok(BusinessLine::Sifa),
            other => Err(LeadGenError::UnknownLine(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter types
// ---------------------------------------------------------------------------

/// How a line's lab/processing cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabCost {
    /// Fixed amount per closed deal
    PerDeal(Money),
    /// Fraction of the line's revenue
    RevenueShare(Rate),
}

/// Per-lead acquisition cost of the judicial line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SifaCostMode {
    /// Use the computed break-even recommendation
    #[default]
    Auto,
    /// Operator-supplied cost per lead
    Manual(Money),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresalesTeam {
    /// Qualified conversations one pre-sales head handles per day
    pub capacity: Decimal,
    /// Fraction of raw leads that become a qualified conversation
    pub lead_rate: Rate,
    /// Monthly salary per head
    pub salary: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Management {
    pub top_managers: Decimal,
    pub top_salary: Money,
    /// Monthly salary of one department (center) manager
    pub center_salary: Money,
}

/// Relative acquisition-cost weights of the two ratio-split lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRatio {
    pub wuchuang: Decimal,
    pub geren: Decimal,
    #[serde(default)]
    pub sifa_cost: SifaCostMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Share of total daily leads routed to this line
    pub lead_ratio: Rate,
    pub conv_rate: Rate,
    pub unit_price: Money,
    /// Daily leads one in-sales head handles
    pub capacity: Decimal,
    pub center_managers: Decimal,
    /// Commission as a fraction of revenue
    pub var_cost_rate: Rate,
    /// Fixed processing fee per deal
    pub process_cost: Money,
    pub lab_cost: LabCost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub wuchuang: Category,
    pub geren: Category,
    pub sifa: Category,
}

impl Categories {
    pub fn get(&self, line: BusinessLine) -> &Category {
        match line {
            BusinessLine::Wuchuang => &self.wuchuang,
            BusinessLine::Geren => &self.geren,
            BusinessLine::Sifa => &self.sifa,
        }
    }

    pub fn get_mut(&mut self, line: BusinessLine) -> &mut Category {
        match line {
            BusinessLine::Wuchuang => &mut self.wuchuang,
            BusinessLine::Geren => &mut self.geren,
            BusinessLine::Sifa => &mut self.sifa,
        }
    }

    pub fn lead_ratio_sum(&self) -> Rate {
        self.wuchuang
            .lead_ratio
            .saturating_add(self.geren.lead_ratio)
            .saturating_add(self.sifa.lead_ratio)
    }
}

/// Complete input of one profit evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessParameters {
    /// Blended acquisition cost per raw lead
    pub avg_cost_per_lead: Money,
    /// Raw daily lead volume entering the funnel
    pub total_daily_leads: Decimal,
    pub presales: PresalesTeam,
    /// Monthly in-sales salary per head, shared by all lines
    pub insales_salary: Money,
    /// Promotional-labor pool, allocated by lead-share
    pub promo_labor_cost: Money,
    pub management: Management,
    pub cost_ratio: CostRatio,
    pub categories: Categories,
}

impl Default for BusinessParameters {
    fn default() -> Self {
        Self {
            avg_cost_per_lead: dec!(280),
            total_daily_leads: dec!(200),
            presales: PresalesTeam {
                capacity: dec!(180),
                lead_rate: dec!(0.2),
                salary: dec!(4500),
            },
            insales_salary: dec!(5000),
            promo_labor_cost: dec!(40000),
            management: Management {
                top_managers: dec!(2),
                top_salary: dec!(15000),
                center_salary: dec!(11000),
            },
            cost_ratio: CostRatio {
                wuchuang: dec!(3),
                geren: dec!(2),
                sifa_cost: SifaCostMode::Auto,
            },
            categories: Categories {
                wuchuang: Category {
                    name: "Non-invasive prenatal".to_string(),
                    lead_ratio: dec!(0.2),
                    conv_rate: dec!(0.3),
                    unit_price: dec!(2500),
                    capacity: dec!(7),
                    center_managers: dec!(1),
                    var_cost_rate: dec!(0.05),
                    process_cost: dec!(230),
                    lab_cost: LabCost::PerDeal(dec!(600)),
                },
                geren: Category {
                    name: "Personal".to_string(),
                    lead_ratio: dec!(0.6),
                    conv_rate: dec!(0.26),
                    unit_price: dec!(1500),
                    capacity: dec!(12),
                    center_managers: dec!(3),
                    var_cost_rate: dec!(0.05),
                    process_cost: dec!(75),
                    lab_cost: LabCost::PerDeal(dec!(345)),
                },
                sifa: Category {
                    name: "Judicial".to_string(),
                    lead_ratio: dec!(0.2),
                    conv_rate: dec!(0.26),
                    unit_price: dec!(2500),
                    capacity: dec!(9),
                    center_managers: dec!(1),
                    var_cost_rate: dec!(0.05),
                    process_cost: Decimal::ZERO,
                    lab_cost: LabCost::RevenueShare(dec!(0.6)),
                },
            },
        }
    }
}

impl BusinessParameters {
    /// Set one line's lead ratio. Changing either ratio-split line resets
    /// the judicial share to `1 - wuchuang - geren`, rounded to 4dp and
    /// floored at zero. The two edited shares are never re-normalized.
    pub fn with_lead_ratio(mut self, line: BusinessLine, ratio: Rate) -> Self {
        self.categories.get_mut(line).lead_ratio = ratio;
        if !line.is_break_even() {
            let rest = Decimal::ONE
                .saturating_sub(self.categories.wuchuang.lead_ratio)
                .saturating_sub(self.categories.geren.lead_ratio);
            let rest = rest.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
            self.categories.sifa.lead_ratio = rest.max(Decimal::ZERO);
        }
        self
    }

    /// Set one line's unit price, re-deriving its processing fee where the
    /// fee schedule is price-linked.
    pub fn with_unit_price(mut self, line: BusinessLine, price: Money) -> Self {
        let category = self.categories.get_mut(line);
        category.unit_price = price;
        if let Some(fee) = line.derived_process_cost(price) {
            category.process_cost = fee;
        }
        self
    }
}
