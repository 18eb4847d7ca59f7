use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::profit::model::evaluate;
use crate::profit::params::{BusinessLine, BusinessParameters, LabCost};
use crate::types::{safe_div, with_metadata, ComputationOutput, Money, Rate};

/// Spacing of both grid axes.
pub const MATRIX_STEP: Decimal = dec!(10);

/// Most values one axis may hold; wider ranges are cut off at this count.
pub const MAX_AXIS_POINTS: usize = 200;

/// Half-width of the default grid around the current parameters.
const DEFAULT_HALF_SPAN: Decimal = dec!(50);

/// Bounds and overrides of a break-even matrix scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Lowest blended cost per lead (inclusive)
    pub cost_min: Money,
    /// Highest blended cost per lead (inclusive)
    pub cost_max: Money,
    /// Lowest daily lead volume (inclusive)
    pub leads_min: Decimal,
    /// Highest daily lead volume (inclusive)
    pub leads_max: Decimal,
    pub wuchuang_conv_rate: Rate,
    pub geren_conv_rate: Rate,
    pub sifa_conv_rate: Rate,
    pub wuchuang_unit_price: Money,
    pub geren_unit_price: Money,
    pub sifa_unit_price: Money,
    /// Force the per-deal lab cost of the two ratio-split lines to their floor prices
    #[serde(default)]
    pub use_floor_lab_cost: bool,
    /// Corporate overhead deducted from every cell's profit
    #[serde(default)]
    pub group_cost_share: Money,
}

impl GridConfig {
    /// Grid spanning ±50 around the current cost and volume (snapped down
    /// to the step, lower bounds no less than 10), with every override
    /// taken from the current parameters.
    pub fn centered_on(params: &BusinessParameters) -> Self {
        let snap = |v: Decimal| (v / MATRIX_STEP).floor().saturating_mul(MATRIX_STEP);
        let cost = snap(params.avg_cost_per_lead);
        let leads = snap(params.total_daily_leads);
        let cats = &params.categories;
        Self {
            cost_min: cost.saturating_sub(DEFAULT_HALF_SPAN).max(MATRIX_STEP),
            cost_max: cost.saturating_add(DEFAULT_HALF_SPAN),
            leads_min: leads.saturating_sub(DEFAULT_HALF_SPAN).max(MATRIX_STEP),
            leads_max: leads.saturating_add(DEFAULT_HALF_SPAN),
            wuchuang_conv_rate: cats.wuchuang.conv_rate,
            geren_conv_rate: cats.geren.conv_rate,
            sifa_conv_rate: cats.sifa.conv_rate,
            wuchuang_unit_price: cats.wuchuang.unit_price,
            geren_unit_price: cats.geren.unit_price,
            sifa_unit_price: cats.sifa.unit_price,
            use_floor_lab_cost: false,
            group_cost_share: Decimal::ZERO,
        }
    }

    pub fn conv_rate(&self, line: BusinessLine) -> Rate {
        match line {
            BusinessLine::Wuchuang => self.wuchuang_conv_rate,
            BusinessLine::Geren => self.geren_conv_rate,
            BusinessLine::Sifa => self.sifa_conv_rate,
        }
    }

    pub fn unit_price(&self, line: BusinessLine) -> Money {
        match line {
            BusinessLine::Wuchuang => self.wuchuang_unit_price,
            BusinessLine::Geren => self.geren_unit_price,
            BusinessLine::Sifa => self.sifa_unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub cost: Money,
    pub leads: Decimal,
    /// Total gross profit less the group cost share
    pub profit: Money,
    pub roi: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub leads: Decimal,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Cost value of each column, ascending
    pub columns: Vec<Money>,
    /// One row per daily lead volume, ascending
    pub rows: Vec<MatrixRow>,
    /// Cell closest to zero profit in each row
    pub break_even_cells: Vec<MatrixCell>,
}

/// Input envelope for a scan: base parameters plus an optional grid
/// (defaults to `GridConfig::centered_on(base_params)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixInput {
    pub base_params: BusinessParameters,
    #[serde(default)]
    pub grid: Option<GridConfig>,
}

/// Inclusive sweep from min to max in fixed steps, at most
/// `MAX_AXIS_POINTS` long; empty when max < min.
fn sweep_values(min: Decimal, max: Decimal) -> Vec<Decimal> {
    let mut values = Vec::new();
    let mut current = min;
    while current <= max && values.len() < MAX_AXIS_POINTS {
        values.push(current);
        current = match current.checked_add(MATRIX_STEP) {
            Some(next) => next,
            None => break,
        };
    }
    values
}

/// Number of values an uncapped sweep over `[min, max]` would hold.
fn requested_points(min: Decimal, max: Decimal) -> Decimal {
    if max < min {
        return Decimal::ZERO;
    }
    safe_div(max.saturating_sub(min), MATRIX_STEP)
        .floor()
        .saturating_add(Decimal::ONE)
}

/// Base parameters with the grid's per-line overrides applied. Processing
/// fees follow the overridden unit prices.
fn scenario_parameters(base: &BusinessParameters, grid: &GridConfig) -> BusinessParameters {
    let mut params = base.clone();
    for line in BusinessLine::ALL {
        let category = params.categories.get_mut(line);
        category.conv_rate = grid.conv_rate(line);
        category.unit_price = grid.unit_price(line);
        if let Some(fee) = line.derived_process_cost(category.unit_price) {
            category.process_cost = fee;
        }
        if grid.use_floor_lab_cost {
            if let Some(floor) = line.floor_lab_cost() {
                category.lab_cost = LabCost::PerDeal(floor);
            }
        }
    }
    params
}

/// First cell with the smallest absolute profit; a later cell must be
/// strictly closer to zero to replace it.
fn closest_to_zero(cells: &[MatrixCell]) -> Option<&MatrixCell> {
    let mut best: Option<&MatrixCell> = None;
    for cell in cells {
        match best {
            Some(b) if cell.profit.abs() >= b.profit.abs() => {}
            _ => best = Some(cell),
        }
    }
    best
}

/// Evaluate the profit model at every (cost, leads) grid point and pick the
/// break-even cell of each lead-volume row.
pub fn scan(base: &BusinessParameters, grid: &GridConfig) -> Matrix {
    let columns = sweep_values(grid.cost_min, grid.cost_max);
    let lead_values = sweep_values(grid.leads_min, grid.leads_max);
    let mut params = scenario_parameters(base, grid);

    let mut rows = Vec::with_capacity(lead_values.len());
    let mut break_even_cells = Vec::with_capacity(lead_values.len());

    for &leads in &lead_values {
        params.total_daily_leads = leads;
        let mut cells = Vec::with_capacity(columns.len());
        for &cost in &columns {
            params.avg_cost_per_lead = cost;
            let result = evaluate(&params);
            cells.push(MatrixCell {
                cost,
                leads,
                profit: result.total.gross_profit.saturating_sub(grid.group_cost_share),
                roi: result.total.roi,
            });
        }
        if let Some(cell) = closest_to_zero(&cells) {
            break_even_cells.push(cell.clone());
        }
        rows.push(MatrixRow { leads, cells });
    }

    Matrix {
        columns,
        rows,
        break_even_cells,
    }
}

/// Run a matrix scan and wrap it with methodology, assumptions and warnings.
pub fn run_matrix_scan(input: &MatrixInput) -> ComputationOutput<Matrix> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let grid = input
        .grid
        .clone()
        .unwrap_or_else(|| GridConfig::centered_on(&input.base_params));

    if grid.cost_max < grid.cost_min {
        warnings.push(format!(
            "cost range is inverted ({} > {}); the matrix has no columns",
            grid.cost_min, grid.cost_max
        ));
    }
    if grid.leads_max < grid.leads_min {
        warnings.push(format!(
            "lead range is inverted ({} > {}); the matrix has no rows",
            grid.leads_min, grid.leads_max
        ));
    }
    let cap = Decimal::from(MAX_AXIS_POINTS);
    for (axis, min, max) in [
        ("cost", grid.cost_min, grid.cost_max),
        ("lead", grid.leads_min, grid.leads_max),
    ] {
        let requested = requested_points(min, max);
        if requested > cap {
            warnings.push(format!(
                "{axis} range asks for {requested} values; only the first {MAX_AXIS_POINTS} are scanned"
            ));
        }
    }

    let matrix = scan(&input.base_params, &grid);

    let rows_without_crossing = matrix
        .rows
        .iter()
        .filter(|row| {
            row.cells.iter().all(|c| c.profit > Decimal::ZERO)
                || row.cells.iter().all(|c| c.profit < Decimal::ZERO)
        })
        .count();
    if !matrix.columns.is_empty() && rows_without_crossing > 0 {
        warnings.push(format!(
            "{rows_without_crossing} of {} rows never cross zero profit; \
             their break-even cell sits on the edge of the cost range",
            matrix.rows.len()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Break-even matrix over blended cost per lead x daily lead volume",
        &serde_json::json!({
            "step": MATRIX_STEP.to_string(),
            "cost_range": [grid.cost_min.to_string(), grid.cost_max.to_string()],
            "leads_range": [grid.leads_min.to_string(), grid.leads_max.to_string()],
            "use_floor_lab_cost": grid.use_floor_lab_cost,
            "group_cost_share": grid.group_cost_share.to_string(),
        }),
        warnings,
        elapsed,
        matrix,
    )
}
