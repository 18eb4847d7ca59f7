use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::profit::model::ProfitResult;
use crate::profit::params::BusinessParameters;
use crate::types::Money;

/// A saved `{parameters, result}` pair with the headline figures pulled out
/// for listing and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in epoch milliseconds, strictly increasing within a log
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub avg_cost_per_lead: Money,
    pub total_daily_leads: Decimal,
    pub monthly_promo: Money,
    pub total_revenue: Money,
    pub total_gross_profit: Money,
    pub total_roi: Decimal,
    pub wuchuang_cost: Money,
    pub geren_cost: Money,
    pub sifa_cost: Money,
    pub params_snapshot: BusinessParameters,
    pub result_snapshot: ProfitResult,
}

/// Ordered, append-only list of snapshots. Entries can be removed one at a
/// time or all at once but never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Snapshot the current parameters and result, stamped now.
    pub fn append(
        &mut self,
        label: Option<String>,
        params: &BusinessParameters,
        result: &ProfitResult,
    ) -> &HistoryEntry {
        self.append_at(Utc::now(), label, params, result)
    }

    pub fn append_at(
        &mut self,
        timestamp: DateTime<Utc>,
        label: Option<String>,
        params: &BusinessParameters,
        result: &ProfitResult,
    ) -> &HistoryEntry {
        let millis = timestamp.timestamp_millis();
        let id = match self.entries.last() {
            Some(last) if last.id >= millis => last.id + 1,
            _ => millis,
        };
        self.entries.push(HistoryEntry {
            id,
            label,
            timestamp,
            avg_cost_per_lead: params.avg_cost_per_lead,
            total_daily_leads: params.total_daily_leads,
            monthly_promo: result.total.promo_cost,
            total_revenue: result.total.revenue,
            total_gross_profit: result.total.gross_profit,
            total_roi: result.total.roi,
            wuchuang_cost: result.wuchuang.derived_cost,
            geren_cost: result.geren.derived_cost,
            sifa_cost: result.sifa.derived_cost,
            params_snapshot: params.clone(),
            result_snapshot: result.clone(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Remove one entry. Returns false when no entry has that id.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
