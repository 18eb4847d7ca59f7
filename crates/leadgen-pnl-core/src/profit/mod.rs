pub mod model;
pub mod params;

pub use model::{analyze_profit, evaluate, LineResult, ProfitResult, TotalResult};
pub use params::{BusinessLine, BusinessParameters, LabCost, SifaCostMode};
