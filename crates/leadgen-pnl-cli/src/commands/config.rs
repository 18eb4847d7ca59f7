use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;

use leadgen_pnl_core::history::store::{
    load_parameters, restore_defaults, save_default_template, save_parameters,
};
use leadgen_pnl_core::history::KeyValueStore;
use leadgen_pnl_core::profit::{BusinessLine, BusinessParameters};

use crate::input;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the working configuration
    Show,
    /// Replace the working configuration from a file or stdin
    Set(SetArgs),
    /// Change one line's lead ratio (the judicial line absorbs the difference)
    SetLeadRatio(LeadRatioArgs),
    /// Change one line's unit price (processing fee follows)
    SetUnitPrice(UnitPriceArgs),
    /// Remember the working configuration as the default template
    SaveDefault,
    /// Reset the working configuration to the default template
    RestoreDefault,
}

#[derive(Args)]
pub struct SetArgs {
    /// Path to a JSON or YAML parameter file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct LeadRatioArgs {
    /// wuchuang, geren or sifa
    #[arg(long)]
    pub line: BusinessLine,

    /// Share of total daily leads, e.g. 0.25
    #[arg(long)]
    pub ratio: Decimal,
}

#[derive(Args)]
pub struct UnitPriceArgs {
    /// wuchuang, geren or sifa
    #[arg(long)]
    pub line: BusinessLine,

    #[arg(long)]
    pub price: Decimal,
}

pub fn run_config<S: KeyValueStore>(
    cmd: ConfigCommand,
    store: &mut S,
) -> Result<Value, Box<dyn std::error::Error>> {
    let params = match cmd {
        ConfigCommand::Show => load_parameters(&*store),
        ConfigCommand::Set(args) => {
            let params: BusinessParameters = if let Some(ref path) = args.input {
                input::file::read_input(path)?
            } else if let Some(data) = input::stdin::read_stdin()? {
                serde_json::from_value(data)?
            } else {
                return Err("--input <file> or stdin required for config set".into());
            };
            save_parameters(store, &params)?;
            params
        }
        ConfigCommand::SetLeadRatio(args) => {
            let params = load_parameters(&*store).with_lead_ratio(args.line, args.ratio);
            save_parameters(store, &params)?;
            params
        }
        ConfigCommand::SetUnitPrice(args) => {
            let params = load_parameters(&*store).with_unit_price(args.line, args.price);
            save_parameters(store, &params)?;
            params
        }
        ConfigCommand::SaveDefault => {
            let params = load_parameters(&*store);
            save_default_template(store, &params)?;
            params
        }
        ConfigCommand::RestoreDefault => restore_defaults(store)?,
    };
    Ok(serde_json::to_value(params)?)
}
