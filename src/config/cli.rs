use crate::core::selector::SelectionStrategy;
use crate::domain::model::RegionTag;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mealstretch")]
#[command(about = "Budget meal planner: stretch a grocery budget across a household")]
pub struct CliConfig {
    /// TOML 設定檔路徑（可選）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Pick meals offline and print them as JSON
    Plan {
        #[arg(long)]
        budget: f64,

        #[arg(long, default_value = "4")]
        people: u32,

        #[arg(long = "allergy")]
        allergies: Vec<String>,

        #[arg(long)]
        no_stove: bool,

        #[arg(long)]
        region: Option<RegionTag>,

        /// "single" or "ranked"
        #[arg(long)]
        mode: Option<SelectionStrategy>,
    },

    /// Print the grocery inventory as JSON
    Inventory,
}
