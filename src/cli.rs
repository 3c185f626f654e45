use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cellar_keeper::domain::collection::SortOrder;
use cellar_keeper::domain::rating::parse_rating_input;
use cellar_keeper::domain::wine::WineType;

#[derive(Parser)]
#[command(
    name = "cellar",
    about = "Cellar Keeper — your wine collection, kept on this device",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List wines, optionally filtered and sorted
    List(ListArgs),
    /// Show one wine in full
    Show(IdArgs),
    /// Add a wine to the collection
    Add(AddArgs),
    /// Change fields of an existing wine
    Edit(EditArgs),
    /// Set a wine's rating by star count (1-5)
    Rate(RateArgs),
    /// Remove a wine
    Delete(IdArgs),
    /// Collection statistics and best-rated wines
    Stats(StatsArgs),
    /// Remove every wine from the collection
    Clear(ClearArgs),
    /// Show how a rating renders as stars
    Stars(StarsArgs),
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Match against name, region or producer
    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(short, long, value_enum, default_value = "added")]
    pub sort: SortArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortArg {
    Added,
    Rating,
    Vintage,
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Added => Self::Added,
            SortArg::Rating => Self::Rating,
            SortArg::Vintage => Self::Vintage,
            SortArg::Name => Self::Name,
        }
    }
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub region: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long = "type", value_parser = parse_wine_type)]
    pub wine_type: WineType,
    /// Rating 0-10, rounded to one decimal
    #[arg(long, value_parser = parse_rating_input)]
    pub rating: f64,
    #[arg(long, default_value = "")]
    pub producer: String,
    /// Comma-separated, e.g. "Corvina, Rondinella"
    #[arg(long, default_value = "")]
    pub grapes: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Photo path or URI
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long = "type", value_parser = parse_wine_type)]
    pub wine_type: Option<WineType>,
    #[arg(long, value_parser = parse_rating_input)]
    pub rating: Option<f64>,
    /// Empty string clears the producer
    #[arg(long)]
    pub producer: Option<String>,
    /// Comma-separated; empty string clears the list
    #[arg(long)]
    pub grapes: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct RateArgs {
    pub id: String,
    /// Star index, 1-5; each star is two points
    pub stars: u8,
}

#[derive(Args)]
pub struct StatsArgs {
    /// How many best-rated wines to list
    #[arg(long, default_value_t = 3)]
    pub top: usize,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm removal of the whole collection
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct StarsArgs {
    #[arg(value_parser = parse_rating_input)]
    pub rating: f64,
}

fn parse_wine_type(s: &str) -> Result<WineType, String> {
    s.parse().map_err(|e: cellar_keeper::domain::ValidationError| e.to_string())
}
