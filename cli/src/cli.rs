use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use districtmap::IdentityScheme;

/// Historical district and state boundary map preparation (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "districtmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Title, color and label a congressional district collection
    Districts(DistrictsArgs),

    /// Extract the state boundaries in force in a given year
    States(StatesArgs),

    /// Add missing label points to an already prepared collection
    Labels(LabelsArgs),

    /// Print the year the given Congress first met
    CongressStartYear(CongressStartYearArgs),
}

#[derive(clap::Args, Debug)]
pub struct Common {
    /// Pipeline settings (JSON); omitted fields keep their defaults
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Copy the source attributes of each feature into the output
    #[arg(long)]
    pub keep_source: bool,
}

#[derive(clap::Args, Debug)]
pub struct DistrictsArgs {
    /// Input features (.geojson, .geojsonl/.ndjson or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output collection (.geojson or .geojsonl/.ndjson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Identifier scheme: composite, census, states or prepared (detected when omitted)
    #[arg(long)]
    pub scheme: Option<IdentityScheme>,

    /// Jurisdiction code table (JSON), defaults to the built-in table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub codes: Option<PathBuf>,

    /// Keep only districts in use during this Congress
    #[arg(long)]
    pub congress: Option<u16>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(clap::Args, Debug)]
pub struct StatesArgs {
    /// Input state boundary versions
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output collection
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Target year (YYYY, meaning January 1) or date (YYYY-MM-DD)
    #[arg(value_parser = parse_target)]
    pub year: NaiveDate,

    /// Jurisdiction code table (JSON), defaults to the built-in table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub codes: Option<PathBuf>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Prepared collection
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output collection
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub common: Common,
}

#[derive(clap::Args, Debug)]
pub struct CongressStartYearArgs {
    /// Congress number, starting at 1
    pub congress: u16,
}

/// Parse `YYYY` as January 1 of that year, or a full `YYYY-MM-DD` date.
/// Years before 1 are rejected.
fn parse_target(text: &str) -> Result<NaiveDate, String> {
    let date = match text.parse::<i32>() {
        Ok(year) => NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| format!("year out of range: {year}"))?,
        Err(_) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| format!("expected YYYY or YYYY-MM-DD, got {text:?}"))?,
    };
    if date.year() <= 0 {
        return Err(format!("year must be positive, got {}", date.year()));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, Parser};

    fn states_date(args: &[&str]) -> Result<NaiveDate, clap::Error> {
        let mut argv = vec!["districtmap", "states", "in.geojson", "out.geojson"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Commands::States(args) => Ok(args.year),
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn years_and_dates() {
        assert_eq!(states_date(&["1850"]).unwrap(), NaiveDate::from_ymd_opt(1850, 1, 1).unwrap());
        assert_eq!(states_date(&["1850-07-04"]).unwrap(), NaiveDate::from_ymd_opt(1850, 7, 4).unwrap());
    }

    #[test]
    fn malformed_years_are_usage_errors() {
        for bad in ["abc", "July 1850", "0", "1850-13-01"] {
            let err = states_date(&[bad]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{bad}");
            assert_eq!(err.exit_code(), 2);
        }
    }
}
