use anyhow::Result;
use districtmap::{Dataset, Pipeline};

use super::{load_codes, load_config};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::DistrictsArgs) -> Result<()> {
    let codes = load_codes(args.codes.as_deref())?;
    let config = load_config(&args.common)?;
    let dataset = Dataset::Districts { scheme: args.scheme, congress: args.congress };

    tracing::info!(input = %args.input.display(), "preparing districts");
    Pipeline::new(codes, config).run_file(&args.input, &args.output, &dataset)?;

    Ok(())
}
