use anyhow::Result;
use districtmap::Congress;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::CongressStartYearArgs) -> Result<()> {
    let congress = Congress::new(args.congress)?;
    println!("{}", congress.start_year());
    Ok(())
}
