use clap::Parser;
use color_eyre::eyre;
use log::LevelFilter;

use ea_fix::cli::{dump, opt::DumpOptions};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .init();
    let opt: DumpOptions = DumpOptions::parse();

    let entries = dump::load_entries(&opt.path)?;
    dump::print_entries(&entries, opt.format)
}
