//! # RISCOS.EA rename tool
use std::{io, path::Path, process};

use clap::CommandFactory;
use color_eyre::eyre;
use ea_fix::cli::{self, opt::Options};
use riscos::{
    ea::SidecarReader,
    fix::{Fixer, Summary},
    util::vfs::LocalFS,
};

fn run(dir: &Path, opt: &Options) -> eyre::Result<Summary> {
    let reader = SidecarReader::open(dir)?;
    let fixer = Fixer::new(LocalFS::new(dir.to_owned()))
        .dry_run(opt.dry_run)
        .verbose(opt.verbose);
    let summary = fixer.run(reader)?;
    Ok(summary)
}

fn main() {
    let opt: Options = match cli::init() {
        Ok(opt) => opt,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            process::exit(cli::EXIT_OTHER);
        }
    };

    let dir = match &opt.dir {
        Some(dir) => dir.clone(),
        None => {
            let _ = Options::command().write_help(&mut io::stderr());
            process::exit(cli::EXIT_USAGE);
        }
    };

    match run(&dir, &opt) {
        Ok(summary) => log::info!("{}", summary),
        Err(report) => {
            eprintln!("Error: {:?}", report);
            process::exit(cli::exit_code(&report));
        }
    }
}
