//! Shared command line plumbing
use clap::ErrorKind;
use color_eyre::eyre;
use env_logger::Env;
use log::LevelFilter;
use riscos::Error;

pub mod dump;
pub mod opt;
mod util;

/// Exit code when no directory was given or the command line is invalid
pub const EXIT_USAGE: i32 = 1;
/// Exit code when the directory path is too long
pub const EXIT_PATH_TOO_LONG: i32 = 2;
/// Exit code when the sidecar can't be opened
pub const EXIT_SIDECAR_OPEN: i32 = 3;
/// Exit code for any other fatal error
pub const EXIT_OTHER: i32 = 4;

/// Set up CLI
pub fn init<T: clap::Parser>() -> color_eyre::Result<T> {
    color_eyre::install()?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("EA_FIX_LOG"))
        .init();
    match T::try_parse() {
        Ok(args) => Ok(args),
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(&e));
        }
    }
}

/// Pick the process exit code for a command line that was not accepted
pub fn parse_exit_code(e: &clap::Error) -> i32 {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}

/// Pick the process exit code for a fatal error
pub fn exit_code(report: &eyre::Report) -> i32 {
    match report.downcast_ref::<Error>() {
        Some(Error::PathTooLong { .. }) => EXIT_PATH_TOO_LONG,
        Some(Error::SidecarOpen { .. }) => EXIT_SIDECAR_OPEN,
        _ => EXIT_OTHER,
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use clap::Parser;
    use color_eyre::eyre;
    use riscos::Error;

    use super::{
        exit_code, opt::Options, parse_exit_code, EXIT_OTHER, EXIT_PATH_TOO_LONG,
        EXIT_SIDECAR_OPEN, EXIT_USAGE,
    };

    fn parse_code(args: &[&str]) -> Option<i32> {
        Options::try_parse_from(args).err().map(|e| parse_exit_code(&e))
    }

    #[test]
    fn test_parse_exit_codes() {
        assert_eq!(parse_code(&["ea-fix", "--no-such-flag"]), Some(EXIT_USAGE));
        assert_eq!(parse_code(&["ea-fix", "one", "two"]), Some(EXIT_USAGE));
        assert_eq!(parse_code(&["ea-fix", "--help"]), Some(0));
        assert_eq!(parse_code(&["ea-fix", "--version"]), Some(0));
        assert_eq!(parse_code(&["ea-fix", "-n", "Disc"]), None);
    }

    #[test]
    fn test_exit_codes() {
        let e = eyre::Report::new(Error::PathTooLong { len: 3000, max: 2048 });
        assert_eq!(exit_code(&e), EXIT_PATH_TOO_LONG);
        let e = eyre::Report::new(Error::SidecarOpen {
            path: PathBuf::from("RISCOS.EA"),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(exit_code(&e), EXIT_SIDECAR_OPEN);
        let e = eyre::Report::new(Error::Read(io::Error::from(io::ErrorKind::Other)));
        assert_eq!(exit_code(&e), EXIT_OTHER);
        assert_eq!(exit_code(&eyre::eyre!("something else")), EXIT_OTHER);
    }
}
