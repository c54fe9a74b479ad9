use std::path::PathBuf;

use clap::Parser;

/// Enriches newline-delimited JSON events with the results of a mysql lookup
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) enum Command {
    /// Filters events read from stdin, writing them to stdout
    Run(Args),
    /// Validates the configuration and checks the database is reachable
    Check(Args),
}

#[derive(Parser, Debug)]
pub(crate) struct Args {
    /// The path of the lookup configuration file
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,
}

impl Command {
    pub(crate) fn args(&self) -> &Args {
        match self {
            Command::Run(args) => args,
            Command::Check(args) => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_config() {
        let command = Command::try_parse_from(["enrich", "run", "--config", "/tmp/lookup.yml"]).unwrap();

        assert!(matches!(command, Command::Run(_)));
        assert_eq!(command.args().config, Some(PathBuf::from("/tmp/lookup.yml")));
    }

    #[test]
    fn test_parse_check_without_config() {
        let command = Command::try_parse_from(["enrich", "check"]).unwrap();

        assert!(matches!(command, Command::Check(_)));
        assert_eq!(command.args().config, None);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(Command::try_parse_from(["enrich", "build"]).is_err());
    }
}
