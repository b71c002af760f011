use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("TWOGATE_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(value: &str) -> Result<clap::ArgMatches, clap::Error> {
        Command::new("probe")
            .arg(Arg::new("level").value_parser(validator_log_level()))
            .try_get_matches_from(vec!["probe", value])
    }

    #[test]
    fn test_validator_accepts_numbers_and_names() {
        for (level, expected) in [("error", 0u8), ("warn", 1), ("info", 2), ("3", 3)] {
            let matches = probe(level).expect("level should parse");
            assert_eq!(matches.get_one::<u8>("level").copied(), Some(expected));
        }
    }

    #[test]
    fn test_validator_rejects_garbage() {
        assert!(probe("nonsense").is_err());
        assert!(probe("42").is_err());
    }
}
