//! Command-line contract for the hub binary.

use std::path::PathBuf;

use clap::Parser;

use crate::error::HubError;

/// St Lucia hub: spawns the player programs and referees the contest.
#[derive(Parser, Debug)]
#[command(name = "stlucia", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// File of die faces the game draws from, cyclically.
    pub rollfile: PathBuf,

    /// Points needed to win; kept raw so a bad value maps to its own
    /// failure class rather than a usage error.
    pub winscore: String,

    /// One player program per seat, in seating order.
    #[arg(num_args = 2..=26, required = true)]
    pub programs: Vec<String>,
}

impl Args {
    /// Parses the process arguments, collapsing every shape problem
    /// onto the usage failure class.
    pub fn from_env() -> Result<Self, HubError> {
        Self::try_parse().map_err(|_| HubError::Usage)
    }

    /// The validated score limit: a positive decimal integer with no
    /// leading sign or stray characters.
    pub fn score_limit(&self) -> Result<u32, HubError> {
        let score: u32 = self
            .winscore
            .parse()
            .map_err(|_| HubError::InvalidScore)?;
        if score == 0 {
            return Err(HubError::InvalidScore);
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, HubError> {
        Args::try_parse_from(argv).map_err(|_| HubError::Usage)
    }

    #[test]
    fn test_minimum_arguments() {
        let args = parse(&["stlucia", "rolls.txt", "7", "./a", "./b"]).unwrap();
        assert_eq!(args.rollfile, PathBuf::from("rolls.txt"));
        assert_eq!(args.score_limit().unwrap(), 7);
        assert_eq!(args.programs, vec!["./a", "./b"]);
    }

    #[test]
    fn test_too_few_players_is_usage() {
        assert!(matches!(
            parse(&["stlucia", "rolls.txt", "7", "./a"]),
            Err(HubError::Usage)
        ));
        assert!(matches!(parse(&["stlucia", "rolls.txt"]), Err(HubError::Usage)));
    }

    #[test]
    fn test_too_many_players_is_usage() {
        let mut argv = vec!["stlucia", "rolls.txt", "7"];
        argv.extend(std::iter::repeat("./p").take(27));
        assert!(matches!(parse(&argv), Err(HubError::Usage)));
    }

    #[test]
    fn test_score_must_be_positive_integer() {
        let bad = ["0", "2x", "", "4.5", " 7"];
        for winscore in bad {
            let args = parse(&["stlucia", "rolls.txt", winscore, "./a", "./b"]).unwrap();
            assert!(
                matches!(args.score_limit(), Err(HubError::InvalidScore)),
                "accepted {winscore:?}"
            );
        }
    }
}
