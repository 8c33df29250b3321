//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary should run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{ARG_CREDENTIALS, ARG_PORT};
use anyhow::Result;
use std::path::PathBuf;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let credentials = matches
        .get_one::<String>(ARG_CREDENTIALS)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from);

    Ok(Action::Server(Args { port, credentials }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_path_is_optional() -> Result<()> {
        temp_env::with_vars(
            [
                ("KEYGATE_CREDENTIALS", None::<&str>),
                ("KEYGATE_PORT", None::<&str>),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["keygate"]);
                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 8080);
                assert!(args.credentials.is_none());
                Ok(())
            },
        )
    }

    #[test]
    fn blank_credentials_path_is_ignored() -> Result<()> {
        temp_env::with_vars([("KEYGATE_CREDENTIALS", Some("  "))], || {
            let matches = crate::cli::commands::new().get_matches_from(vec!["keygate"]);
            let Action::Server(args) = handler(&matches)?;
            assert!(args.credentials.is_none());
            Ok(())
        })
    }

    #[test]
    fn maps_port_and_credentials() -> Result<()> {
        let matches = crate::cli::commands::new().get_matches_from(vec![
            "keygate",
            "-p",
            "3000",
            "-c",
            "users.json",
        ]);
        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 3000);
        assert_eq!(args.credentials, Some(PathBuf::from("users.json")));
        Ok(())
    }
}
