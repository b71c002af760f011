use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

/// Turn parsed matches into an `Action` plus the process-wide secrets.
///
/// # Errors
///
/// Returns an error when a required argument is missing (clap enforces the
/// token secret, so this is a defensive backstop).
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let token_secret = matches
        .get_one::<String>("token-secret")
        .map(|s| SecretString::from(s.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --token-secret"))?;

    // OTP derivation falls back to the token secret when not set separately.
    let otp_secret = matches
        .get_one::<String>("otp-secret")
        .map_or_else(|| token_secret.clone(), |s| SecretString::from(s.to_string()));

    let globals = GlobalArgs::new(token_secret, otp_secret, matches.get_flag("debug-otp"));

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
    };

    Ok((action, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn test_handler_builds_action_and_globals() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "twogate",
            "--dsn",
            "postgres://localhost:5432/twogate",
            "--token-secret",
            "sekret",
        ])?;

        let (action, globals) = handler(&matches)?;
        let Action::Server { port, dsn } = action;
        assert_eq!(port, 8080);
        assert_eq!(dsn, "postgres://localhost:5432/twogate");
        // OTP secret falls back to the token secret.
        assert_eq!(globals.otp_secret.expose_secret(), "sekret");
        assert!(!globals.debug_otp);
        Ok(())
    }

    #[test]
    fn test_handler_separate_otp_secret() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "twogate",
            "--dsn",
            "postgres://localhost:5432/twogate",
            "--token-secret",
            "sekret",
            "--otp-secret",
            "otp-sekret",
            "--debug-otp",
        ])?;

        let (_, globals) = handler(&matches)?;
        assert_eq!(globals.token_secret.expose_secret(), "sekret");
        assert_eq!(globals.otp_secret.expose_secret(), "otp-sekret");
        assert!(globals.debug_otp);
        Ok(())
    }
}
