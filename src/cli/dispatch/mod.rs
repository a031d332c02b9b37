use crate::cli::actions::Action;
use anyhow::Result;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches.get_one::<String>("dsn").cloned(),
        rules: matches
            .get_one::<PathBuf>("rules")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --rules"))?,
        users: matches.get_one::<PathBuf>("users").cloned(),
        lookup_timeout: matches
            .get_one::<u64>("lookup-timeout")
            .copied()
            .unwrap_or(5),
        session_ttl: matches
            .get_one::<u64>("session-ttl")
            .copied()
            .unwrap_or(43200),
        secure_cookies: matches.get_flag("secure-cookies"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "ruolo",
            "--rules",
            "rules.json",
            "--users",
            "users.json",
            "--session-ttl",
            "600",
            "--secure-cookies",
        ]);
        let action = handler(&matches).unwrap();
        let Action::Server {
            port,
            dsn,
            rules,
            users,
            lookup_timeout,
            session_ttl,
            secure_cookies,
        } = action;
        assert_eq!(port, 8080);
        assert_eq!(dsn, None);
        assert_eq!(rules, PathBuf::from("rules.json"));
        assert_eq!(users, Some(PathBuf::from("users.json")));
        assert_eq!(lookup_timeout, 5);
        assert_eq!(session_ttl, 600);
        assert!(secure_cookies);
    }
}
