pub mod server;

use std::path::PathBuf;

/// Action to take after parsing the command line.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: Option<String>,
        rules: PathBuf,
        users: Option<PathBuf>,
        lookup_timeout: u64,
        session_ttl: u64,
        secure_cookies: bool,
    },
}
