//! Server configuration, read once at start up from command line flags or
//! environment variables.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use clap::Parser;

use crate::{db::SqliteConnectionManager, settings::Settings};

/// The REST API server for Budgie.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database, created if it does not exist.
    #[arg(long, env = "BUDGIE_DB_PATH", default_value = "budgie.db")]
    pub db_path: PathBuf,

    /// The address to listen on.
    #[arg(long, env = "BUDGIE_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "BUDGIE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// The maximum number of open database connections.
    #[arg(long, env = "BUDGIE_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// How long a request waits for a free database connection, in seconds.
    #[arg(long, env = "BUDGIE_CONNECTION_TIMEOUT_SECS", default_value_t = 5)]
    pub connection_timeout_secs: u64,

    /// File path to write debug logs to, in addition to stdout.
    #[arg(long, env = "BUDGIE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// The username for a new database.
    #[arg(long, env = "BUDGIE_DEFAULT_USERNAME", default_value = "User")]
    pub default_username: String,

    /// The currency symbol for a new database.
    #[arg(long, env = "BUDGIE_DEFAULT_CURRENCY_SYMBOL", default_value = "$")]
    pub default_currency_symbol: String,

    /// The monthly budget for a new database.
    #[arg(long, env = "BUDGIE_DEFAULT_MONTHLY_BUDGET", default_value_t = 0.0)]
    pub default_monthly_budget: f64,
}

impl Config {
    /// The socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The pool's wait limit for a free connection.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// The connection manager for the configured database file.
    pub fn connection_manager(&self) -> SqliteConnectionManager {
        SqliteConnectionManager::File(self.db_path.clone())
    }

    /// The settings written to a database that has none yet.
    pub fn default_settings(&self) -> Settings {
        Settings {
            username: self.default_username.clone(),
            currency_symbol: self.default_currency_symbol.clone(),
            monthly_budget: self.default_monthly_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::{IpAddr, Ipv4Addr, SocketAddr},
        path::PathBuf,
        time::Duration,
    };

    use clap::{CommandFactory, Parser};

    use super::Config;
    use crate::settings::Settings;

    #[test]
    fn command_is_well_formed() {
        Config::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "server",
            "--db-path",
            "/tmp/test.db",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--pool-size",
            "2",
            "--connection-timeout-secs",
            "1",
            "--default-username",
            "Alice",
            "--default-currency-symbol",
            "€",
            "--default-monthly-budget",
            "1200.5",
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(
            config.socket_addr(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
        );
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.connection_timeout(), Duration::from_secs(1));
        assert_eq!(
            config.default_settings(),
            Settings {
                username: "Alice".to_owned(),
                currency_symbol: "€".to_owned(),
                monthly_budget: 1200.5,
            }
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::try_parse_from(["server", "--port", "not-a-port"]).is_err());
    }
}
