//! Headless run configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless match.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// TOML file of tunable overrides layered on the stock values.
    pub tunables: Option<PathBuf>,
    pub bots: usize,
    pub ticks: u64,
    pub team_mode: bool,
    pub session_id: Option<String>,
    pub seed: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            tunables: None,
            bots: 4,
            ticks: 3600,
            team_mode: false,
            session_id: None,
            seed: 0,
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RAVEN_TUNABLES` - Path to a tunables TOML file (default: stock values)
    /// - `RAVEN_BOTS` - Number of bots (default: 4)
    /// - `RAVEN_TICKS` - Ticks to simulate (default: 3600)
    /// - `RAVEN_TEAM_MODE` - `true`/`1` to split bots into two teams
    /// - `RAVEN_SESSION_ID` - Log session name (default: timestamp)
    /// - `RAVEN_SEED` - World seed (default: 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("RAVEN_TUNABLES")
            && !path.is_empty()
        {
            config.tunables = Some(PathBuf::from(path));
        }
        if let Some(bots) = read_env::<usize>("RAVEN_BOTS") {
            config.bots = bots;
        }
        if let Some(ticks) = read_env::<u64>("RAVEN_TICKS") {
            config.ticks = ticks;
        }
        if let Ok(flag) = env::var("RAVEN_TEAM_MODE") {
            config.team_mode = matches!(flag.trim(), "1" | "true" | "yes" | "on");
        }
        if let Ok(session) = env::var("RAVEN_SESSION_ID")
            && !session.is_empty()
        {
            config.session_id = Some(session);
        }
        if let Some(seed) = read_env::<u64>("RAVEN_SEED") {
            config.seed = seed;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
