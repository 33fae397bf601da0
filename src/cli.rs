use clap::{ArgAction, Parser};

/// 🔍 Find every committer identity a GitHub account has used
#[derive(Debug, Parser)]
#[command(
    name = "ghidents",
    version,
    about = "✨ List the names and emails a GitHub user has committed under",
    long_about = None
)]
pub struct Cli {
    /// 👤 (REQUIRED) Username of the target GitHub account
    #[arg(short, long)]
    pub user: Option<String>,

    /// 🔗 Print commit URLs alongside discovered identities
    #[arg(short, long)]
    pub source: bool,

    /// 🔁 Print all commits (will repeat duplicate identities)
    #[arg(short, long)]
    pub all: bool,

    /// 🔑 GitHub API bearer token
    #[arg(short, long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// 🧾 Emit one JSON object per line
    #[arg(long)]
    pub json: bool,

    /// ⏱ Pause between page requests, in milliseconds
    #[arg(long, default_value = "500")]
    pub delay_ms: u64,

    /// ⌛ Per-request HTTP timeout, in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// 🛑 Give up on the whole walk after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// 🌐 API base URL (GitHub Enterprise: https://HOST/api)
    #[arg(long, default_value = "https://api.github.com")]
    pub api_url: String,

    /// 📣 More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["ghidents", "-u", "ada", "-t", "tok"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert!(!cli.source && !cli.all && !cli.json);
        assert_eq!(cli.delay_ms, 500);
        assert_eq!(cli.api_url, "https://api.github.com");
        assert_eq!(cli.deadline, None);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["ghidents", "-u", "ada", "-s", "-a", "-vv"]).unwrap();
        assert!(cli.source);
        assert!(cli.all);
        assert_eq!(cli.verbose, 2);
    }
}
