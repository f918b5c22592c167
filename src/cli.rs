use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "followcheck")]
#[command(version)]
#[command(about = "Compare following and followers lists from an Instagram data export", long_about = None)]
#[command(after_help = "Examples:\n  \
  followcheck instagram-export.zip              show who does not follow back\n  \
  followcheck -l instagram-export.zip           list the entries that will be parsed\n  \
  followcheck --json -c my.conf export.zip      use custom path patterns, print JSON\n  \
  followcheck https://example.com/export.zip    read a remote archive with Range requests")]
pub struct Cli {
    /// Export archive path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Configuration file or URL with the entry path patterns (default: built-in)
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: Option<String>,

    /// List the located following/followers entries and exit
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Print the result as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Verbose logging (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (-qq => errors only)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.json
    }

    /// Default log filter derived from `-v` and `-q`.
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (q, _) if q > 1 => tracing::Level::ERROR,
            (1, _) => tracing::Level::WARN,
            (_, 0) => tracing::Level::INFO,
            (_, 1) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["followcheck", "-l", "-c", "a.conf", "export.zip"]);
        assert!(cli.list);
        assert_eq!(cli.config.as_deref(), Some("a.conf"));
        assert_eq!(cli.file, "export.zip");
        assert!(!cli.is_http_url());
        assert_eq!(cli.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn verbosity_and_quietness() {
        let cli = Cli::parse_from(["followcheck", "-vv", "https://example.com/e.zip"]);
        assert!(cli.is_http_url());
        assert_eq!(cli.log_level(), tracing::Level::TRACE);

        let cli = Cli::parse_from(["followcheck", "-q", "-v", "e.zip"]);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }
}
