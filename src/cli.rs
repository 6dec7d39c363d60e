//! Drives the command-line program.

pub use crate::error::Error;
use crate::conf;
use crate::filter::KeywordSet;
use crate::monitor::Poller;
use crate::output::{Output, OutputFormat, StreamFormat, StreamSink};
use crate::query::{SearchRequest, Sort, TimeFilter};
use crate::reddit::auth::Credentials;
use crate::reddit::service::RedditService;
use crate::reddit::{RedditClient, Search};
use crate::search;
use crate::view::ViewOptions;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use itertools::Itertools;
use log::{error, info};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Searches and monitors subreddits for posts matching keywords", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search recent posts for keywords
    #[clap(alias = "s")]
    Search(SearchConfig),

    /// Watch for new posts matching keywords
    #[clap(alias = "m")]
    Monitor(MonitorConfig),
}

/// Options shared by every command.
#[derive(Args, Debug)]
struct FilterConfig {
    /// Subreddits to search, comma- or plus-separated [default: $SUBSCOUT_SUBREDDITS]
    #[arg(short = 's', long, value_name = "SUBREDDITS")]
    subreddits: Vec<String>,

    /// Keywords to match, comma-separated [default: $SUBSCOUT_KEYWORDS]
    #[arg(short = 'k', long, value_name = "KEYWORDS", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Read additional keywords from FILE, one per line
    #[arg(long, value_name = "FILE")]
    keywords_file: Option<PathBuf>,
}

impl FilterConfig {
    /// Subreddits from the command line, falling back to the environment.
    fn subreddits(&self) -> Result<Vec<String>, Error> {
        let subreddits: Vec<String> = self
            .subreddits
            .iter()
            .flat_map(|value| conf::split_subreddits(value))
            .collect();
        let subreddits = if subreddits.is_empty() {
            conf::default_subreddits()
        } else {
            subreddits
        };

        if subreddits.is_empty() {
            Err(Error::Configuration(format!(
                "no subreddits given: pass --subreddits or set ${}",
                conf::SUBREDDITS_VAR
            )))
        } else {
            Ok(subreddits)
        }
    }

    /// Keywords from the command line and keywords file, falling back to
    /// the environment. May be empty, which matches every post.
    fn keywords(&self) -> Result<Vec<String>, Error> {
        let mut keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if let Some(path) = &self.keywords_file {
            keywords.extend(conf::read_keywords_file(path)?);
        }

        if keywords.is_empty() {
            Ok(conf::default_keywords())
        } else {
            Ok(keywords)
        }
    }
}

#[derive(Args, Debug)]
struct SearchConfig {
    #[command(flatten)]
    filter: FilterConfig,

    /// Only search posts from the past hour, day, week, month, or year
    #[arg(short = 't', long = "time", value_enum, default_value_t = TimeFilter::Month)]
    time_filter: TimeFilter,

    /// Order in which Reddit ranks results
    #[arg(long, value_enum, default_value_t = Sort::New)]
    sort: Sort,

    /// Show at most this many results
    #[arg(
        short = 'l',
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    limit: u32,

    /// Print results as JSON
    #[arg(short = 'j', long, default_value_t = false)]
    json: bool,

    /// Save results to FILE, as CSV or JSON depending on its extension
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MonitorConfig {
    #[command(flatten)]
    filter: FilterConfig,

    /// Print each match as a line of JSON
    #[arg(short = 'j', long, default_value_t = false)]
    json: bool,

    /// Seconds to wait between polls [default: $SUBSCOUT_POLL_INTERVAL or 60]
    #[arg(
        short = 'i',
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: Option<u64>,
}

impl MonitorConfig {
    fn interval(&self) -> Result<Duration, Error> {
        match self.interval {
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => conf::poll_interval(),
        }
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner<S: Search = RedditClient> {
    config: Config,
    client: S,
}

impl Runner<RedditClient> {
    /// Create a new program runner using the given `config`.
    ///
    /// Returns a configuration error if Reddit credentials are only
    /// partially set in the environment.
    pub fn new(config: Config) -> Result<Self, Error> {
        let credentials =
            Credentials::from_env().map_err(|err| Error::Configuration(err.to_string()))?;
        match &credentials {
            Some(creds) => info!("Authenticating as app {}", creds.client_id()),
            None => info!("No Reddit credentials set; using the public API"),
        }
        let client = RedditClient::new(RedditService::new(credentials));
        Ok(Self::with_client(config, client))
    }
}

impl<S: Search> Runner<S> {
    /// Create a new program runner that searches with `client`.
    pub fn with_client(config: Config, client: S) -> Self {
        Self { config, client }
    }

    /// Run the command-line program using its stored configuration options.
    pub async fn run(self) -> Result<(), Error> {
        match &self.config.command {
            Command::Search(config) => run_search(&self.client, config).await,
            Command::Monitor(config) => run_monitor(self.client, config).await,
        }
    }
}

fn view_options() -> ViewOptions {
    ViewOptions::for_terminal(io::stdout().is_terminal())
}

async fn run_search<S: Search>(client: &S, config: &SearchConfig) -> Result<(), Error> {
    // Check the output path before spending any requests.
    let format = OutputFormat::from_args(config.json, config.output.as_deref())?;
    let request = SearchRequest::build(config.filter.subreddits()?)
        .keywords(config.filter.keywords()?)
        .time_filter(config.time_filter)
        .sort(config.sort)
        .limit(config.limit)
        .build()?;

    let records = search::search(client, &request).await?;
    Output::new(format, view_options()).write(&records)
}

async fn run_monitor<S: Search>(client: S, config: &MonitorConfig) -> Result<(), Error> {
    let request = SearchRequest::newest(config.filter.subreddits()?)?;
    let keywords = KeywordSet::new(config.filter.keywords()?);
    let interval = config.interval()?;

    let described = if keywords.is_empty() {
        "all posts".to_string()
    } else {
        keywords.iter().join(", ")
    };
    eprintln!("Monitoring r/{} for: {described}", request.subreddit_path());
    eprintln!("{}", "-".repeat(60));

    let format = if config.json {
        StreamFormat::JsonLines
    } else {
        StreamFormat::Table
    };
    let mut sink = StreamSink::new(io::stdout(), format, view_options());
    let mut poller = Poller::new(client, request, keywords, interval);
    poller.run(&mut sink, shutdown_signal()).await?;

    info!("Stopped monitoring");
    Ok(())
}

/// Completes when the user presses Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Could not listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

/// Runs the program with `config` against the live Reddit API.
pub async fn run(config: Config) -> Result<(), Error> {
    Runner::new(config)?.run().await
}

#[cfg(test)]
mod tests {
    mod parsing {
        use super::super::*;

        fn parse(args: &[&str]) -> Config {
            Config::try_parse_from(args).unwrap()
        }

        #[test]
        fn it_parses_search_defaults() {
            let config = parse(&["subscout", "search", "-s", "rust"]);
            let Command::Search(search) = config.command else {
                panic!("expected the search command");
            };
            assert_eq!(search.filter.subreddits, ["rust"]);
            assert!(search.filter.keywords.is_empty());
            assert_eq!(search.time_filter, TimeFilter::Month);
            assert_eq!(search.sort, Sort::New);
            assert_eq!(search.limit, 20);
            assert!(!search.json);
            assert!(search.output.is_none());
        }

        #[test]
        fn it_parses_search_options() {
            let config = parse(&[
                "subscout", "search", "-s", "SaaS+startups", "-k", "AI tool,startup", "-t",
                "week", "--sort", "comments", "-l", "50", "-j", "-o", "out.csv",
            ]);
            let Command::Search(search) = config.command else {
                panic!("expected the search command");
            };
            assert_eq!(search.filter.keywords, ["AI tool", "startup"]);
            assert_eq!(search.time_filter, TimeFilter::Week);
            assert_eq!(search.sort, Sort::Comments);
            assert_eq!(search.limit, 50);
            assert!(search.json);
            assert_eq!(search.output, Some(PathBuf::from("out.csv")));
        }

        #[test]
        fn it_rejects_a_zero_limit() {
            let result = Config::try_parse_from(["subscout", "search", "-s", "rust", "-l", "0"]);
            assert!(result.is_err());
        }

        #[test]
        fn it_rejects_unknown_time_filters() {
            let result = Config::try_parse_from(["subscout", "search", "-t", "decade"]);
            assert!(result.is_err());
        }

        #[test]
        fn it_parses_monitor_options() {
            let config = parse(&["subscout", "monitor", "-s", "rust", "-j", "-i", "30"]);
            let Command::Monitor(monitor) = config.command else {
                panic!("expected the monitor command");
            };
            assert!(monitor.json);
            assert_eq!(monitor.interval().unwrap(), Duration::from_secs(30));
        }

        #[test]
        fn it_does_not_accept_a_limit_for_monitor() {
            let result = Config::try_parse_from(["subscout", "monitor", "-s", "rust", "-l", "5"]);
            assert!(result.is_err());
        }
    }

    mod filters {
        use super::super::*;
        use temp_env::{with_var, with_var_unset};

        fn filter(subreddits: &[&str], keywords: &[&str]) -> FilterConfig {
            FilterConfig {
                subreddits: subreddits.iter().map(|s| s.to_string()).collect(),
                keywords: keywords.iter().map(|s| s.to_string()).collect(),
                keywords_file: None,
            }
        }

        #[test]
        fn it_splits_subreddits_from_the_command_line() {
            let filter = filter(&["weddingplanning+wedding", "eventplanning"], &[]);
            assert_eq!(
                filter.subreddits().unwrap(),
                ["weddingplanning", "wedding", "eventplanning"]
            );
        }

        #[test]
        fn it_falls_back_to_default_subreddits() {
            with_var(conf::SUBREDDITS_VAR, Some("rust"), || {
                assert_eq!(filter(&[], &[]).subreddits().unwrap(), ["rust"]);
            })
        }

        #[test]
        fn it_requires_subreddits() {
            with_var_unset(conf::SUBREDDITS_VAR, || {
                let result = filter(&[], &[]).subreddits();
                assert!(matches!(result, Err(Error::Configuration(_))));
            })
        }

        #[test]
        fn it_merges_keywords_from_a_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("keywords.txt");
            std::fs::write(&path, "table layout\n").unwrap();
            let mut filter = filter(&["rust"], &[" seating chart "]);
            filter.keywords_file = Some(path);
            assert_eq!(filter.keywords().unwrap(), ["seating chart", "table layout"]);
        }

        #[test]
        fn it_falls_back_to_default_keywords() {
            with_var(conf::KEYWORDS_VAR, Some("bug, crash"), || {
                assert_eq!(filter(&["rust"], &[]).keywords().unwrap(), ["bug", "crash"]);
            })
        }

        #[test]
        fn it_matches_everything_without_keywords() {
            with_var_unset(conf::KEYWORDS_VAR, || {
                assert!(filter(&["rust"], &[]).keywords().unwrap().is_empty());
            })
        }
    }

    mod runner {
        use super::super::*;
        use crate::record::ResultRecord;
        use crate::test_utils::{MockSearch, raw_post};
        use serde_json::json;

        fn runner(args: &[&str], client: MockSearch) -> Runner<MockSearch> {
            Runner::with_client(Config::try_parse_from(args).unwrap(), client)
        }

        #[tokio::test]
        async fn it_saves_search_results_to_a_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("results.json");
            let client = MockSearch::new([Ok(vec![
                raw_post(json!({ "id": "a", "title": "A bug", "score": 1 })),
                raw_post(json!({ "id": "b", "title": "Not relevant", "score": 9 })),
            ])]);
            let args = ["subscout", "search", "-s", "test", "-k", "bug", "-o", path.to_str().unwrap()];

            runner(&args, client).run().await.unwrap();

            let saved: Vec<ResultRecord> =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(saved.len(), 1);
            assert_eq!(saved[0].title, "A bug");
        }

        #[tokio::test]
        async fn it_checks_the_output_path_before_searching() {
            // The client would fail with a remote error if it were called.
            let args = ["subscout", "search", "-s", "test", "-o", "results.txt"];
            let result = runner(&args, MockSearch::failing()).run().await;
            assert!(matches!(result, Err(Error::Configuration(_))));
        }

        #[tokio::test]
        async fn it_reports_remote_errors_from_searches() {
            let args = ["subscout", "search", "-s", "test", "-j"];
            let result = runner(&args, MockSearch::failing()).run().await;
            assert!(matches!(result, Err(Error::RemoteRequest(_))));
        }

        #[tokio::test]
        async fn it_rejects_invalid_subreddits() {
            let args = ["subscout", "search", "-s", "no spaces allowed", "-j"];
            let result = runner(&args, MockSearch::new([])).run().await;
            assert!(matches!(result, Err(Error::Configuration(_))));
        }
    }
}
