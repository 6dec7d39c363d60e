//! Environment and configuration utilities.
//!
//! Anything that can be given on the command line can also be given a
//! default through the environment:
//!
//! | Variable                 | Meaning                                         |
//! |--------------------------|-------------------------------------------------|
//! | `SUBSCOUT_SUBREDDITS`    | Subreddits to search, comma- or plus-separated  |
//! | `SUBSCOUT_KEYWORDS`      | Keywords to match, comma-separated              |
//! | `SUBSCOUT_POLL_INTERVAL` | Seconds between polls in monitor mode           |
//! | `REDDIT_CLIENT_ID`       | OAuth client ID (see [`crate::reddit::auth`])   |
//! | `REDDIT_CLIENT_SECRET`   | OAuth client secret                             |

use crate::error::Error;
use crate::monitor::DEFAULT_INTERVAL;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const SUBREDDITS_VAR: &str = "SUBSCOUT_SUBREDDITS";
pub const KEYWORDS_VAR: &str = "SUBSCOUT_KEYWORDS";
pub const POLL_INTERVAL_VAR: &str = "SUBSCOUT_POLL_INTERVAL";

/// Splits a list of subreddits on commas and plus signs.
///
/// # Examples
///
/// ```
/// use subscout::conf::split_subreddits;
/// let subreddits = split_subreddits("weddingplanning+wedding, eventplanning,");
/// assert_eq!(subreddits, ["weddingplanning", "wedding", "eventplanning"]);
/// ```
pub fn split_subreddits(value: &str) -> Vec<String> {
    value
        .split([',', '+'])
        .map(str::trim)
        .map(|name| name.strip_prefix("r/").unwrap_or(name))
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Splits a comma-separated list of keywords.
///
/// Unlike subreddits, keywords may contain plus signs ("C++").
///
/// # Examples
///
/// ```
/// use subscout::conf::split_keywords;
/// assert_eq!(split_keywords("seating chart, C++ ,,"), ["seating chart", "C++"]);
/// ```
pub fn split_keywords(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
}

/// Parses the contents of a keywords file: one keyword per line, with
/// blank lines and lines starting with `#` ignored.
///
/// # Examples
///
/// ```
/// use subscout::conf::parse_keywords_file;
/// let text = "# wedding terms\nseating chart\n\n  table layout  \n";
/// assert_eq!(parse_keywords_file(text), ["seating chart", "table layout"]);
/// ```
pub fn parse_keywords_file(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Reads keywords from the file at `path`.
pub fn read_keywords_file(path: &Path) -> Result<Vec<String>, Error> {
    let text = fs::read_to_string(path).map_err(|err| {
        Error::Configuration(format!(
            "could not read keywords file {}: {err}",
            path.display()
        ))
    })?;
    Ok(parse_keywords_file(&text))
}

/// Subreddits from `$SUBSCOUT_SUBREDDITS`, or none if it is unset.
pub fn default_subreddits() -> Vec<String> {
    env::var(SUBREDDITS_VAR)
        .map(|value| split_subreddits(&value))
        .unwrap_or_default()
}

/// Keywords from `$SUBSCOUT_KEYWORDS`, or none if it is unset.
pub fn default_keywords() -> Vec<String> {
    env::var(KEYWORDS_VAR)
        .map(|value| split_keywords(&value))
        .unwrap_or_default()
}

/// Seconds between polls from `$SUBSCOUT_POLL_INTERVAL`, falling back to
/// [`DEFAULT_INTERVAL`].
///
/// Returns an error if the variable is set to anything other than a
/// positive whole number.
pub fn poll_interval() -> Result<Duration, Error> {
    match env::var(POLL_INTERVAL_VAR) {
        Ok(value) => parse_interval(&value),
        Err(_) => Ok(DEFAULT_INTERVAL),
    }
}

/// Parses a positive number of seconds.
pub fn parse_interval(value: &str) -> Result<Duration, Error> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Configuration(format!(
            "poll interval must be a positive number of seconds, not {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_env::{with_var, with_var_unset};

    #[test]
    fn it_strips_subreddit_prefixes() {
        assert_eq!(split_subreddits("r/rust,r/learnrust"), ["rust", "learnrust"]);
    }

    #[test]
    fn it_reads_default_subreddits_from_the_environment() {
        with_var(SUBREDDITS_VAR, Some("SaaS+startups"), || {
            assert_eq!(default_subreddits(), ["SaaS", "startups"]);
        })
    }

    #[test]
    fn it_has_no_default_subreddits_when_unset() {
        with_var_unset(SUBREDDITS_VAR, || {
            assert!(default_subreddits().is_empty());
        })
    }

    #[test]
    fn it_reads_default_keywords_from_the_environment() {
        with_var(KEYWORDS_VAR, Some("AI tool, productivity app"), || {
            assert_eq!(default_keywords(), ["AI tool", "productivity app"]);
        })
    }

    #[test]
    fn it_uses_the_default_poll_interval_when_unset() {
        with_var_unset(POLL_INTERVAL_VAR, || {
            assert_eq!(poll_interval().unwrap(), DEFAULT_INTERVAL);
        })
    }

    #[test]
    fn it_reads_the_poll_interval_from_the_environment() {
        with_var(POLL_INTERVAL_VAR, Some("15"), || {
            assert_eq!(poll_interval().unwrap(), Duration::from_secs(15));
        })
    }

    #[test]
    fn it_rejects_invalid_poll_intervals() {
        for value in ["0", "-5", "soon", ""] {
            assert!(
                matches!(parse_interval(value), Err(Error::Configuration(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn it_reads_a_keywords_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "seating chart\n# comment\nguest seating\n").unwrap();
        assert_eq!(
            read_keywords_file(&path).unwrap(),
            ["seating chart", "guest seating"]
        );
    }

    #[test]
    fn it_reports_a_missing_keywords_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_keywords_file(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
