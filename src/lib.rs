// SPDX-License-Identifier: Apache-2.0

//! subscout is a command-line tool for finding Reddit posts about a topic.
//! It searches one or more subreddits for posts whose title or body
//! mentions any of a set of keywords, and shows them in the terminal or
//! saves them as CSV or JSON. It can also watch subreddits and report new
//! matching posts as they are submitted.
//!
//! # Examples
//!
//! Search r/weddingplanning for posts from the past month about seating
//! charts:
//!
//! ```bash
//! subscout search -s weddingplanning -k "seating chart,table layout"
//! ```
//!
//! Search several subreddits for the week's most discussed posts and save
//! the top 50 as CSV:
//!
//! ```bash
//! subscout search -s SaaS+startups -k "AI tool" -t week --sort comments -l 50 -o results.csv
//! ```
//!
//! Print results as JSON:
//!
//! ```bash
//! subscout search -s rust -k async --json
//! ```
//!
//! Watch a subreddit for new matching posts, checking every 30 seconds,
//! until Ctrl-C is pressed:
//!
//! ```bash
//! subscout monitor -s weddingplanning -k "seating chart" -i 30
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! subscout --help
//! ```
//!
//! # Environment
//!
//! Subreddits, keywords, and the polling interval can be given defaults
//! through the environment; see [`conf`] for the full list of variables.
//!
//! subscout uses Reddit's public JSON API by default. Reddit rate limits
//! anonymous clients aggressively, so for regular use you may want to
//! register a "script" app at <https://www.reddit.com/prefs/apps> and set
//! its credentials in your shell's configuration ("rc") file:
//!
//! ```bash
//! export REDDIT_CLIENT_ID='client id'
//! export REDDIT_CLIENT_SECRET='client secret'
//! ```
//!
//! # Exit status
//!
//! | Status | Meaning                                        |
//! |--------|------------------------------------------------|
//! | 0      | Success, including searches with no results    |
//! | 1      | Reddit could not be reached or returned an error |
//! | 2      | Invalid configuration or arguments             |
//! | 3      | Results could not be written                   |
//!
//! # License
//!
//! subscout is licensed under the terms of the [Apache License 2.0].
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod cli;
pub mod clock;
pub mod conf;
pub mod error;
pub mod filter;
pub mod http;
pub mod monitor;
pub mod output;
pub mod query;
pub mod record;
pub mod reddit;
pub mod search;
pub mod text;
pub mod thing;
pub mod view;

#[cfg(test)]
mod test_utils;
