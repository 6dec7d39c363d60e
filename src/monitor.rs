// SPDX-License-Identifier: Apache-2.0

//! Watches subreddits for new posts.
//!
//! The [`Poller`] repeatedly fetches the newest posts in a set of
//! subreddits and reports the ones that match its keywords and have not
//! been seen before. It is a small state machine:
//!
//! ```text
//! Idle ──▶ Polling ──▶ Sleeping ──▶ Polling ──▶ …
//!             │            │
//!             └────────────┴──▶ Stopped   (on shutdown)
//! ```
//!
//! What has been seen is tracked by a [`PollState`], which is passed into
//! and returned from each cycle by [`poll_once()`]. It is never persisted,
//! so a restarted monitor starts fresh from the current time.

use crate::clock::{Clock, DateTime, HasAge, SystemClock, Utc};
use crate::error::Error;
use crate::filter::KeywordSet;
use crate::output::Sink;
use crate::query::SearchRequest;
use crate::record::ResultRecord;
use crate::reddit::{Search, client};
use chrono::{SubsecRound, TimeDelta};
use log::{debug, error, info};
use std::time::Duration;

/// Default time between polls.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// The newest post seen so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollState {
    last_seen_id: Option<String>,
    last_seen_created: DateTime<Utc>,
}

impl PollState {
    /// A state that treats everything created up to and including
    /// `instant` as already seen.
    pub fn starting_at(instant: DateTime<Utc>) -> Self {
        Self {
            last_seen_id: None,
            last_seen_created: instant,
        }
    }

    pub fn last_seen_id(&self) -> Option<&str> {
        self.last_seen_id.as_deref()
    }

    pub fn last_seen_created(&self) -> DateTime<Utc> {
        self.last_seen_created
    }

    /// True if `item` was created after the newest post seen so far.
    pub fn is_unseen<T: HasAge>(&self, item: &T) -> bool {
        item.is_newer_than(self.last_seen_created)
    }

    /// Moves the state forward to the newest of `seen`, or returns it
    /// unchanged if `seen` is empty or nothing in it is newer.
    pub fn advance<'a>(self, seen: impl IntoIterator<Item = (Option<&'a str>, DateTime<Utc>)>) -> Self {
        let since = self.last_seen_created;
        seen.into_iter()
            .filter(|(_, created)| *created > since)
            .max_by_key(|(_, created)| *created)
            .map(|(id, created)| Self {
                last_seen_id: id.map(String::from),
                last_seen_created: created,
            })
            .unwrap_or(self)
    }
}

/// The state a poller starting at `now` begins from.
///
/// Post times only have whole-second resolution, so everything up to the
/// end of the previous second counts as seen and posts from the second
/// the poller starts in are reported.
pub fn baseline(now: DateTime<Utc>) -> PollState {
    PollState::starting_at(now.trunc_subsecs(0) - TimeDelta::seconds(1))
}

/// Runs one poll cycle.
///
/// Fetches `request`, drops everything `state` has already seen, and
/// returns the next state along with the new posts that match `keywords`,
/// oldest first. The state advances past every new post, matching or not.
/// On error the caller should keep using `state`.
pub async fn poll_once<S: Search>(
    client: &S,
    request: &SearchRequest,
    keywords: &KeywordSet,
    state: &PollState,
) -> Result<(PollState, Vec<ResultRecord>), client::Error> {
    let posts = client.search(request).await?;

    let fresh: Vec<_> = posts
        .iter()
        .map(|post| (post, ResultRecord::from(post)))
        .filter(|(_, record)| state.is_unseen(record))
        .collect();
    debug!("{} of {} posts are new", fresh.len(), posts.len());

    let next = state
        .clone()
        .advance(fresh.iter().map(|(post, record)| (post.id(), record.created)));

    let mut matches: Vec<ResultRecord> = fresh
        .into_iter()
        .filter(|(post, _)| keywords.matches(*post))
        .map(|(_, record)| record)
        .collect();
    matches.sort_by_key(|record| record.created);

    Ok((next, matches))
}

/// Where the poller is in its cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollPhase {
    /// Not yet started.
    #[default]
    Idle,

    /// Fetching and reporting new posts.
    Polling,

    /// Waiting for the next poll.
    Sleeping,

    /// Shut down; the poller will not run again.
    Stopped,
}

/// Polls for new posts until told to stop.
#[derive(Debug)]
pub struct Poller<S: Search, C: Clock = SystemClock> {
    client: S,
    request: SearchRequest,
    keywords: KeywordSet,
    interval: Duration,
    clock: C,
    phase: PollPhase,
}

impl<S: Search> Poller<S, SystemClock> {
    /// Creates a poller that runs `request` every `interval` and reports
    /// posts matching `keywords`.
    pub fn new(client: S, request: SearchRequest, keywords: KeywordSet, interval: Duration) -> Self {
        Self::with_clock(client, request, keywords, interval, SystemClock)
    }
}

impl<S: Search, C: Clock> Poller<S, C> {
    /// Like [`Poller::new()`], but tells time with `clock`.
    pub fn with_clock(
        client: S,
        request: SearchRequest,
        keywords: KeywordSet,
        interval: Duration,
        clock: C,
    ) -> Self {
        Self {
            client,
            request,
            keywords,
            interval,
            clock,
            phase: PollPhase::Idle,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    fn transition(&mut self, phase: PollPhase) {
        debug!("Poller: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs the poll loop, emitting matches to `sink`, until `shutdown`
    /// completes.
    ///
    /// Only posts created from the second the loop starts are reported. A failed
    /// fetch is logged and retried on the next cycle; a failed write to
    /// `sink` ends the loop with an error. Returns the final state.
    pub async fn run<K, F>(&mut self, sink: &mut K, shutdown: F) -> Result<PollState, Error>
    where
        K: Sink,
        F: Future<Output = ()>,
    {
        let mut state = baseline(self.clock.now());
        tokio::pin!(shutdown);
        info!(
            "Polling r/{} every {}s",
            self.request.subreddit_path(),
            self.interval.as_secs()
        );

        loop {
            match self.phase {
                PollPhase::Idle => self.transition(PollPhase::Polling),
                PollPhase::Polling => {
                    let outcome = tokio::select! {
                        biased;
                        _ = &mut shutdown => None,
                        result = poll_once(&self.client, &self.request, &self.keywords, &state) => Some(result),
                    };
                    match outcome {
                        None => self.transition(PollPhase::Stopped),
                        Some(Ok((next, matches))) => {
                            sink.emit(&matches)?;
                            if !matches.is_empty() {
                                info!("Reported {} new posts", matches.len());
                            }
                            state = next;
                            self.transition(PollPhase::Sleeping);
                        }
                        Some(Err(err)) => {
                            error!("Poll failed, will retry: {err}");
                            self.transition(PollPhase::Sleeping);
                        }
                    }
                }
                PollPhase::Sleeping => {
                    let stopped = tokio::select! {
                        biased;
                        _ = &mut shutdown => true,
                        _ = tokio::time::sleep(self.interval) => false,
                    };
                    if stopped {
                        self.transition(PollPhase::Stopped);
                    } else {
                        self.transition(PollPhase::Polling);
                    }
                }
                PollPhase::Stopped => break,
            }
        }

        Ok(state)
    }
}
