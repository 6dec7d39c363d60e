//! Reddit API clients and services for communicating with Reddit over HTTP.

pub mod auth;
pub mod client;
pub mod service;

pub use client::{RedditClient, Search};
