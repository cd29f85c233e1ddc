mod client;

pub use client::{authorizes, GithubReleases};
