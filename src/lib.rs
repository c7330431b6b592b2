//! replacer-bot - automated replace-and-publish runs against GitLab
//!
//! Clones a repository branch into a fresh workspace, runs an external
//! replace tool over it, commits and pushes the result on a derived working
//! branch, and produces a pre-filled merge-request link.

pub mod browser;
pub mod error;
pub mod gitlab;
pub mod pipeline;
pub mod repo;
pub mod request;
pub mod transform;
pub mod workspace;
