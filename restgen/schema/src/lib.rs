//! A GitHub REST client declared with restgen.
//!
//! The endpoints are declared as the [`github::GithubApi`] trait; the build
//! script generates [`github::GithubApiClient`] from it, along with the
//! serializers for the aliased enums.
//!
//! ## Example
//!
//! ```no_run
//! use restgen::ReqwestTransport;
//! use restgen_schema::github::{GithubApi, GithubApiClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::builder("https://api.github.com".parse()?)
//!     .bearer_token(std::env::var("GITHUB_TOKEN")?)
//!     .build()?;
//! let client = GithubApiClient::new(transport);
//! let user = client.user("octocat").await?;
//! println!("{} has id {}", user.login, user.id);
//! # Ok(())
//! # }
//! ```

pub mod github;
