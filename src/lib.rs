//! Client for the project keys (DSN) endpoints of the Sentry web API.
//!
//! ```no_run
//! # async fn run() -> sentry_project_keys::SentryResult<()> {
//! use sentry_project_keys::{CreateProjectKeyParams, ProjectKeysClient, SentryHttpClient};
//!
//! let keys = SentryHttpClient::new("auth-token")?.project_keys();
//! let key = keys
//!     .create("my-org", "my-project", &CreateProjectKeyParams::named("Backend"))
//!     .await?
//!     .into_inner();
//! println!("{}", key.dsn.public);
//! # Ok(())
//! # }
//! ```

pub use {
    api::{ApiResponse, HttpClientConfig, ResponseMeta, SentryError, SentryHttpClient, SentryResult},
    project_keys::{
        CreateProjectKeyParams, ProjectKey, ProjectKeyDsn, ProjectKeyRateLimit, ProjectKeysClient,
        ProjectKeysService, UpdateProjectKeyParams,
    },
};

pub mod api;
pub mod project_keys;
