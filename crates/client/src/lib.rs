//! Bloodlink HTTP Client
//!
//! A native Rust client for the collaborators behind the blood request
//! workflow: request intake, the donor directory, and bulk donor notification.
//!
//! # Quick Start
//!
//! ```no_run
//! use bloodlink_client::{BloodBankApi, BloodBankClient, Reply};
//! use bloodlink_core::SearchParameters;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bloodlink_client::Error> {
//!     let client = BloodBankClient::new("http://localhost:8080");
//!
//!     let params = SearchParameters::new("O-", "Chennai");
//!     match client.find_donors(&params).await? {
//!         Reply::Accepted(donors) => println!("{} donors", donors.len()),
//!         Reply::Rejected(r) => println!("rejected: {:?}", r.message),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Timeouts
//!
//! Create and find calls share one timeout (10 seconds by default). The bulk
//! notify call gets its own, longer timeout (60 seconds by default) because
//! the collaborator sends every email before answering.
//!
//! ```no_run
//! use bloodlink_client::BloodBankClientBuilder;
//! use std::time::Duration;
//!
//! let client = BloodBankClientBuilder::new("http://localhost:8080")
//!     .request_timeout(Duration::from_secs(5))
//!     .notify_timeout(Duration::from_secs(120))
//!     .build()
//!     .unwrap();
//! ```

mod api;
mod donors;
mod error;
mod intake;
pub mod mock;
mod notify;
mod reply;

pub use api::BloodBankApi;
pub use error::Error;
pub use mock::{MockBloodBankApi, RecordedCall, Scripted};
pub use reply::{Acknowledgement, REQUEST_ACKNOWLEDGEMENT, Rejection, Reply};

use std::time::Duration;

use async_trait::async_trait;
use bloodlink_core::{BloodRequest, Donor, NotificationOutcome, NotificationRequest, SearchParameters};
use reqwest::Client;

/// Default timeout for request-intake and donor-directory calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for the bulk notify call.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Bloodlink collaborators.
#[derive(Debug, Clone)]
pub struct BloodBankClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    notify_timeout: Duration,
}

/// Builder for configuring a [`BloodBankClient`].
#[derive(Debug)]
pub struct BloodBankClientBuilder {
    base_url: String,
    request_timeout: Duration,
    notify_timeout: Duration,
    client: Option<Client>,
}

impl BloodBankClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            client: None,
        }
    }

    /// Set the timeout for create and find calls.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the timeout for the bulk notify call.
    #[must_use]
    pub fn notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings. The
    /// per-call timeouts above still apply.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BloodBankClient, Error> {
        if self.base_url.is_empty() {
            return Err(Error::Configuration("base URL must not be empty".into()));
        }
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(BloodBankClient {
            client,
            base_url: self.base_url,
            request_timeout: self.request_timeout,
            notify_timeout: self.notify_timeout,
        })
    }
}

impl BloodBankClient {
    /// Create a new client with default configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bloodlink_client::BloodBankClient;
    ///
    /// let client = BloodBankClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        BloodBankClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> BloodBankClientBuilder {
        BloodBankClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout applied to create and find calls.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Timeout applied to the bulk notify call.
    pub fn notify_timeout(&self) -> Duration {
        self.notify_timeout
    }
}

#[async_trait]
impl BloodBankApi for BloodBankClient {
    async fn create_request(&self, request: &BloodRequest) -> Result<Reply<Acknowledgement>, Error> {
        self.submit_request(request).await
    }

    async fn find_donors(&self, params: &SearchParameters) -> Result<Reply<Vec<Donor>>, Error> {
        self.list_donors(params).await
    }

    async fn notify_donors(
        &self,
        request: &NotificationRequest,
    ) -> Result<Reply<NotificationOutcome>, Error> {
        self.send_notifications(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_trims_trailing_slash_and_keeps_defaults() {
        let client = BloodBankClientBuilder::new("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(client.notify_timeout(), DEFAULT_NOTIFY_TIMEOUT);
    }

    #[test]
    fn notify_timeout_is_longer_by_default() {
        assert!(DEFAULT_NOTIFY_TIMEOUT > DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn empty_base_url_is_a_configuration_error() {
        let err = BloodBankClientBuilder::new("/").build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
