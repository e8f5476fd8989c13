//! Feature clients for the travel service.
//!
//! # Design
//! One client per capability, all sharing a `Transport`. Each operation is
//! split into a pure `build_*` method that produces an `HttpRequest`, a pure
//! `parse_*` method that consumes an `HttpResponse`, and an async method
//! that goes through `Transport::send`. Clients add no error wrapping:
//! every network or decoding failure is the transport's `TransportError`.
//!
//! Recommendation and translation clients expect queries that already
//! passed their `check`; the controllers enforce that before calling in.
//! Profile calls have no controller in front of them and return
//! `ClientError::Rejected` for blank input without sending anything.

mod activity;
mod country;
mod profile;
mod translation;

pub use activity::ActivityClient;
pub use country::CountryClient;
pub use profile::{ProfileClient, ProfileLookup};
pub use translation::TranslationClient;

use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::transport::Transport;

/// `/users/{id}` with the id percent-encoded as a single path segment.
fn user_path(user_id: &str) -> String {
    format!("/users/{}", urlencoding::encode(user_id))
}

/// The four feature clients over one shared transport.
#[derive(Debug, Clone)]
pub struct TravelApi {
    pub activities: ActivityClient,
    pub countries: CountryClient,
    pub translations: TranslationClient,
    pub profiles: ProfileClient,
}

impl TravelApi {
    /// Clients over a `UreqExecutor` built from `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(Transport::from_config(config))
    }

    pub fn with_transport(transport: Transport) -> Self {
        Self {
            activities: ActivityClient::new(transport.clone()),
            countries: CountryClient::new(transport.clone()),
            translations: TranslationClient::new(transport.clone()),
            profiles: ProfileClient::new(transport),
        }
    }

    /// A fresh activity-search controller.
    pub fn activity_search(&self) -> Controller<ActivityClient> {
        Controller::new(self.activities.clone())
    }

    /// A fresh destination-search controller.
    pub fn destination_search(&self) -> Controller<CountryClient> {
        Controller::new(self.countries.clone())
    }

    /// A fresh translator controller.
    pub fn translator(&self) -> Controller<TranslationClient> {
        Controller::new(self.translations.clone())
    }

    /// A fresh controller for the visited-countries panel.
    pub fn visited_countries(&self) -> Controller<ProfileLookup> {
        Controller::new(ProfileLookup::new(self.profiles.clone()))
    }
}
