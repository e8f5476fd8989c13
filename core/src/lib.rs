//! Client core for the travel companion service.
//!
//! # Overview
//! Builds requests for activity and destination recommendations,
//! translations and user profiles, runs them through a pluggable
//! `HttpExecutor`, and shapes the JSON answers into typed results. Per-feature
//! `Controller`s sequence user-initiated queries and publish their state to
//! whatever view observes them.
//!
//! # Design
//! - `Transport` owns the base address and the only I/O seam
//!   (`HttpExecutor`); request building and response parsing stay pure.
//! - Feature clients expose `build_*` / `parse_*` pairs plus one async
//!   operation each, and surface `TransportError` unchanged. Profile calls,
//!   which no controller guards, check their own input and return
//!   `ClientError`.
//! - A `Controller` runs at most one request at a time and discards late
//!   responses from superseded requests.
//! - No user id is held anywhere; every query carries its own.

pub mod catalog;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use catalog::{Budget, Language, TranslationContext, TravelStyle, INTEREST_SUGGESTIONS};
pub use client::{
    ActivityClient, CountryClient, ProfileClient, ProfileLookup, TranslationClient, TravelApi,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use controller::{Controller, Feature, Phase, Snapshot, Submission};
pub use error::{ClientError, QueryError, TransportError, UnknownToken};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{ActivityQuery, CountryQuery, TranslationQuery};
pub use transport::{HttpExecutor, Transport, UreqExecutor};
pub use types::{
    Activity, CountryRecommendation, ProfileUpdate, Translation, UserProfile, VisitRecord,
};

/// Activity search controller.
pub type ActivitySearch = Controller<ActivityClient>;

/// Destination search controller.
pub type DestinationSearch = Controller<CountryClient>;

/// Translator controller.
pub type Translator = Controller<TranslationClient>;

/// Controller behind the "countries you've visited" panel.
pub type VisitedCountries = Controller<ProfileLookup>;
