//! Error types for the travel API client.
//!
//! # Design
//! `TransportError` is the single failure taxonomy of the client layer: the
//! transport produces it, feature clients pass it through untouched, and
//! controllers store it in their `Failed` state. `QueryError` describes a
//! query that failed its client-side precondition and therefore never
//! reached the network. `ClientError` joins the two for calls that check
//! their own input instead of going through a controller.

use thiserror::Error;

/// Failure of one round-trip to the travel service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout or another network-level
    /// failure. No HTTP status was received.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a status outside 200..=299.
    #[error("service returned HTTP {0}")]
    HttpStatus(u16),

    /// A 2xx response whose body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be encoded as JSON.
    #[error("request encoding failed: {0}")]
    Encode(String),
}

/// A query rejected before any request was issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("a user id is required")]
    MissingUserId,

    #[error("a destination country is required")]
    MissingCountry,

    #[error("a travel style must be selected")]
    MissingTravelStyle,

    #[error("there is no text to translate")]
    MissingText,
}

/// Failure of a client call that validates its arguments itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected before any request was issued.
    #[error(transparent)]
    Rejected(#[from] QueryError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A string that is not a member of one of the closed token sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}
