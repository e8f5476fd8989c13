//! Client-constructed queries and their submission preconditions.
//!
//! Each query serializes directly as its request body. `check` enforces the
//! client-side preconditions; a query that fails it must not be sent.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::{Budget, Language, TranslationContext, TravelStyle};
use crate::error::QueryError;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn require_user_id(user_id: &str) -> Result<(), QueryError> {
    if is_blank(user_id) {
        return Err(QueryError::MissingUserId);
    }
    Ok(())
}

pub(crate) fn require_country(country: &str) -> Result<(), QueryError> {
    if is_blank(country) {
        return Err(QueryError::MissingCountry);
    }
    Ok(())
}

/// Request for activity recommendations in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub user_id: String,
    pub country: String,
    /// Unordered; sent as a JSON array.
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<NonZeroU32>,
}

impl ActivityQuery {
    pub fn new(user_id: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            country: country.into(),
            interests: BTreeSet::new(),
            duration_days: None,
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests.extend(interests.into_iter().map(Into::into));
        self
    }

    pub fn with_duration(mut self, days: NonZeroU32) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn check(&self) -> Result<(), QueryError> {
        require_user_id(&self.user_id)?;
        require_country(&self.country)
    }
}

/// Request for destination recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryQuery {
    pub user_id: String,
    #[serde(default)]
    pub budget: Budget,
    /// Must be selected before the query can be submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<TravelStyle>,
}

impl CountryQuery {
    pub fn new(user_id: impl Into<String>, budget: Budget, travel_style: TravelStyle) -> Self {
        Self {
            user_id: user_id.into(),
            budget,
            travel_style: Some(travel_style),
        }
    }

    pub fn check(&self) -> Result<(), QueryError> {
        require_user_id(&self.user_id)?;
        if self.travel_style.is_none() {
            return Err(QueryError::MissingTravelStyle);
        }
        Ok(())
    }
}

/// Request to translate a short phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationQuery {
    pub text: String,
    #[serde(default)]
    pub target_language: Language,
    /// `None` means a general context and is left off the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TranslationContext>,
}

impl TranslationQuery {
    pub fn new(text: impl Into<String>, target_language: Language) -> Self {
        Self {
            text: text.into(),
            target_language,
            context: None,
        }
    }

    pub fn in_context(mut self, context: TranslationContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn check(&self) -> Result<(), QueryError> {
        if is_blank(&self.text) {
            return Err(QueryError::MissingText);
        }
        Ok(())
    }
}
