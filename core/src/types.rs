//! Contract types returned by the travel service.
//!
//! # Design
//! Result records mirror the service's JSON and are decoded strictly: a
//! missing required field makes the whole response malformed. Fields the
//! service may omit are `Option` or `#[serde(default)]`, never both.
//! The mock-server crate defines its own copies of these shapes; the
//! integration tests catch drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::Budget;

/// A recommended activity at a destination. All text is free-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub estimated_cost: String,
    pub best_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// A recommended destination country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecommendation {
    pub country: String,
    pub reason: String,
    /// Display order as sent by the service.
    pub highlights: Vec<String>,
    pub best_for: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_budget: Option<String>,
    pub best_season: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<String>,
}

impl CountryRecommendation {
    /// The service's budget estimate, or the requested range when it sent none.
    pub fn budget_or(&self, requested: Budget) -> &str {
        self.estimated_budget.as_deref().unwrap_or(requested.as_str())
    }
}

/// A translated phrase with usage guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,
    pub pronunciation: String,
    pub cultural_note: String,
    pub formality: String,
}

/// One entry of a user's travel history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub country: String,
    pub visit_date: String,
}

/// A user's travel profile as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub visited_countries: Vec<String>,
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default)]
    pub travel_history: Vec<VisitRecord>,
}

impl UserProfile {
    pub fn has_visited(&self, country: &str) -> bool {
        self.visited_countries
            .iter()
            .any(|visited| visited.eq_ignore_ascii_case(country.trim()))
    }
}

/// Partial profile update. Only the fields present are sent; omitted fields
/// remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Map<String, Value>>,
}
