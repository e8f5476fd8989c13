use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub estimated_cost: String,
    pub best_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryRecommendation {
    pub country: String,
    pub reason: String,
    pub highlights: Vec<String>,
    pub best_for: String,
    pub estimated_budget: String,
    pub best_season: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,
    pub pronunciation: String,
    pub cultural_note: String,
    pub formality: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub country: String,
    pub visit_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub visited_countries: Vec<String>,
    pub preferences: Map<String, Value>,
    pub travel_history: Vec<VisitRecord>,
}

impl UserProfile {
    fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            visited_countries: Vec::new(),
            preferences: Map::new(),
            travel_history: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Recommendations<T> {
    pub recommendations: Vec<T>,
}

#[derive(Serialize, Deserialize)]
pub struct VisitedCountries {
    pub visited_countries: Vec<String>,
}

#[derive(Deserialize)]
pub struct ActivityRequest {
    pub user_id: String,
    pub country: String,
    #[serde(default)]
    pub interests: Vec<String>,
    pub duration_days: Option<u32>,
}

#[derive(Deserialize)]
pub struct CountryRequest {
    pub user_id: String,
    pub budget: Option<String>,
    pub travel_style: Option<String>,
}

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
    pub context: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub visited_countries: Option<Vec<String>>,
    pub preferences: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct VisitParams {
    pub country: String,
    pub visit_date: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, UserProfile>>>;

/// Destinations the mock service knows: country, matching styles, best season.
const DESTINATIONS: &[(&str, &[&str], &str)] = &[
    ("Japan", &["cultural", "foodie", "urban"], "Spring"),
    ("Italy", &["cultural", "foodie", "relaxation"], "Autumn"),
    ("Thailand", &["beach", "foodie", "relaxation"], "November-February"),
    ("Peru", &["adventure", "cultural"], "May-September"),
    ("Portugal", &["beach", "urban", "relaxation"], "Late spring"),
    ("Iceland", &["adventure"], "Summer"),
];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/activities", post(recommend_activities))
        .route("/recommend-countries", post(recommend_countries))
        .route("/translate", post(translate))
        .route("/users/{id}", get(get_profile).put(update_profile))
        .route("/users/{id}/visited", post(add_visited));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn recommend_activities(Json(input): Json<ActivityRequest>) -> Json<Recommendations<Activity>> {
    debug!(user_id = %input.user_id, country = %input.country, "activity request");
    let mut interests = input.interests;
    if interests.is_empty() {
        interests.push("Culture".to_string());
    }
    if let Some(days) = input.duration_days {
        interests.truncate(days.max(1) as usize);
    }
    let country = input.country.trim();
    let recommendations = interests
        .iter()
        .map(|interest| Activity {
            name: format!("{interest} tour of {country}"),
            description: format!("A guided introduction to {} in {country}.", interest.to_lowercase()),
            category: interest.clone(),
            location: country.to_string(),
            estimated_cost: "$40".to_string(),
            best_time: "Morning".to_string(),
            tips: (interest == "Food").then(|| "Arrive hungry".to_string()),
        })
        .collect();
    Json(Recommendations { recommendations })
}

async fn recommend_countries(
    State(db): State<Db>,
    Json(input): Json<CountryRequest>,
) -> Json<Recommendations<CountryRecommendation>> {
    let visited = db
        .read()
        .await
        .get(&input.user_id)
        .map(|profile| profile.visited_countries.clone())
        .unwrap_or_default();
    let style = input.travel_style.unwrap_or_default();
    let budget = input.budget.unwrap_or_else(|| "100-300".to_string());

    let matches: Vec<&str> = DESTINATIONS
        .iter()
        .filter(|(_, styles, _)| style.is_empty() || styles.contains(&style.as_str()))
        .map(|(country, _, _)| *country)
        .collect();
    let recommendations = DESTINATIONS
        .iter()
        .filter(|(country, _, _)| matches.contains(country))
        .filter(|(country, _, _)| !visited.iter().any(|v| v.eq_ignore_ascii_case(country)))
        .map(|(country, styles, season)| CountryRecommendation {
            country: country.to_string(),
            reason: format!("Great for {} travellers on a {budget} budget.", styles.join(", ")),
            highlights: vec![
                format!("{country} old town"),
                format!("{country} countryside"),
                format!("{country} markets"),
            ],
            best_for: styles.join(", "),
            estimated_budget: budget.clone(),
            best_season: season.to_string(),
            similar_to: matches.iter().find(|other| *other != country).map(|s| s.to_string()),
        })
        .collect();
    Json(Recommendations { recommendations })
}

async fn translate(Json(input): Json<TranslateRequest>) -> Result<Json<Translation>, StatusCode> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let (cultural_note, formality) = match input.context.as_deref() {
        Some(context) => (format!("Phrased for {context}."), "polite"),
        None => ("Suitable for most everyday situations.".to_string(), "neutral"),
    };
    Ok(Json(Translation {
        translation: format!("[{}] {text}", input.target_language),
        pronunciation: text.to_lowercase(),
        cultural_note,
        formality: formality.to_string(),
    }))
}

async fn get_profile(State(db): State<Db>, Path(id): Path<String>) -> Json<UserProfile> {
    let profiles = db.read().await;
    Json(profiles.get(&id).cloned().unwrap_or_else(|| UserProfile::empty(&id)))
}

async fn update_profile(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ProfileUpdate>,
) -> Json<UserProfile> {
    let mut profiles = db.write().await;
    let profile = profiles
        .entry(id.clone())
        .or_insert_with(|| UserProfile::empty(&id));
    if let Some(visited) = input.visited_countries {
        profile.visited_countries = visited;
    }
    if let Some(preferences) = input.preferences {
        profile.preferences = preferences;
    }
    Json(profile.clone())
}

async fn add_visited(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<VisitParams>,
) -> Result<Json<VisitedCountries>, StatusCode> {
    let country = params.country.trim();
    if country.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut profiles = db.write().await;
    let profile = profiles
        .entry(id.clone())
        .or_insert_with(|| UserProfile::empty(&id));
    if !profile.visited_countries.iter().any(|v| v == country) {
        profile.visited_countries.push(country.to_string());
    }
    if let Some(visit_date) = params.visit_date {
        profile.travel_history.push(VisitRecord {
            country: country.to_string(),
            visit_date,
        });
    }
    Ok(Json(VisitedCountries {
        visited_countries: profile.visited_countries.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_serializes_every_field() {
        let json = serde_json::to_value(UserProfile::empty("u1")).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["visited_countries"], serde_json::json!([]));
        assert_eq!(json["preferences"], serde_json::json!({}));
        assert_eq!(json["travel_history"], serde_json::json!([]));
    }

    #[test]
    fn activity_request_defaults_interests() {
        let input: ActivityRequest =
            serde_json::from_str(r#"{"user_id":"u1","country":"Japan"}"#).unwrap();
        assert!(input.interests.is_empty());
        assert!(input.duration_days.is_none());
    }

    #[test]
    fn activity_request_rejects_missing_country() {
        let result: Result<ActivityRequest, _> = serde_json::from_str(r#"{"user_id":"u1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn profile_update_all_fields_optional() {
        let input: ProfileUpdate = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.visited_countries.is_none());
        assert!(input.preferences.is_none());
    }

    #[test]
    fn activity_without_tips_omits_field() {
        let activity = Activity {
            name: "Hike".to_string(),
            description: "Up".to_string(),
            category: "Nature".to_string(),
            location: "Alps".to_string(),
            estimated_cost: "$0".to_string(),
            best_time: "Dawn".to_string(),
            tips: None,
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert!(json.get("tips").is_none());
    }
}
