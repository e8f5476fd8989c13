//! User profile reads and updates, and the visited-countries lookup built
//! on them.

use async_trait::async_trait;
use tracing::warn;

use super::user_path;
use crate::controller::Feature;
use crate::error::{ClientError, QueryError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{require_country, require_user_id};
use crate::transport::{decode, decode_list, encode, parse_json, Transport};
use crate::types::{ProfileUpdate, UserProfile};

const VISITED_COUNTRIES: &str = "visited_countries";

/// Client for the `/users/{id}` endpoints.
///
/// The profile is owned by the service: every call returns the service's
/// authoritative copy and nothing is merged or cached locally. No controller
/// sits in front of these calls, so each one rejects a blank user id or
/// country before anything is sent.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    transport: Transport,
}

impl ProfileClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn build_fetch(&self, user_id: &str) -> Result<HttpRequest, QueryError> {
        require_user_id(user_id)?;
        Ok(self.transport.build_request(HttpMethod::Get, &user_path(user_id), None))
    }

    /// Missing collections default to empty; a body without `user_id` is malformed.
    pub fn parse_fetch(&self, response: HttpResponse) -> Result<UserProfile, TransportError> {
        decode(parse_json(&response)?)
    }

    pub async fn fetch(&self, user_id: &str) -> Result<UserProfile, ClientError> {
        require_user_id(user_id)?;
        Ok(self.load(user_id).await?)
    }

    /// `fetch` for an id the caller has already checked.
    pub(crate) async fn load(&self, user_id: &str) -> Result<UserProfile, TransportError> {
        self.transport
            .send(HttpMethod::Get, &user_path(user_id), None)
            .await
            .and_then(decode)
            .inspect_err(|error| warn!(user_id, %error, "fetching user profile failed"))
    }

    pub fn build_update(&self, user_id: &str, update: &ProfileUpdate) -> Result<HttpRequest, ClientError> {
        require_user_id(user_id)?;
        let body = encode(update)?;
        Ok(self
            .transport
            .build_request(HttpMethod::Put, &user_path(user_id), Some(body)))
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<UserProfile, TransportError> {
        decode(parse_json(&response)?)
    }

    pub async fn update(&self, user_id: &str, update: &ProfileUpdate) -> Result<UserProfile, ClientError> {
        require_user_id(user_id)?;
        let body = encode(update)?;
        let profile: UserProfile = self
            .transport
            .send(HttpMethod::Put, &user_path(user_id), Some(body))
            .await
            .and_then(decode)
            .inspect_err(|error| warn!(user_id, %error, "updating user profile failed"))?;
        Ok(profile)
    }

    /// `country` and `visit_date` travel as query parameters; there is no body.
    pub fn build_add_visited(
        &self,
        user_id: &str,
        country: &str,
        visit_date: Option<&str>,
    ) -> Result<HttpRequest, QueryError> {
        let path = visited_path(user_id, country, visit_date)?;
        Ok(self.transport.build_request(HttpMethod::Post, &path, None))
    }

    /// Returns the updated visited list. An absent list is empty.
    pub fn parse_add_visited(&self, response: HttpResponse) -> Result<Vec<String>, TransportError> {
        decode_list(parse_json(&response)?, VISITED_COUNTRIES)
    }

    pub async fn add_visited(
        &self,
        user_id: &str,
        country: &str,
        visit_date: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        let path = visited_path(user_id, country, visit_date)?;
        let visited = self
            .transport
            .send(HttpMethod::Post, &path, None)
            .await
            .and_then(|value| decode_list(value, VISITED_COUNTRIES))
            .inspect_err(|error| warn!(user_id, country, %error, "adding visited country failed"))?;
        Ok(visited)
    }
}

fn visited_path(user_id: &str, country: &str, visit_date: Option<&str>) -> Result<String, QueryError> {
    require_user_id(user_id)?;
    require_country(country)?;
    let mut path = format!(
        "{}/visited?country={}",
        user_path(user_id),
        urlencoding::encode(country)
    );
    if let Some(date) = visit_date {
        path.push_str("&visit_date=");
        path.push_str(&urlencoding::encode(date));
    }
    Ok(path)
}

/// Loads the profile whose visited countries the destination view shows.
/// The query is the user id.
#[derive(Debug, Clone)]
pub struct ProfileLookup {
    profiles: ProfileClient,
}

impl ProfileLookup {
    pub fn new(profiles: ProfileClient) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl Feature for ProfileLookup {
    type Query = String;
    type Output = UserProfile;
    const NAME: &'static str = "profile lookup";

    fn check(&self, user_id: &String) -> Result<(), QueryError> {
        require_user_id(user_id)
    }

    async fn run(&self, user_id: &String) -> Result<UserProfile, TransportError> {
        self.profiles.load(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Submission;
    use crate::testing::{stub_transport, StubExecutor};
    use crate::VisitedCountries;
    use serde_json::{json, Map};

    fn client(stub: &std::sync::Arc<StubExecutor>) -> ProfileClient {
        ProfileClient::new(stub_transport(stub))
    }

    #[test]
    fn build_fetch_encodes_user_id() {
        let stub = StubExecutor::new();
        let req = client(&stub).build_fetch("ana maria").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/users/ana%20maria");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_update_sends_only_provided_fields() {
        let stub = StubExecutor::new();
        let mut preferences = Map::new();
        preferences.insert("diet".to_string(), json!("vegetarian"));
        let update = ProfileUpdate {
            visited_countries: None,
            preferences: Some(preferences),
        };
        let req = client(&stub).build_update("u1", &update).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/users/u1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"preferences": {"diet": "vegetarian"}}));
    }

    #[test]
    fn build_add_visited_encodes_query_parameters() {
        let stub = StubExecutor::new();
        let req = client(&stub)
            .build_add_visited("u1", "Côte d'Ivoire", Some("2024-03-01"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "http://localhost:8000/api/users/u1/visited?country=C%C3%B4te%20d%27Ivoire&visit_date=2024-03-01"
        );
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());

        let req = client(&stub).build_add_visited("u1", "Chile", None).unwrap();
        assert_eq!(req.url, "http://localhost:8000/api/users/u1/visited?country=Chile");
    }

    #[test]
    fn build_rejects_blank_ids_and_countries() {
        let stub = StubExecutor::new();
        let client = client(&stub);
        assert_eq!(client.build_fetch("").unwrap_err(), QueryError::MissingUserId);
        assert_eq!(
            client.build_add_visited("u1", "  ", None).unwrap_err(),
            QueryError::MissingCountry
        );
        assert_eq!(
            client.build_update(" ", &ProfileUpdate::default()).unwrap_err(),
            ClientError::Rejected(QueryError::MissingUserId)
        );
    }

    #[tokio::test]
    async fn blank_input_sends_nothing() {
        let stub = StubExecutor::new();
        let client = client(&stub);

        let err = client.add_visited("  ", "", None).await.unwrap_err();
        assert_eq!(err, ClientError::Rejected(QueryError::MissingUserId));
        let err = client.add_visited("u1", "", None).await.unwrap_err();
        assert_eq!(err, ClientError::Rejected(QueryError::MissingCountry));
        let err = client.fetch("").await.unwrap_err();
        assert_eq!(err, ClientError::Rejected(QueryError::MissingUserId));
        let err = client.update("\t", &ProfileUpdate::default()).await.unwrap_err();
        assert_eq!(err, ClientError::Rejected(QueryError::MissingUserId));

        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn fetch_defaults_missing_fields() {
        let stub = StubExecutor::new();
        stub.reply(200, r#"{"user_id":"u1","visited_countries":["Japan","Italy"]}"#);
        let profile = client(&stub).fetch("u1").await.unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.visited_countries, vec!["Japan", "Italy"]);
        assert!(profile.preferences.is_empty());
        assert!(profile.travel_history.is_empty());
    }

    #[tokio::test]
    async fn fetch_without_visited_is_empty() {
        let stub = StubExecutor::new();
        stub.reply(200, r#"{"user_id":"u1"}"#);
        let profile = client(&stub).fetch("u1").await.unwrap();
        assert!(profile.visited_countries.is_empty());
    }

    #[tokio::test]
    async fn fetch_without_user_id_is_malformed() {
        let stub = StubExecutor::new();
        stub.reply(200, r#"{"visited_countries":["Japan"]}"#);
        let err = client(&stub).fetch("u1").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn update_returns_service_profile_verbatim() {
        let stub = StubExecutor::new();
        stub.reply(
            200,
            r#"{"user_id":"u1","visited_countries":["Japan","Peru"],"preferences":{"pace":"slow"},
                "travel_history":[{"country":"Peru","visit_date":"2023-07-14"}]}"#,
        );
        let update = ProfileUpdate {
            visited_countries: Some(vec!["Peru".to_string()]),
            preferences: None,
        };
        let profile = client(&stub).update("u1", &update).await.unwrap();
        assert_eq!(profile.visited_countries, vec!["Japan", "Peru"]);
        assert_eq!(profile.preferences["pace"], "slow");
        assert_eq!(profile.travel_history[0].visit_date, "2023-07-14");
    }

    #[tokio::test]
    async fn add_visited_returns_updated_list() {
        let stub = StubExecutor::new();
        stub.reply(200, r#"{"visited_countries":["Japan","Chile"]}"#);
        let client = client(&stub);
        let visited = client.add_visited("u1", "Chile", None).await.unwrap();
        assert_eq!(visited, vec!["Japan", "Chile"]);
        assert_eq!(
            stub.requests(),
            vec![client.build_add_visited("u1", "Chile", None).unwrap()]
        );
    }

    #[tokio::test]
    async fn add_visited_surfaces_status() {
        let stub = StubExecutor::new();
        stub.reply(422, r#"{"detail":"unknown country"}"#);
        let err = client(&stub).add_visited("u1", "Atlantis", None).await.unwrap_err();
        assert_eq!(err, ClientError::Transport(TransportError::HttpStatus(422)));
    }

    #[tokio::test]
    async fn visited_countries_view_loads_profile() {
        let stub = StubExecutor::new();
        stub.reply(200, r#"{"user_id":"u1","visited_countries":["Kenya"]}"#);
        let view = VisitedCountries::new(ProfileLookup::new(client(&stub)));

        assert_eq!(
            view.submit(String::new()).await,
            Submission::Rejected(QueryError::MissingUserId)
        );
        assert_eq!(view.submit("u1".to_string()).await, Submission::Applied);
        let phase = view.phase();
        assert_eq!(phase.result().unwrap().visited_countries, vec!["Kenya"]);
        assert_eq!(stub.requests().len(), 1);
    }
}
