//! Destination recommendations.

use async_trait::async_trait;
use tracing::warn;

use super::ProfileClient;
use crate::controller::Feature;
use crate::error::{ClientError, QueryError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::CountryQuery;
use crate::transport::{decode_list, encode, parse_json, Transport};
use crate::types::{CountryRecommendation, UserProfile};

const RECOMMEND_PATH: &str = "/recommend-countries";
const RECOMMENDATIONS: &str = "recommendations";

/// Client for `POST /recommend-countries`. The destination view also reads
/// the user's profile, which goes through a `ProfileClient` on the same
/// transport.
#[derive(Debug, Clone)]
pub struct CountryClient {
    transport: Transport,
    profiles: ProfileClient,
}

impl CountryClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            profiles: ProfileClient::new(transport.clone()),
            transport,
        }
    }

    pub fn build_recommend(&self, query: &CountryQuery) -> Result<HttpRequest, TransportError> {
        let body = encode(query)?;
        Ok(self.transport.build_request(HttpMethod::Post, RECOMMEND_PATH, Some(body)))
    }

    /// A response without `recommendations` is an empty result.
    pub fn parse_recommend(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<CountryRecommendation>, TransportError> {
        decode_list(parse_json(&response)?, RECOMMENDATIONS)
    }

    pub async fn recommend(
        &self,
        query: &CountryQuery,
    ) -> Result<Vec<CountryRecommendation>, TransportError> {
        let body = encode(query)?;
        self.transport
            .send(HttpMethod::Post, RECOMMEND_PATH, Some(body))
            .await
            .and_then(|value| decode_list(value, RECOMMENDATIONS))
            .inspect_err(|error| warn!(budget = %query.budget, %error, "country recommendations failed"))
    }

    /// Same contract as `ProfileClient::fetch`.
    pub async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ClientError> {
        self.profiles.fetch(user_id).await
    }
}

#[async_trait]
impl Feature for CountryClient {
    type Query = CountryQuery;
    type Output = Vec<CountryRecommendation>;
    const NAME: &'static str = "destination search";

    fn check(&self, query: &CountryQuery) -> Result<(), QueryError> {
        query.check()
    }

    async fn run(&self, query: &CountryQuery) -> Result<Vec<CountryRecommendation>, TransportError> {
        self.recommend(query).await
    }
}
