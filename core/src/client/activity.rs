//! Activity recommendations.

use async_trait::async_trait;
use tracing::warn;

use crate::controller::Feature;
use crate::error::{QueryError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::ActivityQuery;
use crate::transport::{decode_list, encode, parse_json, Transport};
use crate::types::Activity;

const ACTIVITIES_PATH: &str = "/activities";
const RECOMMENDATIONS: &str = "recommendations";

/// Client for `POST /activities`.
#[derive(Debug, Clone)]
pub struct ActivityClient {
    transport: Transport,
}

impl ActivityClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn build_recommend(&self, query: &ActivityQuery) -> Result<HttpRequest, TransportError> {
        let body = encode(query)?;
        Ok(self.transport.build_request(HttpMethod::Post, ACTIVITIES_PATH, Some(body)))
    }

    /// A response without `recommendations` means nothing was found, not an error.
    pub fn parse_recommend(&self, response: HttpResponse) -> Result<Vec<Activity>, TransportError> {
        decode_list(parse_json(&response)?, RECOMMENDATIONS)
    }

    pub async fn recommend(&self, query: &ActivityQuery) -> Result<Vec<Activity>, TransportError> {
        let body = encode(query)?;
        self.transport
            .send(HttpMethod::Post, ACTIVITIES_PATH, Some(body))
            .await
            .and_then(|value| decode_list(value, RECOMMENDATIONS))
            .inspect_err(|error| warn!(country = %query.country, %error, "activity recommendations failed"))
    }
}

#[async_trait]
impl Feature for ActivityClient {
    type Query = ActivityQuery;
    type Output = Vec<Activity>;
    const NAME: &'static str = "activity search";

    fn check(&self, query: &ActivityQuery) -> Result<(), QueryError> {
        query.check()
    }

    async fn run(&self, query: &ActivityQuery) -> Result<Vec<Activity>, TransportError> {
        self.recommend(query).await
    }
}
