//! Phrase translation.

use async_trait::async_trait;
use tracing::warn;

use crate::controller::Feature;
use crate::error::{QueryError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::TranslationQuery;
use crate::transport::{decode, encode, parse_json, Transport};
use crate::types::Translation;

const TRANSLATE_PATH: &str = "/translate";

/// Client for `POST /translate`.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    transport: Transport,
}

impl TranslationClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn build_translate(&self, query: &TranslationQuery) -> Result<HttpRequest, TransportError> {
        let body = encode(query)?;
        Ok(self.transport.build_request(HttpMethod::Post, TRANSLATE_PATH, Some(body)))
    }

    /// The whole body is the translation. Unlike the recommendation lists
    /// there is no empty default, so a missing field is malformed.
    pub fn parse_translate(&self, response: HttpResponse) -> Result<Translation, TransportError> {
        decode(parse_json(&response)?)
    }

    pub async fn translate(&self, query: &TranslationQuery) -> Result<Translation, TransportError> {
        let body = encode(query)?;
        self.transport
            .send(HttpMethod::Post, TRANSLATE_PATH, Some(body))
            .await
            .and_then(decode)
            .inspect_err(|error| {
                warn!(language = %query.target_language, %error, "translation failed")
            })
    }
}

#[async_trait]
impl Feature for TranslationClient {
    type Query = TranslationQuery;
    type Output = Translation;
    const NAME: &'static str = "translator";

    fn check(&self, query: &TranslationQuery) -> Result<(), QueryError> {
        query.check()
    }

    async fn run(&self, query: &TranslationQuery) -> Result<Translation, TransportError> {
        self.translate(query).await
    }
}
