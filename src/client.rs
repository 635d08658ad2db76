use crate::{
    config, errors,
    errors::ToResult,
    submission::{Submission, SubmissionId},
};
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Talks to the judge's REST API on behalf of the configured user.
pub struct ApiClient {
    http: reqwest::Client,
    config: config::Config,
}

impl ApiClient {
    pub fn new(config: config::Config) -> Result<ApiClient, errors::Error> {
        let http = reqwest::Client::builder()
            .build()
            .context_transport("Failed to initialize HTTP client")?;
        Ok(ApiClient { http, config })
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<T, errors::Error> {
        let url = self.config.api_url(path);
        debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, &url)
            .query(query)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(header::ACCEPT_LANGUAGE, &self.config.langs);
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .with_context_transport(|| format!("Request to {url} failed"))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context_transport(|| format!("Failed to read response from {url}"))?;
        debug!("{url} answered {status}, {} bytes", body.len());

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_slice(&body)
            .with_context_transport(|| format!("Unexpected response from {url}"))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, errors::Error> {
        self.request(Method::GET, path, query, None).await
    }

    /// Uploads a submission; the only attempt is the one made here.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmissionId, errors::Error> {
        let body = serde_json::to_vec(submission)
            .context_transport("Failed to serialize submission")?;
        let id: SubmissionId = self.request(Method::POST, "/submit", &[], Some(body)).await?;
        debug!("Submission accepted as #{id}");
        Ok(id)
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> errors::Error {
    errors::Api {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_is_verbatim() {
        let e = api_error(StatusCode::PAYLOAD_TOO_LARGE, b"code is too large");
        assert!(matches!(
            e,
            errors::Api { status: 413, ref body } if body == "code is too large"
        ));
    }
}
