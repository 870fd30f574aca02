//! HTTP adapter for the itinerary service.
use async_trait::async_trait;
use navisense_planner::{
    PlanError, PlanRequest, PlanResponse, PlanTransport, PlannerConfig, interpret_response,
};

/// Posts plan requests as JSON to `{api_base}/generate-plan`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Fails when the TLS backend or client cannot be initialised.
    pub fn new(config: &PlannerConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            url: config.generate_url(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PlanTransport for HttpTransport {
    async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError> {
        log::debug!("POST {} ({} -> {})", self.url, request.origin, request.destination);
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| PlanError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PlanError::network(e.to_string()))?;
        interpret_response(status, &body)
    }
}
