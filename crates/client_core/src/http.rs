//! `reqwest` implementation of the persona and estudiante services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Estudiante, EstudianteId, Persona, PersonaId},
    error::ApiError,
};
use tracing::{debug, warn};

use crate::{
    error::{ServiceError, ServiceResult},
    EstudianteService, PersonaService,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> ServiceResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let body = ApiError::from_body(&raw).unwrap_or_default();
        warn!(
            status = status.as_u16(),
            error = body.error.as_deref().unwrap_or(""),
            detail = body.detail().unwrap_or(""),
            "backend rejected request"
        );
        Err(ServiceError::status(status.as_u16(), body))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like `fetch`, but an empty success body yields `fallback`.
    async fn fetch_or<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: T,
    ) -> ServiceResult<T> {
        let bytes = self.send(request).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(fallback);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PersonaService for HttpApiClient {
    async fn list_personas(&self) -> ServiceResult<Vec<Persona>> {
        debug!("GET personas");
        self.fetch(self.http.get(self.url("personas"))).await
    }

    async fn get_persona(&self, id: PersonaId) -> ServiceResult<Persona> {
        debug!(persona_id = id.0, "GET persona");
        self.fetch(self.http.get(self.url(&format!("personas/{id}"))))
            .await
    }

    async fn create_persona(&self, persona: &Persona) -> ServiceResult<Persona> {
        debug!("POST persona");
        self.fetch(self.http.post(self.url("personas")).json(persona))
            .await
    }

    async fn update_persona(&self, persona: &Persona, id: PersonaId) -> ServiceResult<Persona> {
        debug!(persona_id = id.0, "PUT persona");
        self.fetch(
            self.http
                .put(self.url(&format!("personas/{id}")))
                .json(persona),
        )
        .await
    }
}

#[async_trait]
impl EstudianteService for HttpApiClient {
    async fn list_estudiantes(&self) -> ServiceResult<Vec<Estudiante>> {
        debug!("GET estudiantes");
        self.fetch(self.http.get(self.url("estudiantes"))).await
    }

    async fn get_estudiante(&self, id: EstudianteId) -> ServiceResult<Estudiante> {
        debug!(estudiante_id = id.0, "GET estudiante");
        self.fetch(self.http.get(self.url(&format!("estudiantes/{id}"))))
            .await
    }

    async fn create_estudiante(&self, estudiante: &Estudiante) -> ServiceResult<Estudiante> {
        debug!(codigo = %estudiante.codigo, "POST estudiante");
        self.fetch_or(
            self.http.post(self.url("estudiantes")).json(estudiante),
            estudiante.clone(),
        )
        .await
    }

    async fn update_estudiante(&self, estudiante: &Estudiante) -> ServiceResult<Estudiante> {
        debug!(codigo = %estudiante.codigo, "PUT estudiante");
        self.fetch_or(
            self.http.put(self.url("estudiantes")).json(estudiante),
            estudiante.clone(),
        )
        .await
    }

    async fn delete_estudiante(&self, id: EstudianteId) -> ServiceResult<()> {
        debug!(estudiante_id = id.0, "DELETE estudiante");
        self.send(self.http.delete(self.url(&format!("estudiantes/{id}"))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
