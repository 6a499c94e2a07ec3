use async_trait::async_trait;
use shared::{
    domain::{Estudiante, EstudianteId, Persona, PersonaId},
    protocol::{Confirmation, Notification},
};

mod controller;
pub mod dialog;
pub mod error;
pub mod http;
pub mod validation;

pub use controller::{messages, EstudianteController};
pub use dialog::{DialogMode, DialogState};
pub use error::{ServiceError, ServiceResult};
pub use http::HttpApiClient;

#[async_trait]
pub trait PersonaService: Send + Sync {
    async fn list_personas(&self) -> ServiceResult<Vec<Persona>>;
    async fn get_persona(&self, id: PersonaId) -> ServiceResult<Persona>;
    /// Returns the stored record, including its server-assigned id.
    async fn create_persona(&self, persona: &Persona) -> ServiceResult<Persona>;
    async fn update_persona(&self, persona: &Persona, id: PersonaId) -> ServiceResult<Persona>;
}

#[async_trait]
pub trait EstudianteService: Send + Sync {
    async fn list_estudiantes(&self) -> ServiceResult<Vec<Estudiante>>;
    /// The returned record is expected to embed its persona.
    async fn get_estudiante(&self, id: EstudianteId) -> ServiceResult<Estudiante>;
    async fn create_estudiante(&self, estudiante: &Estudiante) -> ServiceResult<Estudiante>;
    async fn update_estudiante(&self, estudiante: &Estudiante) -> ServiceResult<Estudiante>;
    async fn delete_estudiante(&self, id: EstudianteId) -> ServiceResult<()>;
}

/// Sink for transient, non-blocking user messages.
pub trait Notifier: Send + Sync {
    fn add(&self, notification: Notification);
}

/// Resolves to `true` only when the user explicitly accepts.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, confirmation: &Confirmation) -> bool;
}

/// Confirmer that accepts every prompt without asking.
pub struct AcceptAll;

#[async_trait]
impl Confirmer for AcceptAll {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        tracing::debug!(header = %confirmation.header, "auto-accepting confirmation");
        true
    }
}
