//! Student management workflows: list, create, edit and delete of
//! estudiante/persona pairs, plus the transient dialog state around them.

use std::sync::Arc;

use shared::{
    domain::{Estudiante, EstudianteId, Persona},
    protocol::{Confirmation, Notification},
};
use tracing::{debug, info, warn};

use crate::{
    dialog::{DialogMode, DialogState},
    error::ServiceError,
    validation, Confirmer, EstudianteService, Notifier, PersonaService,
};

pub mod messages {
    pub const REGISTERED: &str = "Estudiante Registrado";
    pub const UPDATED: &str = "Estudiante Actualizado";
    pub const DELETED: &str = "Estudiante Eliminado";

    pub const LOAD_ESTUDIANTES_FAILED: &str = "Error al cargar estudiantes";
    pub const LOAD_PERSONAS_FAILED: &str = "Error al cargar personas";
    pub const LOAD_ESTUDIANTE_FAILED: &str = "Error al cargar el estudiante";
    pub const CREATE_PERSONA_FAILED: &str = "No se pudo agregar la persona";
    pub const CREATE_ESTUDIANTE_FAILED: &str = "No se pudo agregar el estudiante";
    pub const UPDATE_PERSONA_FAILED: &str = "No se pudo actualizar la persona";
    pub const UPDATE_ESTUDIANTE_FAILED: &str = "No se pudo actualizar el estudiante";
    pub const DELETE_ESTUDIANTE_FAILED: &str = "No se pudo eliminar el estudiante";

    pub const DELETE_HEADER: &str = "Confirmar Eliminación";
    pub const DELETE_MESSAGE: &str = "¿Está seguro de que desea eliminar este estudiante?";
}

pub struct EstudianteController {
    persona_service: Arc<dyn PersonaService>,
    estudiante_service: Arc<dyn EstudianteService>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    estudiantes: Vec<Estudiante>,
    personas: Vec<Persona>,
    dialog: DialogState,
    estudiante: Estudiante,
    persona: Persona,
}

impl EstudianteController {
    pub fn new(
        persona_service: Arc<dyn PersonaService>,
        estudiante_service: Arc<dyn EstudianteService>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            persona_service,
            estudiante_service,
            notifier,
            confirmer,
            estudiantes: Vec::new(),
            personas: Vec::new(),
            dialog: DialogState::default(),
            estudiante: Estudiante::default(),
            persona: Persona::default(),
        }
    }

    pub fn estudiantes(&self) -> &[Estudiante] {
        &self.estudiantes
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn estudiante(&self) -> &Estudiante {
        &self.estudiante
    }

    pub fn estudiante_mut(&mut self) -> &mut Estudiante {
        &mut self.estudiante
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn persona_mut(&mut self) -> &mut Persona {
        &mut self.persona
    }

    /// Loads both lists. The two fetches run concurrently and fail
    /// independently of each other.
    pub async fn initialize(&mut self) {
        let (estudiantes, personas) = futures::join!(
            self.estudiante_service.list_estudiantes(),
            self.persona_service.list_personas()
        );
        self.apply_estudiantes(estudiantes);
        self.apply_personas(personas);
    }

    pub async fn refresh_estudiantes(&mut self) {
        let result = self.estudiante_service.list_estudiantes().await;
        self.apply_estudiantes(result);
    }

    pub async fn refresh_personas(&mut self) {
        let result = self.persona_service.list_personas().await;
        self.apply_personas(result);
    }

    fn apply_estudiantes(&mut self, result: Result<Vec<Estudiante>, ServiceError>) {
        match result {
            Ok(estudiantes) => {
                debug!(count = estudiantes.len(), "loaded estudiantes");
                self.estudiantes = estudiantes;
            }
            Err(err) => self.handle_error(&err, messages::LOAD_ESTUDIANTES_FAILED),
        }
    }

    fn apply_personas(&mut self, result: Result<Vec<Persona>, ServiceError>) {
        match result {
            Ok(personas) => {
                debug!(count = personas.len(), "loaded personas");
                self.personas = personas;
            }
            Err(err) => self.handle_error(&err, messages::LOAD_PERSONAS_FAILED),
        }
    }

    pub fn open_create_dialog(&mut self) {
        self.reset_edited();
        self.dialog.open_create();
    }

    /// Opens the dialog only once the record has been fetched.
    pub async fn open_edit_dialog(&mut self, id: EstudianteId) {
        match self.estudiante_service.get_estudiante(id).await {
            Ok(estudiante) => {
                self.persona = estudiante.persona.clone();
                self.estudiante = estudiante;
                self.dialog.open_edit();
            }
            Err(err) => self.handle_error(&err, messages::LOAD_ESTUDIANTE_FAILED),
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog.close();
        self.reset_edited();
    }

    fn reset_edited(&mut self) {
        self.estudiante = Estudiante::default();
        self.persona = Persona::default();
    }

    pub async fn submit(&mut self) {
        match self.dialog.mode() {
            DialogMode::Create => self.create_sequence().await,
            DialogMode::Update => self.update_sequence().await,
        }
    }

    /// Submits using a raw operation code. Unknown codes do nothing.
    pub async fn submit_code(&mut self, code: u8) {
        match DialogMode::from_code(code) {
            Some(DialogMode::Create) => self.create_sequence().await,
            Some(DialogMode::Update) => self.update_sequence().await,
            None => debug!(code, "ignoring submit with unknown operation code"),
        }
    }

    async fn create_sequence(&mut self) {
        if !self.is_valid() {
            return;
        }

        let persona = match self.persona_service.create_persona(&self.persona).await {
            Ok(persona) => persona,
            Err(err) => return self.handle_error(&err, messages::CREATE_PERSONA_FAILED),
        };
        debug!(persona_id = ?persona.id, "persona created");
        self.estudiante.persona = persona;

        if let Err(err) = self
            .estudiante_service
            .create_estudiante(&self.estudiante)
            .await
        {
            return self.handle_error(&err, messages::CREATE_ESTUDIANTE_FAILED);
        }

        info!(codigo = %self.estudiante.codigo, "estudiante registered");
        self.notifier.add(Notification::success(messages::REGISTERED));
        self.refresh_estudiantes().await;
        self.close_dialog();
    }

    async fn update_sequence(&mut self) {
        if !self.is_valid() {
            return;
        }

        let Some(persona_id) = self.persona.id else {
            return self.handle_error(
                &ServiceError::MissingId("persona"),
                messages::UPDATE_PERSONA_FAILED,
            );
        };

        let persona = match self
            .persona_service
            .update_persona(&self.persona, persona_id)
            .await
        {
            Ok(persona) => persona,
            Err(err) => return self.handle_error(&err, messages::UPDATE_PERSONA_FAILED),
        };
        self.estudiante.persona = persona;

        if let Err(err) = self
            .estudiante_service
            .update_estudiante(&self.estudiante)
            .await
        {
            return self.handle_error(&err, messages::UPDATE_ESTUDIANTE_FAILED);
        }

        info!(
            estudiante_id = ?self.estudiante.id,
            codigo = %self.estudiante.codigo,
            "estudiante updated"
        );
        self.notifier.add(Notification::success(messages::UPDATED));
        self.refresh_estudiantes().await;
        self.close_dialog();
    }

    /// Checks the required fields, notifying once when any is missing.
    pub fn is_valid(&self) -> bool {
        let missing = validation::missing_fields(&self.persona, &self.estudiante);
        if missing.is_empty() {
            return true;
        }
        debug!(?missing, "form incomplete");
        self.notifier
            .add(Notification::error(validation::REQUIRED_FIELDS_MESSAGE));
        false
    }

    /// Deletes after explicit acceptance. Declining does nothing.
    pub async fn delete(&mut self, id: EstudianteId) {
        let confirmation = Confirmation::new(messages::DELETE_HEADER, messages::DELETE_MESSAGE);
        if !self.confirmer.confirm(&confirmation).await {
            debug!(estudiante_id = id.0, "delete declined");
            return;
        }

        match self.estudiante_service.delete_estudiante(id).await {
            Ok(()) => {
                info!(estudiante_id = id.0, "estudiante deleted");
                self.notifier.add(Notification::success(messages::DELETED));
                self.refresh_estudiantes().await;
            }
            Err(err) => self.handle_error(&err, messages::DELETE_ESTUDIANTE_FAILED),
        }
    }

    fn handle_error(&self, err: &ServiceError, default_message: &str) {
        warn!(error = %err, code = ?err.code(), "{default_message}");
        let detail = err
            .message()
            .unwrap_or_else(|| default_message.to_string());
        self.notifier.add(Notification::error(detail));
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
