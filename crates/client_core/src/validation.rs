use shared::domain::{Estudiante, Persona};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Todos los campos son obligatorios";

/// Names of the required fields that are still empty, in form order.
pub fn missing_fields(persona: &Persona, estudiante: &Estudiante) -> Vec<&'static str> {
    [
        ("nombre", persona.nombre.as_str()),
        ("apellido", persona.apellido.as_str()),
        ("dni", persona.dni.as_str()),
        ("correo", persona.correo.as_str()),
        ("telefono", persona.telefono.as_str()),
        ("estado", persona.estado.as_str()),
        ("codigo", estudiante.codigo.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect()
}
