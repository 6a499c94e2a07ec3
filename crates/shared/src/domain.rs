use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PersonaId);
id_newtype!(EstudianteId);

/// Backends send `null` for unset columns; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Identity record. `id` is assigned by the backend and absent until the
/// record has been created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PersonaId>,
    #[serde(deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(deserialize_with = "null_as_default")]
    pub apellido: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dni: String,
    #[serde(deserialize_with = "null_as_default")]
    pub correo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub telefono: String,
    #[serde(deserialize_with = "null_as_default")]
    pub estado: String,
}

impl Persona {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido).trim().to_string()
    }
}

/// Academic record. The embedded `persona` travels by value and must carry
/// the server-assigned person id before the student is created or updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Estudiante {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EstudianteId>,
    #[serde(deserialize_with = "null_as_default")]
    pub codigo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub persona: Persona,
}
