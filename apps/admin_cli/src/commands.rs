//! Subcommands and their dispatch onto the controller.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use client_core::{AcceptAll, Confirmer, EstudianteController, PersonaService};
use shared::domain::{Estudiante, EstudianteId, Persona, PersonaId};

use crate::console::{ConsoleNotifier, StdinConfirmer};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and print estudiantes and personas.
    List,
    Personas,
    Persona {
        id: i64,
    },
    Create {
        #[arg(long, default_value = "")]
        codigo: String,
        #[command(flatten)]
        persona: PersonaFields,
    },
    /// Only the fields passed as flags are changed.
    Edit {
        id: i64,
        #[arg(long)]
        codigo: Option<String>,
        #[command(flatten)]
        persona: PersonaFields,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct PersonaFields {
    #[arg(long)]
    pub nombre: Option<String>,
    #[arg(long)]
    pub apellido: Option<String>,
    #[arg(long)]
    pub dni: Option<String>,
    #[arg(long)]
    pub correo: Option<String>,
    #[arg(long)]
    pub telefono: Option<String>,
    #[arg(long)]
    pub estado: Option<String>,
}

impl PersonaFields {
    pub fn apply(self, persona: &mut Persona) {
        let fields = [
            (self.nombre, &mut persona.nombre),
            (self.apellido, &mut persona.apellido),
            (self.dni, &mut persona.dni),
            (self.correo, &mut persona.correo),
            (self.telefono, &mut persona.telefono),
            (self.estado, &mut persona.estado),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

pub fn confirmer_for(command: &Command) -> Arc<dyn Confirmer> {
    match command {
        Command::Delete { yes: true, .. } => Arc::new(AcceptAll),
        _ => Arc::new(StdinConfirmer),
    }
}

/// Runs one subcommand. Fails when any error notification was emitted, so
/// the process exit status reflects it.
pub async fn run(
    command: Command,
    controller: &mut EstudianteController,
    personas: &dyn PersonaService,
    notifier: &ConsoleNotifier,
    json: bool,
) -> Result<()> {
    match command {
        Command::List => {
            controller.initialize().await;
            print_estudiantes(controller.estudiantes(), json)?;
            println!("{} personas registradas", controller.personas().len());
        }
        Command::Personas => {
            controller.refresh_personas().await;
            print_personas(controller.personas(), json)?;
        }
        Command::Persona { id } => {
            let persona = personas
                .get_persona(PersonaId(id))
                .await
                .with_context(|| format!("failed to load persona {id}"))?;
            print_personas(std::slice::from_ref(&persona), json)?;
        }
        Command::Create { codigo, persona } => {
            controller.open_create_dialog();
            controller.estudiante_mut().codigo = codigo;
            persona.apply(controller.persona_mut());
            submit_and_close(controller).await;
        }
        Command::Edit {
            id,
            codigo,
            persona,
        } => {
            controller.open_edit_dialog(EstudianteId(id)).await;
            if controller.dialog().is_open() {
                if let Some(codigo) = codigo {
                    controller.estudiante_mut().codigo = codigo;
                }
                persona.apply(controller.persona_mut());
                submit_and_close(controller).await;
            }
        }
        Command::Delete { id, .. } => {
            controller.delete(EstudianteId(id)).await;
        }
    }

    let failures = notifier.error_count();
    if failures > 0 {
        bail!("{failures} operation(s) reported errors");
    }
    Ok(())
}

/// A one-shot command has no user to retry, so a dialog left open by a
/// failed submit is discarded.
async fn submit_and_close(controller: &mut EstudianteController) {
    controller.submit().await;
    if controller.dialog().is_open() {
        controller.close_dialog();
    }
}

fn print_estudiantes(estudiantes: &[Estudiante], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(estudiantes)?);
        return Ok(());
    }
    println!("{:>6}  {:<10}  {:<30}  {:<12}  {:<10}", "ID", "CODIGO", "NOMBRE", "DNI", "ESTADO");
    for estudiante in estudiantes {
        println!(
            "{:>6}  {:<10}  {:<30}  {:<12}  {:<10}",
            estudiante
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".into()),
            estudiante.codigo,
            estudiante.persona.full_name(),
            estudiante.persona.dni,
            estudiante.persona.estado,
        );
    }
    Ok(())
}

fn print_personas(personas: &[Persona], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(personas)?);
        return Ok(());
    }
    println!("{:>6}  {:<30}  {:<12}  {:<28}  {:<14}", "ID", "NOMBRE", "DNI", "CORREO", "TELEFONO");
    for persona in personas {
        println!(
            "{:>6}  {:<30}  {:<12}  {:<28}  {:<14}",
            persona
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".into()),
            persona.full_name(),
            persona.dni,
            persona.correo,
            persona.telefono,
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
