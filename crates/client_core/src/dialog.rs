//! Create/edit dialog lifecycle: CLOSED -> OPEN on open-create or a successful
//! open-edit, OPEN -> CLOSED on submit success or close. A failed submit keeps
//! the dialog open.

pub const CREATE_TITLE: &str = "Crear Estudiante";
pub const CREATE_LABEL: &str = "Guardar";
pub const EDIT_TITLE: &str = "Editar Estudiante";
pub const EDIT_LABEL: &str = "Actualizar";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogMode {
    #[default]
    Create,
    Update,
}

impl DialogMode {
    /// Maps the numeric operation selector (0 = create, 1 = update).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Create),
            1 => Some(Self::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    visible: bool,
    title: String,
    submit_label: String,
    mode: DialogMode,
}

impl DialogState {
    pub fn open_create(&mut self) {
        self.open(CREATE_TITLE, CREATE_LABEL, DialogMode::Create);
    }

    pub fn open_edit(&mut self) {
        self.open(EDIT_TITLE, EDIT_LABEL, DialogMode::Update);
    }

    fn open(&mut self, title: &str, submit_label: &str, mode: DialogMode) {
        self.title = title.to_string();
        self.submit_label = submit_label.to_string();
        self.mode = mode;
        self.visible = true;
    }

    /// Hides the dialog. Title, label and mode are left as they were.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }
}
