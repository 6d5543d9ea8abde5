//! Create/edit form overlay state

use crate::models::capitalized;

/// Which submit the open form performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// `POST /{collection}`
    Create,
    /// `PUT /{collection}/{id}`
    Edit(String),
}

/// Closed, or open with exactly one draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormModal<D> {
    Closed,
    Open { mode: FormMode, draft: D },
}

impl<D> Default for FormModal<D> {
    fn default() -> Self {
        FormModal::Closed
    }
}

impl<D: Clone + Default> FormModal<D> {
    /// Open with an empty draft, replacing any open form
    pub fn open_create(&mut self) {
        *self = FormModal::Open {
            mode: FormMode::Create,
            draft: D::default(),
        };
    }

    /// Open with a draft copied from the record `id`
    pub fn open_edit(&mut self, id: impl Into<String>, draft: D) {
        *self = FormModal::Open {
            mode: FormMode::Edit(id.into()),
            draft,
        };
    }

    /// Close and discard the draft
    pub fn close(&mut self) {
        *self = FormModal::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, FormModal::Open { .. })
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match self {
            FormModal::Open { mode, .. } => Some(mode),
            FormModal::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            FormModal::Open { draft, .. } => Some(draft),
            FormModal::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            FormModal::Open { draft, .. } => Some(draft),
            FormModal::Closed => None,
        }
    }

    /// Copy of the mode and draft to submit
    pub fn snapshot(&self) -> Option<(FormMode, D)> {
        match self {
            FormModal::Open { mode, draft } => Some((mode.clone(), draft.clone())),
            FormModal::Closed => None,
        }
    }

    /// Close only if the form still shows `mode` with `draft`.
    ///
    /// Returns whether it closed; a form reopened or edited since the
    /// snapshot was taken stays open.
    pub fn close_if_showing(&mut self, mode: &FormMode, draft: &D) -> bool
    where
        D: PartialEq,
    {
        let showing = matches!(&*self, FormModal::Open { mode: m, draft: d } if m == mode && d == draft);
        if showing {
            self.close();
        }
        showing
    }

    /// Heading of the overlay, e.g. `Add Department`
    pub fn title(&self, label: &str) -> Option<String> {
        self.mode().map(|mode| match mode {
            FormMode::Create => format!("Add {}", capitalized(label)),
            FormMode::Edit(_) => format!("Edit {}", capitalized(label)),
        })
    }
}
