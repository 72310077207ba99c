// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editing session: one graph, the store it persists to, and the file name it was last
//! saved under or loaded from.
//!
//! Sessions share no state with each other; two sessions over different stores (or even the
//! same store with different file names) are fully independent.

use std::fmt;

use tracing::{info, warn};

use crate::model::{sanitize_name, DialogueKind, Position};
use crate::ops::{EditError, GraphModel};
use crate::store::{AssetStore, SaveReport, StoreError};

pub const DEFAULT_FILE_NAME: &str = "DialoguesFileName";

#[derive(Debug)]
pub enum SessionError {
    InvalidName { value: String },
    SaveBlocked { name_errors: usize },
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { value } => {
                write!(f, "invalid file name {value:?}: nothing left after sanitizing")
            }
            Self::SaveBlocked { name_errors } => write!(
                f,
                "cannot save while {name_errors} name error(s) remain; fix duplicate or blank names"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidName { .. } | Self::SaveBlocked { .. } => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug)]
pub struct EditorSession {
    store: AssetStore,
    model: GraphModel,
    file_name: String,
}

impl EditorSession {
    pub fn new(store: AssetStore) -> Self {
        Self {
            store,
            model: GraphModel::new(),
            file_name: DEFAULT_FILE_NAME.to_owned(),
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut GraphModel {
        &mut self.model
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Sanitizes and remembers `raw` as the file name for the next save.
    pub fn set_file_name(&mut self, raw: &str) -> Result<&str, SessionError> {
        self.file_name = sanitize_file_name(raw)?;
        Ok(&self.file_name)
    }

    /// Saves under the sanitized `file_name`, which becomes the session's file name.
    ///
    /// Refused while the name-error gate is closed; nothing is written in that case.
    pub fn save(&mut self, file_name: &str) -> Result<SaveReport, SessionError> {
        let file_name = sanitize_file_name(file_name)?;
        if !self.model.save_allowed() {
            let name_errors = self.model.name_errors();
            warn!(file_name = %file_name, name_errors, "save refused");
            return Err(SessionError::SaveBlocked { name_errors });
        }

        let report = self.store.save(&file_name, self.model.graph())?;
        self.file_name = file_name;
        Ok(report)
    }

    /// Replaces the current graph with the one saved under `file_name`.
    ///
    /// On any error the current graph and file name stay as they were.
    pub fn load(&mut self, file_name: &str) -> Result<(), SessionError> {
        let file_name = sanitize_file_name(file_name)?;
        let model = self.store.load(&file_name)?;

        self.model = model;
        self.file_name = file_name;
        Ok(())
    }

    /// Drops every node and group; the name-error counter returns to zero.
    pub fn clear(&mut self) {
        self.model.clear();
        info!("session cleared");
    }

    /// Clears the graph and restores the default file name.
    pub fn reset(&mut self) {
        self.clear();
        self.file_name = DEFAULT_FILE_NAME.to_owned();
    }
}

/// A session over `store` holding a small branching dialogue: `Start` offers a walk into the
/// `Forest` group or goes straight to `End`.
pub fn demo_session(store: AssetStore) -> Result<EditorSession, EditError> {
    let mut session = EditorSession::new(store);
    let model = session.model_mut();

    let start = model.add_node(DialogueKind::Multiple, "Start", Position::new(0.0, 0.0));
    model.set_node_text(&start, "The road forks at the edge of the woods.")?;
    model.set_choice_text(&start, 0, "Walk into the forest")?;
    let stay = model.add_choice(&start, "Turn back")?;

    let clearing = model.add_node(DialogueKind::Single, "Clearing", Position::new(400.0, -120.0));
    model.set_node_text(&clearing, "Sunlight falls into a quiet clearing.")?;
    model.add_group_with_members("Forest", Position::new(360.0, -200.0), &[clearing.clone()])?;

    let end = model.add_node(DialogueKind::Single, "End", Position::new(800.0, 0.0));
    model.set_node_text(&end, "The story ends here.")?;

    model.connect(&start, 0, &clearing)?;
    model.connect(&start, stay, &end)?;
    model.connect(&clearing, 0, &end)?;

    Ok(session)
}

fn sanitize_file_name(raw: &str) -> Result<String, SessionError> {
    let file_name = sanitize_name(raw);
    if file_name.is_empty() {
        return Err(SessionError::InvalidName {
            value: raw.to_owned(),
        });
    }
    Ok(file_name)
}
