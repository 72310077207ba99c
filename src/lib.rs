// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialogue Graph: authoring core for branching dialogue trees.
//!
//! [`ops::GraphModel`] is the editable graph with its duplicate-name bookkeeping
//! ([`integrity::NameIntegrityTracker`]); [`store::AssetStore`] saves it as an editable snapshot
//! plus a resolved compiled asset and loads it back; [`session::EditorSession`] ties one graph to
//! a store and a file name.

pub mod integrity;
pub mod model;
pub mod ops;
pub mod query;
pub mod session;
pub mod store;
