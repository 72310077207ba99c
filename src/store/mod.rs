// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for dialogue graphs on disk.
//!
//! Saving writes two artifacts per file name: an editable [`GraphSnapshot`] and a resolved
//! [`CompiledAsset`] tree (container, group assets, one record per dialogue). Loading reads the
//! snapshot back and rebuilds a [`GraphModel`](crate::ops::GraphModel).

pub mod asset_store;
pub mod compiled;
pub mod snapshot;

pub use asset_store::{AssetStore, SaveReport, StoreError, WriteDurability};
pub use compiled::{CompiledAsset, CompiledChoice, DialogueContainer, DialogueRecord, RecordRef};
pub use snapshot::{
    ChoiceSnapshot, DialogueKindJson, GraphSnapshot, GroupSnapshot, NodeSnapshot, PositionJson,
};
