// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inspector queries over compiled assets: what a runtime picker lists when choosing the
//! dialogue to start from.

use crate::store::{CompiledAsset, DialogueRecord, RecordRef};

pub fn group_names(asset: &CompiledAsset) -> Vec<&str> {
    asset.container().group_names.iter().map(String::as_str).collect()
}

/// Dialogue names inside `group_name`, optionally only those nothing leads to.
pub fn grouped_dialogue_names<'a>(
    asset: &'a CompiledAsset,
    group_name: &str,
    starting_only: bool,
) -> Vec<&'a str> {
    let Some(names) = asset.container().grouped_dialogues.get(group_name) else {
        return Vec::new();
    };
    names
        .iter()
        .filter(|name| {
            !starting_only || is_starting(asset, &RecordRef::grouped(group_name, name.as_str()))
        })
        .map(String::as_str)
        .collect()
}

pub fn ungrouped_dialogue_names(asset: &CompiledAsset, starting_only: bool) -> Vec<&str> {
    asset
        .container()
        .ungrouped_dialogues
        .iter()
        .filter(|name| !starting_only || is_starting(asset, &RecordRef::ungrouped(name.as_str())))
        .map(String::as_str)
        .collect()
}

/// The record reached by taking choice `choice_index` of `from`.
pub fn follow_choice<'a>(
    asset: &'a CompiledAsset,
    from: &RecordRef,
    choice_index: usize,
) -> Option<&'a DialogueRecord> {
    asset.next(from, choice_index).map(|(_, record)| record)
}

fn is_starting(asset: &CompiledAsset, record_ref: &RecordRef) -> bool {
    asset.record(record_ref).is_some_and(|record| record.is_starting_dialogue)
}
