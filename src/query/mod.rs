// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over dialogue graphs and compiled assets.
//!
//! Queries provide derived views (entry points, reachability, inspector listings) for the CLI
//! and for runtime pickers.

pub mod compiled;
pub mod graph;
