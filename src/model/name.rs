// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

/// Characters kept by [`sanitize_name`]: letters, digits and `_`.
const NON_IDENTIFIER_PATTERN: &str = r"[^\p{L}\p{N}_]+";

fn non_identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(NON_IDENTIFIER_PATTERN).expect("hard-coded name pattern is valid")
    })
}

/// Strips whitespace and every character that cannot appear in a node, group or file name.
///
/// The result may be empty; callers decide whether that is an error.
pub fn sanitize_name(raw: &str) -> String {
    non_identifier_regex().replace_all(raw, "").into_owned()
}

/// Case-folded form used for collision bookkeeping. Display keeps the original case.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{name_key, sanitize_name};

    #[test]
    fn sanitize_strips_whitespace_and_punctuation() {
        assert_eq!(sanitize_name("  Hello World! "), "HelloWorld");
        assert_eq!(sanitize_name("a-b.c/d\\e"), "abcde");
        assert_eq!(sanitize_name("snake_case_1"), "snake_case_1");
    }

    #[test]
    fn sanitize_keeps_non_ascii_letters() {
        assert_eq!(sanitize_name("Ünïcödé name"), "Ünïcödéname");
    }

    #[test]
    fn sanitize_can_produce_empty_names() {
        assert_eq!(sanitize_name(" \t-- "), "");
    }

    #[test]
    fn name_key_folds_case() {
        assert_eq!(name_key("Dup"), name_key("dUP"));
    }
}
