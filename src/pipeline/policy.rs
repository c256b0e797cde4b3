// src/pipeline/policy.rs

//! Per-resource caching policy.
//!
//! | kind            | payload | refresh | written to                          |
//! |-----------------|---------|---------|-------------------------------------|
//! | `scores`        | text    | always  | `html/{course}/scores.html`         |
//! | `files`         | text    | always  | `html/{course}/files.html`          |
//! | `groups`        | text    | once    | `html/{course}/groups.html`         |
//! | `syllabus`      | text    | once    | `html/{course}/syllabus.html`       |
//! | `syllabus_file` | binary  | once    | scratch pdf + `courses/{course}/syllabus.pdf` |

use std::path::PathBuf;

use crate::models::SubpageKind;
use crate::storage::CourseDirs;

/// How a resource is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Text,
    Binary,
}

/// When a resource is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Live data, refetched and overwritten on every run
    Always,
    /// Fetched once, skipped while the cache key exists
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePolicy {
    pub kind: SubpageKind,
    pub payload: Payload,
    pub refresh: Refresh,
}

pub const POLICIES: [ResourcePolicy; 5] = [
    ResourcePolicy {
        kind: SubpageKind::Scores,
        payload: Payload::Text,
        refresh: Refresh::Always,
    },
    ResourcePolicy {
        kind: SubpageKind::Files,
        payload: Payload::Text,
        refresh: Refresh::Always,
    },
    ResourcePolicy {
        kind: SubpageKind::Groups,
        payload: Payload::Text,
        refresh: Refresh::Once,
    },
    ResourcePolicy {
        kind: SubpageKind::Syllabus,
        payload: Payload::Text,
        refresh: Refresh::Once,
    },
    ResourcePolicy {
        kind: SubpageKind::SyllabusFile,
        payload: Payload::Binary,
        refresh: Refresh::Once,
    },
];

/// Downloaded materials are fetched once per file name.
pub const MATERIAL_REFRESH: Refresh = Refresh::Once;

/// Policy for a subpage kind.
pub fn policy_for(kind: SubpageKind) -> ResourcePolicy {
    POLICIES
        .iter()
        .copied()
        .find(|policy| policy.kind == kind)
        .unwrap_or(ResourcePolicy {
            kind,
            payload: Payload::Text,
            refresh: Refresh::Once,
        })
}

impl ResourcePolicy {
    /// File whose presence satisfies a [`Refresh::Once`] policy.
    pub fn cache_key(&self, dirs: &CourseDirs) -> PathBuf {
        match self.kind {
            SubpageKind::SyllabusFile => dirs.canonical_syllabus(),
            kind => dirs.subpage(kind),
        }
    }

    /// Every file a successful fetch is written to.
    pub fn targets(&self, dirs: &CourseDirs) -> Vec<PathBuf> {
        match self.kind {
            SubpageKind::SyllabusFile => vec![
                dirs.subpage(SubpageKind::SyllabusFile),
                dirs.canonical_syllabus(),
            ],
            kind => vec![dirs.subpage(kind)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn every_kind_has_exactly_one_policy() {
        for kind in SubpageKind::ALL {
            assert_eq!(POLICIES.iter().filter(|p| p.kind == kind).count(), 1);
        }
    }

    #[test]
    fn live_pages_always_refresh() {
        assert_eq!(policy_for(SubpageKind::Scores).refresh, Refresh::Always);
        assert_eq!(policy_for(SubpageKind::Files).refresh, Refresh::Always);
        assert_eq!(policy_for(SubpageKind::Groups).refresh, Refresh::Once);
        assert_eq!(policy_for(SubpageKind::Syllabus).refresh, Refresh::Once);
        assert_eq!(policy_for(SubpageKind::SyllabusFile).refresh, Refresh::Once);
    }

    #[test]
    fn syllabus_file_is_keyed_on_canonical_copy() {
        let dirs = LocalStorage::new("html", "courses").course("Calc");
        let policy = policy_for(SubpageKind::SyllabusFile);
        assert_eq!(policy.payload, Payload::Binary);
        assert_eq!(policy.cache_key(&dirs), PathBuf::from("courses/Calc/syllabus.pdf"));
        assert_eq!(
            policy.targets(&dirs),
            [
                PathBuf::from("html/Calc/syllabus_file.pdf"),
                PathBuf::from("courses/Calc/syllabus.pdf"),
            ]
        );
    }

    #[test]
    fn text_pages_are_keyed_on_scratch_copy() {
        let dirs = LocalStorage::new("html", "courses").course("Calc");
        let policy = policy_for(SubpageKind::Groups);
        assert_eq!(policy.cache_key(&dirs), PathBuf::from("html/Calc/groups.html"));
        assert_eq!(policy.targets(&dirs), [PathBuf::from("html/Calc/groups.html")]);
    }
}
