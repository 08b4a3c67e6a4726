//! Classification of human-readable `git status` output.
//!
//! This is a substring heuristic over the long status format, not a parse.
//! Every rule is checked independently against the whole text.

/// Phrases git prints when there is nothing to commit. Git 2.9 changed
/// "working directory clean" to "working tree clean".
const CLEAN_MARKERS: [&str; 2] = ["working directory clean", "working tree clean"];
const MODIFIED_MARKER: &str = "modified:";
const DELETED_MARKER: &str = "deleted:";
const UNTRACKED_MARKER: &str = "Untracked files:";
const RENAMED_MARKER: &str = "renamed:";

/// Working tree conditions derived from one status query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionFlags {
    pub clean: bool,
    pub has_modified: bool,
    pub has_deleted: bool,
    pub has_untracked: bool,
    pub has_renamed: bool,
}

impl ConditionFlags {
    /// A repository is dirty whenever the clean marker was absent
    pub fn is_dirty(&self) -> bool {
        !self.clean
    }

    /// Labels of the detail flags that are set, always in the order
    /// modified, deleted, untracked, renamed
    pub fn labels(&self) -> Vec<ChangeLabel> {
        ChangeLabel::ALL
            .into_iter()
            .filter(|label| label.is_set(self))
            .collect()
    }
}

/// One detail flag, as shown in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeLabel {
    Modified,
    Deleted,
    Untracked,
    Renamed,
}

impl ChangeLabel {
    pub const ALL: [ChangeLabel; 4] = [
        ChangeLabel::Modified,
        ChangeLabel::Deleted,
        ChangeLabel::Untracked,
        ChangeLabel::Renamed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeLabel::Modified => "modified",
            ChangeLabel::Deleted => "deleted",
            ChangeLabel::Untracked => "untracked",
            ChangeLabel::Renamed => "renamed",
        }
    }

    fn is_set(&self, flags: &ConditionFlags) -> bool {
        match self {
            ChangeLabel::Modified => flags.has_modified,
            ChangeLabel::Deleted => flags.has_deleted,
            ChangeLabel::Untracked => flags.has_untracked,
            ChangeLabel::Renamed => flags.has_renamed,
        }
    }
}

impl std::fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify raw `git status` output into condition flags
///
/// Never fails: unrecognized text simply leaves every flag false.
pub fn classify(raw: &str) -> ConditionFlags {
    ConditionFlags {
        clean: CLEAN_MARKERS.iter().any(|marker| raw.contains(marker)),
        has_modified: raw.contains(MODIFIED_MARKER),
        has_deleted: raw.contains(DELETED_MARKER),
        has_untracked: raw.contains(UNTRACKED_MARKER),
        has_renamed: raw.contains(RENAMED_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_clean() {
        let flags = classify("working directory clean");
        assert!(flags.clean);
        assert!(!flags.has_modified);
        assert!(!flags.has_deleted);
        assert!(!flags.has_untracked);
        assert!(!flags.has_renamed);
        assert!(!flags.is_dirty());
    }

    #[test]
    fn test_classify_modern_clean_message() {
        let output = "On branch main\nnothing to commit, working tree clean\n";
        let flags = classify(output);
        assert!(flags.clean);
        assert!(flags.labels().is_empty());
    }

    #[test]
    fn test_classify_modified_and_untracked() {
        let flags = classify("modified: foo.txt\nUntracked files:\n  bar.txt");
        assert!(flags.has_modified);
        assert!(flags.has_untracked);
        assert!(!flags.clean);
        assert!(!flags.has_deleted);
        assert!(!flags.has_renamed);
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(""), ConditionFlags::default());
        assert!(classify("").is_dirty());
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let flags = classify("Modified: a\nuntracked files:\nRENAMED: b");
        assert_eq!(flags, ConditionFlags::default());
    }

    #[test]
    fn test_classify_full_long_format() {
        let output = r#"On branch main
Changes to be committed:
  (use "git restore --staged <file>..." to unstage)
	renamed:    old.txt -> new.txt

Changes not staged for commit:
  (use "git add/rm <file>..." to update what will be committed)
	modified:   src/lib.rs
	deleted:    README.md

Untracked files:
  (use "git add <file>..." to include in what will be committed)
	notes.txt
"#;
        let flags = classify(output);
        assert!(!flags.clean);
        assert!(flags.has_modified);
        assert!(flags.has_deleted);
        assert!(flags.has_untracked);
        assert!(flags.has_renamed);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let output = "deleted: a\nrenamed: b -> c";
        assert_eq!(classify(output), classify(output));
    }

    #[test]
    fn test_labels_fixed_order() {
        let flags = ConditionFlags {
            clean: false,
            has_modified: true,
            has_deleted: false,
            has_untracked: true,
            has_renamed: true,
        };
        assert_eq!(
            flags.labels(),
            vec![ChangeLabel::Modified, ChangeLabel::Untracked, ChangeLabel::Renamed]
        );
    }

    #[test]
    fn test_label_display() {
        assert_eq!(ChangeLabel::Untracked.to_string(), "untracked");
        assert_eq!(format!("{}", ChangeLabel::Renamed), "renamed");
    }
}
