//! Groups candidates by target file and picks a representative per group.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::domain::models::{ConsolidatedFix, FixCandidate};

/// Prefix of synthetic keys for candidates without a target file.
pub const COMMAND_KEY_PREFIX: &str = "cmd:";

/// Stable key for a file-less candidate.
///
/// The hash covers kind, command, message and job, separated by NUL so
/// field boundaries cannot shift.
pub fn synthetic_key(candidate: &FixCandidate) -> String {
    let mut hasher = Sha256::new();
    for field in [
        candidate.error_kind.as_tag(),
        candidate.command.as_deref().unwrap_or_default(),
        candidate.original_message.as_str(),
        candidate.job_name.as_str(),
    ] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("{COMMAND_KEY_PREFIX}{}", &digest[..16])
}

/// Index of the highest-confidence member; the earliest wins ties.
fn representative_index(candidates: &[FixCandidate]) -> usize {
    candidates
        .iter()
        .enumerate()
        .fold(0, |best, (index, candidate)| {
            if candidate.confidence > candidates[best].confidence {
                index
            } else {
                best
            }
        })
}

struct Group {
    key: String,
    target_file: Option<String>,
    members: Vec<FixCandidate>,
}

/// Group `candidates` in first-seen order.
///
/// Candidates with a target file share a group per file. Every file-less
/// candidate is its own group; repeats of the same synthetic key get a
/// `#n` suffix so group keys stay unique.
pub fn consolidate(candidates: Vec<FixCandidate>) -> Vec<ConsolidatedFix> {
    let mut groups: Vec<Group> = Vec::new();
    let mut by_file: HashMap<String, usize> = HashMap::new();
    let mut synthetic_seen: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match candidate.target_file.clone() {
            Some(file) => {
                if let Some(&index) = by_file.get(&file) {
                    groups[index].members.push(candidate);
                } else {
                    by_file.insert(file.clone(), groups.len());
                    groups.push(Group {
                        key: file.clone(),
                        target_file: Some(file),
                        members: vec![candidate],
                    });
                }
            }
            None => {
                let base = synthetic_key(&candidate);
                let seen = synthetic_seen.entry(base.clone()).or_insert(0);
                *seen += 1;
                let key = if *seen == 1 {
                    base
                } else {
                    format!("{base}#{seen}")
                };
                groups.push(Group {
                    key,
                    target_file: None,
                    members: vec![candidate],
                });
            }
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let representative = group.members[representative_index(&group.members)].clone();
            ConsolidatedFix {
                target_file: group.target_file,
                group_key: group.key,
                confidence: representative.confidence,
                representative,
                candidates: group.members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ErrorKind, ErrorRecord};

    fn candidate(file: Option<&str>, confidence: f64, message: &str) -> FixCandidate {
        let record = ErrorRecord::new(ErrorKind::LintStyle, message, "lint");
        let candidate = FixCandidate::for_record(&record, message, confidence);
        match file {
            Some(f) => candidate.with_target(f),
            None => candidate.with_command("black ."),
        }
    }

    #[test]
    fn test_groups_by_file_in_first_seen_order() {
        let groups = consolidate(vec![
            candidate(Some("utils.py"), 0.85, "long import"),
            candidate(Some("app.py"), 0.95, "blank lines"),
            candidate(Some("utils.py"), 0.92, "unused import"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_key, "utils.py");
        assert_eq!(groups[0].candidates.len(), 2);
        assert!((groups[0].representative.confidence - 0.92).abs() < f64::EPSILON);
        assert!((groups[0].confidence - 0.92).abs() < f64::EPSILON);
        assert_eq!(groups[1].target_file.as_deref(), Some("app.py"));
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let groups = consolidate(vec![
            candidate(Some("a.py"), 0.9, "first"),
            candidate(Some("a.py"), 0.9, "second"),
        ]);
        assert_eq!(groups[0].representative.description, "first");
    }

    #[test]
    fn test_file_less_candidates_are_singletons() {
        let groups = consolidate(vec![
            candidate(None, 0.98, "same"),
            candidate(None, 0.98, "same"),
            candidate(None, 0.98, "other"),
        ]);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.candidates.len() == 1));
        assert!(groups[0].group_key.starts_with(COMMAND_KEY_PREFIX));
        assert_eq!(groups[1].group_key, format!("{}#2", groups[0].group_key));
        assert_ne!(groups[2].group_key, groups[0].group_key);
    }

    #[test]
    fn test_synthetic_key_is_stable() {
        let a = candidate(None, 0.5, "npm audit");
        assert_eq!(synthetic_key(&a), synthetic_key(&a.clone()));
        assert_eq!(synthetic_key(&a).len(), COMMAND_KEY_PREFIX.len() + 16);
    }

    #[test]
    fn test_reconsolidation_is_idempotent() {
        let first = consolidate(vec![
            candidate(Some("utils.py"), 0.85, "a"),
            candidate(None, 0.6, "b"),
            candidate(Some("utils.py"), 0.92, "c"),
        ]);
        let flattened: Vec<FixCandidate> =
            first.iter().flat_map(|g| g.candidates.clone()).collect();
        assert_eq!(consolidate(flattened), first);
    }

    #[test]
    fn test_empty() {
        assert!(consolidate(Vec::new()).is_empty());
    }
}
