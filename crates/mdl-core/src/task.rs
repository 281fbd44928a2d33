//! Task model and task-list input.
//!
//! A task is one (url, destination) pair, immutable once built. Tasks come
//! from CLI positionals and/or a list file; malformed entries are rejected
//! here and never reach the scheduler.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::url_model;

/// One unit of work: download `url` to `dest`. Immutable once enqueued;
/// owned by the scheduler until dispatched, then read-only by its worker.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: u64,
    pub url: String,
    pub dest: PathBuf,
}

/// A task descriptor that could not be turned into a `Task`. Reported and
/// excluded from the run; never aborts it.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("not a valid URL: {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in {url} (only http and https)")]
    UnsupportedScheme { url: String, scheme: String },
}

fn validate_url(raw: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(raw).map_err(|source| ValidationError::Malformed {
        url: raw.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// Parses a task-list file body: one URL per line, surrounding whitespace
/// trimmed, blank lines and lines starting with `#` ignored.
pub fn parse_task_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Builds the FIFO task queue from validated URLs, deriving destination
/// paths under `dest_dir`. Duplicate derived names within one run are
/// uniqued with a numeric suffix so two tasks never write the same file.
/// Returns the tasks in submission order plus the rejected entries.
pub fn build_tasks(urls: &[String], dest_dir: &Path) -> (Vec<Task>, Vec<ValidationError>) {
    let mut tasks = Vec::with_capacity(urls.len());
    let mut rejected = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_id = 1u64;

    for url in urls {
        if let Err(e) = validate_url(url) {
            rejected.push(e);
            continue;
        }
        let name = unique_name(&url_model::derive_filename(url), &taken);
        taken.insert(name.clone());
        tasks.push(Task {
            id: next_id,
            url: url.clone(),
            dest: dest_dir.join(&name),
        });
        next_id += 1;
    }

    (tasks, rejected)
}

/// Returns `candidate` if unused, otherwise `stem.N.ext` for the smallest
/// free N (e.g. `file.iso` → `file.1.iso`).
fn unique_name(candidate: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }
    let (stem, ext) = match candidate.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (candidate, None),
    };
    for n in 1u32.. {
        let name = match ext {
            Some(e) => format!("{}.{}.{}", stem, n, e),
            None => format!("{}.{}", stem, n),
        };
        if !taken.contains(&name) {
            return name;
        }
    }
    unreachable!("u32 suffix space exhausted");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_skips_blanks_and_comments() {
        let text = "\n# mirror list\n  https://a.example/x.iso  \n\n# two\nhttps://b.example/y.iso\n";
        let urls = parse_task_list(text);
        assert_eq!(
            urls,
            vec![
                "https://a.example/x.iso".to_string(),
                "https://b.example/y.iso".to_string()
            ]
        );
    }

    #[test]
    fn build_tasks_preserves_submission_order() {
        let urls = vec![
            "https://example.com/a.bin".to_string(),
            "https://example.com/b.bin".to_string(),
        ];
        let (tasks, rejected) = build_tasks(&urls, Path::new("/tmp/dl"));
        assert!(rejected.is_empty());
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[1].id, 2);
        assert_eq!(tasks[0].dest, Path::new("/tmp/dl/a.bin"));
        assert_eq!(tasks[1].dest, Path::new("/tmp/dl/b.bin"));
    }

    #[test]
    fn build_tasks_rejects_malformed_and_keeps_going() {
        let urls = vec![
            "not a url".to_string(),
            "ftp://example.com/x".to_string(),
            "https://example.com/ok.bin".to_string(),
        ];
        let (tasks, rejected) = build_tasks(&urls, Path::new("."));
        assert_eq!(tasks.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(matches!(rejected[0], ValidationError::Malformed { .. }));
        assert!(matches!(
            rejected[1],
            ValidationError::UnsupportedScheme { .. }
        ));
        assert_eq!(tasks[0].url, "https://example.com/ok.bin");
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let urls = vec![
            "https://a.example/file.iso".to_string(),
            "https://b.example/file.iso".to_string(),
            "https://c.example/file.iso".to_string(),
        ];
        let (tasks, _) = build_tasks(&urls, Path::new("d"));
        assert_eq!(tasks[0].dest, Path::new("d/file.iso"));
        assert_eq!(tasks[1].dest, Path::new("d/file.1.iso"));
        assert_eq!(tasks[2].dest, Path::new("d/file.2.iso"));
    }

    #[test]
    fn duplicate_names_without_extension() {
        let urls = vec![
            "https://a.example/readme".to_string(),
            "https://b.example/readme".to_string(),
        ];
        let (tasks, _) = build_tasks(&urls, Path::new("d"));
        assert_eq!(tasks[0].dest, Path::new("d/readme"));
        assert_eq!(tasks[1].dest, Path::new("d/readme.1"));
    }
}
