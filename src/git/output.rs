//! Parsers for git command output.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t ]+").expect("valid separator pattern"));

/// Parse `git remote -v` into remote name → URL.
///
/// Only the first two columns are read, so the `(fetch)` and `(push)` lines
/// of a remote collapse into one entry. A remote with different fetch and
/// push URLs keeps whichever line came last.
pub fn parse_remotes(output: &str) -> BTreeMap<String, String> {
    let mut remotes = BTreeMap::new();

    for line in output.lines() {
        let mut parts = FIELD_SEPARATOR.split(line.trim());
        if let (Some(name), Some(url)) = (parts.next(), parts.next()) {
            if !name.is_empty() && !url.is_empty() {
                remotes.insert(name.to_string(), url.to_string());
            }
        }
    }

    remotes
}

/// Total object count from `git count-objects -v`.
///
/// Sums the loose `count` and the packed `in-pack` lines; a fetch usually
/// leaves everything in packs. `None` when neither line is present.
pub fn parse_object_count(output: &str) -> Option<u64> {
    let mut total = None;
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if matches!(key.trim(), "count" | "in-pack") {
            let value: u64 = value.trim().parse().ok()?;
            total = Some(total.unwrap_or(0) + value);
        }
    }
    total
}

/// What `git push --dry-run --porcelain` says a push would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Every ref is already up to date on the remote.
    UpToDate,
    /// At least one ref would be created, updated or deleted.
    Pending,
    /// The remote would refuse at least one ref; carries git's summary.
    Rejected(String),
}

/// Read the ref lines of `git push --dry-run --porcelain` output.
///
/// Ref lines look like `<flag>\t<from>:<to>\t<summary>`. The flag `=` means
/// up to date and `!` means rejected; a rejection wins over pending refs.
pub fn parse_push_status(output: &str) -> PushStatus {
    let mut status = PushStatus::UpToDate;

    for line in output.lines() {
        let mut columns = line.split('\t');
        let (Some(flag), Some(refs)) = (columns.next(), columns.next()) else {
            continue;
        };
        match flag {
            "!" => {
                let target = refs.rsplit(':').next().unwrap_or(refs);
                let summary = columns.next().unwrap_or("[rejected]").trim();
                return PushStatus::Rejected(format!("{target} {summary}"));
            }
            " " | "+" | "-" | "*" => status = PushStatus::Pending,
            _ => {}
        }
    }

    status
}
