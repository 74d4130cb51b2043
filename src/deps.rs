//! Dependency-rule extraction for incremental document builds.
//!
//! Each document pass leaves per-file logs (`*.out`) that list, between a
//! sentinel line and the next marker line, every file the figures in that
//! pass read. Collecting those into `rdb_ensure_file` rules lets the
//! build tool re-run the pass when a script or data file changes.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::Path;

use crate::log::{debug, warn};

/// Line that opens the dependency section of a pass log.
pub const DEPENDENCIES_SENTINEL: &str = "=>PYTHONTEX:DEPENDENCIES#";

/// Dependencies recorded in one pass log. A log without a dependency
/// section, or with an unterminated one, contributes nothing.
pub fn dependencies_in_log(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(dependencies_in_text(&text))
}

fn dependencies_in_text(text: &str) -> Vec<String> {
    let mut lines = text.lines();
    if !lines.any(|line| line.starts_with(DEPENDENCIES_SENTINEL)) {
        return Vec::new();
    }

    let mut deps = Vec::new();
    for line in lines {
        // The next marker line closes the section
        if line.starts_with("=>") {
            return deps;
        }
        let line = line.trim();
        if !line.is_empty() {
            deps.push(line.to_string());
        }
    }
    // Never saw the closing marker: the log is truncated, trust none of it
    warn!("dependency section has no closing marker, ignoring it");
    Vec::new()
}

/// Scan every `*.out` log in `dir` and emit one `rdb_ensure_file` rule
/// per distinct dependency, sorted, one per line.
pub fn dependency_rules_for_dir(dir: &Path) -> io::Result<String> {
    let mut deps: BTreeSet<String> = BTreeSet::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("out") {
            continue;
        }
        debug!("scanning pass log {:?}", path);
        deps.extend(dependencies_in_log(&path)?);
    }

    let mut rules = String::new();
    for dep in deps {
        let _ = writeln!(rules, "rdb_ensure_file($rule, '{dep}');");
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_section_between_markers() {
        let log = "noise\n=>PYTHONTEX:DEPENDENCIES#\nfig.py\ndata.csv\n=>PYTHONTEX:CREATED#\nout.pgf\n";
        assert_eq!(dependencies_in_text(log), vec!["fig.py", "data.csv"]);
    }

    #[test]
    fn missing_section_yields_nothing() {
        assert_eq!(dependencies_in_text("just noise\n"), Vec::<String>::new());
    }

    #[test]
    fn unterminated_section_yields_nothing() {
        let log = "=>PYTHONTEX:DEPENDENCIES#\nfig.py\n";
        assert_eq!(dependencies_in_text(log), Vec::<String>::new());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let log = "=>PYTHONTEX:DEPENDENCIES#\n\nfig.py\n\n=>END\n";
        assert_eq!(dependencies_in_text(log), vec!["fig.py"]);
    }

    #[test]
    fn rules_are_unique_and_sorted_across_logs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.out"),
            "=>PYTHONTEX:DEPENDENCIES#\nb.py\na.py\n=>END\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.out"),
            "=>PYTHONTEX:DEPENDENCIES#\na.py\nc.csv\n=>END\n",
        )
        .unwrap();
        fs::write(dir.path().join("ignored.log"), "=>PYTHONTEX:DEPENDENCIES#\nz\n=>E\n")
            .unwrap();

        let rules = dependency_rules_for_dir(dir.path()).unwrap();
        assert_eq!(
            rules,
            "rdb_ensure_file($rule, 'a.py');\n\
             rdb_ensure_file($rule, 'b.py');\n\
             rdb_ensure_file($rule, 'c.csv');\n"
        );
    }
}
