//! Merge policy: turns an order of units into one text.
//!
//! Output layout:
//! 1. front matter of the definitions unit (everything above its marker line)
//! 2. every distinct external include line, sorted
//! 3. unit bodies in order, definitions body first, include lines removed,
//!    each followed by one blank line

use std::collections::BTreeSet;
use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::error::MergeError;
use crate::core::include::{external_target, is_directive};
use crate::core::order::Order;
use crate::core::source::UnitSource;

/// The unit split into front matter and body by a marker line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionsUnit {
    pub path: Utf8PathBuf,
    pub marker: String,
}

impl Default for DefinitionsUnit {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("src/defines.hpp"),
            marker: "// PASTE ALL INCLUDES!".to_string(),
        }
    }
}

/// Assembled output, kept as its three segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub front_matter: Vec<String>,
    pub externals: Vec<String>,
    pub body: Vec<String>,
}

impl Assembly {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.front_matter
            .iter()
            .chain(&self.externals)
            .chain(&self.body)
            .map(String::as_str)
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Append the non-directive `lines` plus a separator to `body`, and record
/// every external directive found in `scan`.
fn merge_unit(
    lines: &[String],
    scan: &[String],
    body: &mut Vec<String>,
    externals: &mut BTreeSet<String>,
) {
    externals.extend(
        scan.iter()
            .filter(|line| external_target(line).is_some())
            .cloned(),
    );
    body.extend(lines.iter().filter(|line| !is_directive(line)).cloned());
    body.push(String::new());
}

pub struct Assembler<'a, S: UnitSource> {
    source: S,
    definitions: &'a DefinitionsUnit,
}

impl<'a, S: UnitSource> Assembler<'a, S> {
    pub fn new(source: S, definitions: &'a DefinitionsUnit) -> Self {
        Self {
            source,
            definitions,
        }
    }

    /// Split the definitions unit at its single marker line.
    fn split_definitions(&self, lines: Vec<String>) -> Result<(Vec<String>, Vec<String>), MergeError> {
        let marker = self.definitions.marker.as_str();
        let hits: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_str() == marker)
            .map(|(i, _)| i)
            .collect();

        let idx = match hits.as_slice() {
            [idx] => *idx,
            [] => {
                return Err(MergeError::MissingMarker {
                    unit: self.definitions.path.clone(),
                    marker: marker.to_string(),
                });
            }
            many => {
                return Err(MergeError::DuplicateMarker {
                    unit: self.definitions.path.clone(),
                    marker: marker.to_string(),
                    count: many.len(),
                });
            }
        };

        let mut front = lines;
        let body = front.split_off(idx + 1);
        front.truncate(idx);

        Ok((front, body))
    }

    /// Merge the units of `order`, re-reading each from the source.
    #[instrument(skip_all, fields(units = order.len()))]
    pub fn assemble(&self, order: &Order) -> Result<Assembly, MergeError> {
        let mut out = Assembly::default();
        let mut externals: BTreeSet<String> = BTreeSet::new();

        if order.contains(&self.definitions.path) {
            debug!(unit = %self.definitions.path, "splitting definitions unit");
            let raw = self.source.read_lines(&self.definitions.path)?;
            let scan = raw.clone();
            let (front, body) = self.split_definitions(raw)?;
            out.front_matter = front;
            merge_unit(&body, &scan, &mut out.body, &mut externals);
        }

        for unit in order.iter().filter(|u| **u != self.definitions.path) {
            let lines = self.source.read_lines(unit)?;
            merge_unit(&lines, &lines, &mut out.body, &mut externals);
        }

        out.externals = externals.into_iter().collect();
        debug!(externals = out.externals.len(), lines = out.body.len(), "assembled");

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::include::local_target;
    use crate::core::source::MemorySource;

    fn order(units: &[&str]) -> Order {
        units.iter().map(|u| Utf8PathBuf::from(*u)).collect()
    }

    fn assemble(src: &MemorySource, units: &[&str]) -> Result<Assembly, MergeError> {
        let defs = DefinitionsUnit::default();
        Assembler::new(src, &defs).assemble(&order(units))
    }

    #[test]
    fn test_bodies_in_order_with_separators() {
        let src = MemorySource::new()
            .with("b.hpp", "int b;\n")
            .with("a.hpp", "#include \"b.hpp\"\nint a;\n")
            .with("main.cpp", "#include \"a.hpp\"\nint main() {}\n");

        let text = assemble(&src, &["b.hpp", "a.hpp", "main.cpp"]).unwrap().to_string();
        assert_eq!(text, "int b;\n\nint a;\n\nint main() {}\n\n");
    }

    #[test]
    fn test_externals_deduplicated_and_sorted() {
        let src = MemorySource::new()
            .with("a.hpp", "#include <vector>\n#include <map>\nint a;\n")
            .with("main.cpp", "#include <vector>\n#include \"a.hpp\"\n#include <vector>\n");

        let asm = assemble(&src, &["a.hpp", "main.cpp"]).unwrap();
        assert_eq!(asm.externals, vec!["#include <map>", "#include <vector>"]);

        let text = asm.to_string();
        assert_eq!(text.matches("#include <vector>").count(), 1);
        assert!(text.starts_with("#include <map>\n#include <vector>\n"));
    }

    #[test]
    fn test_local_includes_never_emitted() {
        let src = MemorySource::new()
            .with("a.hpp", "#include \"b.hpp\"\n  #include \"c.hpp\"\nint a;\n")
            .with("main.cpp", "#include \"a.hpp\"\n#include BROKEN\n");

        let asm = assemble(&src, &["a.hpp", "main.cpp"]).unwrap();
        assert!(asm.lines().all(|l| local_target(l).is_none()));
        assert!(asm.lines().all(|l| !is_directive(l) || external_target(l).is_some()));
    }

    #[test]
    fn test_definitions_split_at_marker() {
        let src = MemorySource::new()
            .with(
                "src/defines.hpp",
                "X\n#include <cstdio>\n// PASTE ALL INCLUDES!\nY\n",
            )
            .with("main.cpp", "#include \"src/defines.hpp\"\n#include <vector>\nint main() {}\n");

        let asm = assemble(&src, &["src/defines.hpp", "main.cpp"]).unwrap();
        assert_eq!(asm.front_matter, vec!["X", "#include <cstdio>"]);
        assert_eq!(asm.externals, vec!["#include <cstdio>", "#include <vector>"]);
        assert_eq!(
            asm.to_string(),
            "X\n#include <cstdio>\n#include <cstdio>\n#include <vector>\nY\n\nint main() {}\n\n"
        );
    }

    #[test]
    fn test_definitions_body_comes_first_regardless_of_position() {
        let src = MemorySource::new()
            .with("src/defines.hpp", "// PASTE ALL INCLUDES!\nusing int64 = long long;\n")
            .with("b.hpp", "int b;\n");

        let asm = assemble(&src, &["b.hpp", "src/defines.hpp"]).unwrap();
        assert!(asm.front_matter.is_empty());
        assert_eq!(asm.body, vec!["using int64 = long long;", "", "int b;", ""]);
    }

    #[test]
    fn test_definitions_absent_from_order_is_ignored() {
        let src = MemorySource::new().with("main.cpp", "int main() {}\n");
        let asm = assemble(&src, &["main.cpp"]).unwrap();
        assert!(asm.front_matter.is_empty());
    }

    #[test]
    fn test_missing_marker_is_fatal() {
        let src = MemorySource::new().with("src/defines.hpp", "X\nY\n");
        let err = assemble(&src, &["src/defines.hpp"]).unwrap_err();
        assert!(matches!(err, MergeError::MissingMarker { .. }));
    }

    #[test]
    fn test_duplicate_marker_is_fatal() {
        let src = MemorySource::new().with(
            "src/defines.hpp",
            "// PASTE ALL INCLUDES!\nX\n// PASTE ALL INCLUDES!\n",
        );
        let err = assemble(&src, &["src/defines.hpp"]).unwrap_err();
        assert!(matches!(err, MergeError::DuplicateMarker { count: 2, .. }));
    }

    #[test]
    fn test_unreadable_unit_is_fatal() {
        let src = MemorySource::new().with("a.hpp", "int a;\n");
        let err = assemble(&src, &["a.hpp", "gone.hpp"]).unwrap_err();
        assert!(matches!(err, MergeError::UnreadableUnit { .. }));
    }

    #[test]
    fn test_custom_marker() {
        let src = MemorySource::new().with("defs.h", "front\n/* BODY */\nback\n");
        let defs = DefinitionsUnit {
            path: Utf8PathBuf::from("defs.h"),
            marker: "/* BODY */".to_string(),
        };
        let asm = Assembler::new(&src, &defs).assemble(&order(&["defs.h"])).unwrap();
        assert_eq!(asm.to_string(), "front\nback\n\n");
    }
}
