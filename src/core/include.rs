//! Include-directive classification for single lines.
//!
//! Everything here is a pure function of its input line. The graph builder
//! uses it to find local targets, the assembler to collect external
//! directives and to decide which lines to drop from a unit's body.

/// Directive token that follows the `#`.
const DIRECTIVE: &str = "include";

/// Target named by an include directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include<'a> {
    /// `#include "path"`: another unit to merge inline
    Local(&'a str),
    /// `#include <name>`: an outside header, only re-emitted
    External(&'a str),
}

impl<'a> Include<'a> {
    pub fn target(&self) -> &'a str {
        match *self {
            Include::Local(t) | Include::External(t) => t,
        }
    }
}

/// Return the text following the directive token, or None when the line is
/// not an include directive at all.
fn after_directive(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches([' ', '\t']).strip_prefix('#')?;
    rest.trim_start_matches([' ', '\t']).strip_prefix(DIRECTIVE)
}

/// True for every include directive, whether or not it names a usable target.
pub fn is_directive(line: &str) -> bool {
    after_directive(line).is_some()
}

/// Classify a line. Returns None for non-directives and for directives whose
/// target is missing, empty, or not closed.
pub fn classify(line: &str) -> Option<Include<'_>> {
    let rest = after_directive(line)?.trim_start();

    let (close, local) = match rest.chars().next()? {
        '"' => ('"', true),
        '<' => ('>', false),
        _ => return None,
    };

    // Both opening delimiters are one byte wide
    let inner = &rest[1..];
    let end = inner.find(close)?;
    let target = &inner[..end];

    if target.is_empty() {
        return None;
    }

    Some(if local { Include::Local(target) } else { Include::External(target) })
}

/// Target of a quoted directive.
pub fn local_target(line: &str) -> Option<&str> {
    match classify(line)? {
        Include::Local(t) => Some(t),
        Include::External(_) => None,
    }
}

/// Target of an angle-bracket directive.
pub fn external_target(line: &str) -> Option<&str> {
    match classify(line)? {
        Include::External(t) => Some(t),
        Include::Local(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_and_external() {
        assert_eq!(classify("#include \"a.hpp\""), Some(Include::Local("a.hpp")));
        assert_eq!(classify("#include <vector>"), Some(Include::External("vector")));
        assert_eq!(local_target("#include \"src/utils.hpp\""), Some("src/utils.hpp"));
        assert_eq!(external_target("#include <sys/time.h>"), Some("sys/time.h"));
    }

    #[test]
    fn test_whitespace_conventions() {
        assert_eq!(classify("#include<map>"), Some(Include::External("map")));
        assert_eq!(classify("  #  include   \"x.hpp\""), Some(Include::Local("x.hpp")));
        assert_eq!(classify("\t#include <set> // comment"), Some(Include::External("set")));
    }

    #[test]
    fn test_directive_without_target() {
        assert!(is_directive("#include"));
        assert_eq!(classify("#include"), None);
        assert_eq!(classify("#include HEADER_MACRO"), None);
        assert_eq!(classify("#include \"unterminated.hpp"), None);
        assert_eq!(classify("#include <vector"), None);
        assert_eq!(classify("#include \"\""), None);
        assert!(is_directive("#include_next <stdio.h>"));
        assert_eq!(classify("#include_next <stdio.h>"), None);
    }

    #[test]
    fn test_not_a_directive() {
        assert!(!is_directive("int main() {}"));
        assert!(!is_directive("// #include <vector>"));
        assert!(!is_directive("#define INCLUDE 1"));
        assert!(!is_directive("#pragma once"));
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_kind_filters() {
        assert_eq!(local_target("#include <vector>"), None);
        assert_eq!(external_target("#include \"a.hpp\""), None);
        assert_eq!(Include::Local("a.hpp").target(), "a.hpp");
    }

    #[test]
    fn test_classification_is_pure() {
        let line = "#include \"src/defines.hpp\"";
        let first = classify(line);
        for _ in 0..3 {
            assert_eq!(classify(line), first);
        }
    }
}
