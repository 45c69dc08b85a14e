//! Corpus scanning
//!
//!     Feeds whole ATF documents through the line parser. Only content lines are parsed;
//!     structure is followed just far enough to know which artefact and language each line
//!     belongs to:
//!
//!         &P123456 = Name          new artefact; language back to "und"
//!         #atf: lang akk           document language
//!         # anything else          comment
//!         @obverse, $ broken, ...  structural (@ $ | >), skipped
//!         @translation ...         everything up to the next artefact is skipped
//!         ==%s text                parallel text; the line minus "==" is parsed
//!                                  (other "==" lines are labelled like any line)
//!         1. text                  label, then transliteration
//!
//!     A malformed line never stops the scan. Its error is recorded with the artefact and
//!     label it came from, and scanning goes on with the next line.

use crate::atf::error::ParseError;
use crate::atf::grammar::Grammar;
use crate::atf::parser::parse_transliteration;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A transliteration line pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentLine {
    pub artefact: String,
    pub label: String,
    pub language: String,
    pub text: String,
    /// 1-based.
    pub line_number: usize,
}

/// A content line with a malformed label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LineIssue {
    /// No space or tab separates a label from the text; the line is skipped.
    MissingLabel {
        artefact: String,
        line_number: usize,
        line: String,
    },
    /// The label does not end in "."; the text is still parsed.
    BadLabel {
        artefact: String,
        line_number: usize,
        label: String,
    },
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::MissingLabel {
                artefact,
                line_number,
                line,
            } => write!(f, "{artefact}:{line_number}: no label in {line:?}"),
            LineIssue::BadLabel {
                artefact,
                line_number,
                label,
            } => write!(f, "{artefact}:{line_number}: bad line label {label:?}"),
        }
    }
}

/// A content line that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    pub document: String,
    pub artefact: String,
    pub label: String,
    pub line_number: usize,
    pub error: ParseError,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.document, self.line_number, self.artefact, self.label, self.error
        )
    }
}

/// Everything learned from scanning one or more documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub lines_parsed: usize,
    /// Grapheme frequencies, keyed by text without trailing flags.
    pub counts: BTreeMap<String, usize>,
    pub failures: Vec<LineFailure>,
    pub issues: Vec<LineIssue>,
}

impl ScanReport {
    /// Combine two reports, keeping `self`'s lines first.
    pub fn merged(mut self, other: ScanReport) -> ScanReport {
        self.lines_parsed += other.lines_parsed;
        for (text, count) in other.counts {
            *self.counts.entry(text).or_default() += count;
        }
        self.failures.extend(other.failures);
        self.issues.extend(other.issues);
        self
    }

    /// Failures grouped by error category.
    pub fn errors_by_category(&self) -> BTreeMap<&'static str, Vec<&LineFailure>> {
        let mut groups: BTreeMap<&'static str, Vec<&LineFailure>> = BTreeMap::new();
        for failure in &self.failures {
            groups
                .entry(failure.error.kind.category())
                .or_default()
                .push(failure);
        }
        groups
    }

    /// The `n` most frequent graphemes, most frequent first; ties in text order.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(text, count)| (text.as_str(), *count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        counts.truncate(n);
        counts
    }
}

/// The content lines of `document`.
pub fn content_lines(document: &str) -> Vec<ContentLine> {
    ingest(document).0
}

fn ingest(document: &str) -> (Vec<ContentLine>, Vec<LineIssue>) {
    let mut lines = Vec::new();
    let mut issues = Vec::new();
    let mut artefact = String::new();
    let mut language = String::from("und");
    let mut in_translation = false;

    for (index, line) in document.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('&') {
            let id = header.split('=').next().unwrap_or(header);
            artefact = id.trim().to_string();
            language = String::from("und");
            in_translation = false;
            continue;
        }
        if line.starts_with('#') {
            if line.starts_with("#atf: lang") {
                if let Some(code) = line.split_whitespace().last() {
                    language = code.to_string();
                }
            }
            continue;
        }
        if line.starts_with(|c: char| matches!(c, '@' | '$' | '|' | '>')) {
            if line.starts_with("@translation") {
                in_translation = true;
            }
            continue;
        }
        if in_translation {
            continue;
        }

        let parallel = line.starts_with("==%");
        let (label, text) = if parallel {
            line.split_at(2)
        } else {
            match line.find(|c: char| c == ' ' || c == '\t') {
                Some(split) => (&line[..split], &line[split + 1..]),
                None => {
                    issues.push(LineIssue::MissingLabel {
                        artefact: artefact.clone(),
                        line_number,
                        line: line.to_string(),
                    });
                    continue;
                }
            }
        };
        if !parallel && !label.ends_with('.') {
            issues.push(LineIssue::BadLabel {
                artefact: artefact.clone(),
                line_number,
                label: label.to_string(),
            });
        }

        lines.push(ContentLine {
            artefact: artefact.clone(),
            label: label.to_string(),
            language: language.clone(),
            text: text.trim().to_string(),
            line_number,
        });
    }
    (lines, issues)
}

/// Parse every content line of one document, skipping the malformed ones.
pub fn scan(name: &str, document: &str, grammar: &Grammar) -> ScanReport {
    let (lines, issues) = ingest(document);
    let mut report = ScanReport {
        issues,
        ..ScanReport::default()
    };

    for line in lines {
        match parse_transliteration(&line.text, &line.language, grammar) {
            Ok(occurrences) => {
                report.lines_parsed += 1;
                for occurrence in occurrences {
                    let key = occurrence
                        .text
                        .trim_end_matches(|c: char| matches!(c, '#' | '?' | '!' | '*'));
                    *report.counts.entry(key.to_string()).or_default() += 1;
                }
            }
            Err(error) => {
                warn!(
                    "{}:{}: skipping {} {} ({})",
                    name,
                    line.line_number,
                    line.artefact,
                    line.label,
                    error.kind.category()
                );
                report.failures.push(LineFailure {
                    document: name.to_string(),
                    artefact: line.artefact,
                    label: line.label,
                    line_number: line.line_number,
                    error,
                });
            }
        }
    }

    info!(
        "{}: {} lines parsed, {} skipped",
        name,
        report.lines_parsed,
        report.failures.len()
    );
    report
}

/// Scan named documents in parallel and merge the reports in input order.
pub fn scan_documents(documents: &[(String, String)], grammar: &Grammar) -> ScanReport {
    let report = documents
        .par_iter()
        .map(|(name, text)| scan(name, text, grammar))
        .reduce(ScanReport::default, ScanReport::merged);
    info!(
        "{} documents: {} lines parsed, {} skipped",
        documents.len(),
        report.lines_parsed,
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atf::error::ErrorKind;

    const DOCUMENT: &str = "\
&P100001 = Letter
#atf: lang akk
@obverse
1. a-na be-li₂-ia
2. qi₂-bi₂-ma
$ rest broken
@translation labeled en project
@(1) To my lord
&P100002 = List
#atf: lang sux
@obverse
1.\tlugal
2 lugal
==%s lugal
nolabel
";

    #[test]
    fn follows_artefacts_and_languages() {
        let lines = content_lines(DOCUMENT);
        let summary: Vec<_> = lines
            .iter()
            .map(|l| (l.artefact.as_str(), l.label.as_str(), l.language.as_str(), l.text.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("P100001", "1.", "akk", "a-na be-li₂-ia"),
                ("P100001", "2.", "akk", "qi₂-bi₂-ma"),
                ("P100002", "1.", "sux", "lugal"),
                ("P100002", "2", "sux", "lugal"),
                ("P100002", "==", "sux", "%s lugal"),
            ]
        );
        assert_eq!(lines[0].line_number, 4);
    }

    #[test]
    fn label_issues_are_recorded() {
        let report = scan("doc", DOCUMENT, &Grammar::default());
        assert_eq!(
            report.issues,
            vec![
                LineIssue::BadLabel {
                    artefact: "P100002".into(),
                    line_number: 13,
                    label: "2".into(),
                },
                LineIssue::MissingLabel {
                    artefact: "P100002".into(),
                    line_number: 15,
                    line: "nolabel".into(),
                },
            ]
        );
    }

    #[test]
    fn only_shifted_parallel_lines_drop_the_marker() {
        let document = "&X\n==%a a-na\n== ka\n";
        let lines = content_lines(document);
        let split: Vec<_> = lines
            .iter()
            .map(|l| (l.label.as_str(), l.text.as_str(), l.language.as_str()))
            .collect();
        assert_eq!(split, vec![("==", "%a a-na", "und"), ("==", "ka", "und")]);

        let report = scan("doc", document, &Grammar::default());
        assert_eq!(report.lines_parsed, 2);
        assert_eq!(
            report.issues,
            vec![LineIssue::BadLabel {
                artefact: "X".into(),
                line_number: 3,
                label: "==".into(),
            }]
        );
    }

    #[test]
    fn counts_graphemes_without_flags() {
        let report = scan("doc", "&X\n1. lugal#\n2. lugal? lugal-e\n", &Grammar::default());
        assert_eq!(report.lines_parsed, 2);
        assert_eq!(report.counts.get("lugal"), Some(&3));
        assert_eq!(report.counts.get("e"), Some(&1));
        assert_eq!(report.top(1), vec![("lugal", 3)]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let document = "&P1\n1. a-na\n2. a]\n3. ...\n4. a\n";
        let report = scan("doc", document, &Grammar::default());
        assert_eq!(report.lines_parsed, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].label, "2.");
        assert_eq!(report.failures[0].artefact, "P1");
        assert_eq!(
            report.failures[1].error.kind,
            ErrorKind::BreakageOutsideBrackets
        );

        let groups = report.errors_by_category();
        assert_eq!(groups["unstarted-attribute"].len(), 1);
        assert_eq!(groups["breakage-outside-brackets"].len(), 1);
    }

    #[test]
    fn documents_merge_in_order() {
        let documents = vec![
            ("one".to_string(), "&A\n1. a]\n2. ka\n".to_string()),
            ("two".to_string(), "&B\n1. ka-ka\n2. b]\n".to_string()),
        ];
        let report = scan_documents(&documents, &Grammar::default());
        assert_eq!(report.lines_parsed, 2);
        assert_eq!(report.counts.get("ka"), Some(&3));
        let origins: Vec<_> = report
            .failures
            .iter()
            .map(|f| f.document.as_str())
            .collect();
        assert_eq!(origins, vec!["one", "two"]);
    }
}
