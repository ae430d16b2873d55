//! Language detection for files whose extension is not mapped to a parser.

use regex::Regex;

/// Predicts the language label of a piece of source text.
pub trait LanguageClassifier: Send + Sync {
    /// A language label such as `"python"`, or `"unknown"`.
    fn predict(&self, text: &str) -> String;
}

/// Label returned when no language scores.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Keyword patterns per language. Each match adds one point.
const LANGUAGE_PATTERNS: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            r"(?m)^\s*def\s+\w+\s*\(.*\)\s*(->\s*[\w\[\], ]+)?:",
            r"(?m)^\s*class\s+\w+(\(.*\))?:",
            r"(?m)^\s*(from\s+[\w.]+\s+)?import\s+\w+",
            r"\bself\.",
            r"(?m)^\s*if\s+__name__\s*==",
        ],
    ),
    (
        "java",
        &[
            r"\bpublic\s+(static\s+)?(final\s+)?class\s+\w+",
            r"(?m)^\s*package\s+[\w.]+;",
            r"(?m)^\s*import\s+[\w.]+(\.\*)?;",
            r"\bSystem\.out\.print",
            r"@Override\b",
        ],
    ),
    (
        "go",
        &[
            r"(?m)^package\s+\w+\s*$",
            r"(?m)^func\s+(\(\w+\s+\*?\w+\)\s+)?\w+\(",
            r":=",
            r"\bfmt\.\w+\(",
            r"(?m)^type\s+\w+\s+(struct|interface)\s*\{",
        ],
    ),
    (
        "csharp",
        &[
            r"(?m)^\s*using\s+System(\.\w+)*;",
            r"(?m)^\s*namespace\s+[\w.]+",
            r"\bConsole\.Write(Line)?\(",
            r"\bpublic\s+(async\s+)?(void|Task|string|int)\s+\w+\s*\(",
            r"\{\s*get;\s*(set;)?\s*\}",
        ],
    ),
    (
        "typescript",
        &[
            r"(?m)^\s*(export\s+)?interface\s+\w+\s*\{",
            r":\s*(string|number|boolean|void)\b",
            r"(?m)^\s*(export\s+)?type\s+\w+\s*=",
            r"\bimport\s+.*\s+from\s+'[^']+';?",
        ],
    ),
    (
        "javascript",
        &[
            r"\bfunction\s+\w+\s*\(",
            r"\b(const|let|var)\s+\w+\s*=",
            r"=>\s*\{",
            r"\brequire\(['\x22]",
            r"\bconsole\.log\(",
        ],
    ),
];

/// Keyword-scoring classifier. The highest-scoring language wins; ties go
/// to the language listed first.
pub struct HeuristicClassifier {
    languages: Vec<(&'static str, Vec<Regex>)>,
}

impl HeuristicClassifier {
    pub fn new() -> Self {
        let languages = LANGUAGE_PATTERNS
            .iter()
            .map(|(name, patterns)| {
                let compiled = patterns
                    .iter()
                    .filter_map(|p| match Regex::new(p) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            tracing::warn!(language = name, pattern = p, error = %e, "invalid classifier pattern");
                            None
                        }
                    })
                    .collect();
                (*name, compiled)
            })
            .collect();

        Self { languages }
    }

    fn score(patterns: &[Regex], text: &str) -> usize {
        patterns.iter().filter(|re| re.is_match(text)).count()
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for HeuristicClassifier {
    fn predict(&self, text: &str) -> String {
        let mut best: Option<(&str, usize)> = None;
        for (name, patterns) in &self.languages {
            let score = Self::score(patterns, text);
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((name, score));
            }
        }
        best.map(|(name, _)| name)
            .unwrap_or(UNKNOWN_LANGUAGE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_python() {
        let classifier = HeuristicClassifier::new();
        let text = "import os\n\nclass Loader:\n    def load(self, path):\n        return self.read(path)\n";
        assert_eq!(classifier.predict(text), "python");
    }

    #[test]
    fn test_detects_go() {
        let classifier = HeuristicClassifier::new();
        let text = "package main\n\nfunc main() {\n    x := 1\n    fmt.Println(x)\n}\n";
        assert_eq!(classifier.predict(text), "go");
    }

    #[test]
    fn test_detects_java() {
        let classifier = HeuristicClassifier::new();
        let text = "package shop;\n\npublic class Cart {\n    @Override\n    public String toString() { return \"\"; }\n}\n";
        assert_eq!(classifier.predict(text), "java");
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        let classifier = HeuristicClassifier::new();
        assert_eq!(classifier.predict("Lorem ipsum dolor sit amet."), UNKNOWN_LANGUAGE);
        assert_eq!(classifier.predict(""), UNKNOWN_LANGUAGE);
    }
}
