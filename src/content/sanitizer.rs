use regex::Regex;
use std::sync::LazyLock;

/// A single text rewrite: every match of `pattern` becomes `replacement`
#[derive(Debug, Clone)]
pub struct CleanupRule {
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl CleanupRule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Apply the rule to the whole text
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Ordered conversion-artifact repairs. Order matters: quotes and dashes are
/// normalized before the broad invisible range is stripped, `&amp;` is
/// unescaped after `&nbsp;` and before the entities it could spell.
static CLEANUP_RULES: LazyLock<Vec<CleanupRule>> = LazyLock::new(|| {
    vec![
        CleanupRule::new(r"[\x{200B}\x{200C}\x{200D}\x{FEFF}]+", ""),
        CleanupRule::new(r"[\x{201C}\x{201D}]", "\""),
        CleanupRule::new(r"[\x{2018}\x{2019}]", "'"),
        CleanupRule::new(r"[\x{2013}\x{2014}]", "--"),
        CleanupRule::new(
            r"[\x{00AD}\x{061C}\x{1680}\x{2000}-\x{200F}\x{2028}-\x{202F}\x{205F}-\x{206F}]+",
            "",
        ),
        CleanupRule::new(r"&nbsp;", " "),
        CleanupRule::new(r"&amp;", "&"),
        CleanupRule::new(r"&lt;", "<"),
        CleanupRule::new(r"&gt;", ">"),
        CleanupRule::new(r"&quot;", "\""),
        CleanupRule::new(r"\[([^\]]+)\]\(\s*\)", "${1}"),
        // Empty emphasis standing apart from words and other markers
        CleanupRule::new(r"(?m)(^|[^\w*])\*\*\s*\*\*([^\w*]|$)", "${1}${2}"),
        CleanupRule::new(r"(?m)(^|[^\w*])__\s*__([^\w*]|$)", "${1}${2}"),
        CleanupRule::new(r"(?m)(^|[^\w*])\*\s*\*([^\w*]|$)", "${1}${2}"),
        CleanupRule::new(r"(?m)(^|[^\w*])_\s*_([^\w*]|$)", "${1}${2}"),
        // Empty emphasis glued to words, as in `Create** **Volume`
        CleanupRule::new(r"(\w)\*\*(\s+)\*\*(\w)", "${1}${2}${3}"),
        CleanupRule::new(r"(\w)__(\s+)__(\w)", "${1}${2}${3}"),
        CleanupRule::new(r"(\w)\*(\s+)\*(\w)", "${1}${2}${3}"),
    ]
});

static HTML_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})([^#\s])").unwrap());
static TRAILING_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Passes run by [`sanitize_document`] after the cleanup rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Drop `<!-- ... -->` blocks
    pub remove_html_comments: bool,

    /// Turn `##Title` into `## Title`
    pub fix_headings: bool,

    /// Expand tabs and strip trailing whitespace
    pub normalize_whitespace: bool,

    /// Collapse three or more newlines into one blank line
    pub collapse_blank_lines: bool,

    /// Trim the whole document
    pub trim: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            remove_html_comments: true,
            fix_headings: true,
            normalize_whitespace: true,
            collapse_blank_lines: true,
            trim: true,
        }
    }
}

/// Repairs artifacts left by the markup-to-text conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSanitizer;

impl ContentSanitizer {
    pub fn new() -> Self {
        Self
    }

    pub fn rules(&self) -> &'static [CleanupRule] {
        &CLEANUP_RULES
    }

    /// Apply the cleanup rules in order until the text stops changing.
    ///
    /// Every rule shortens the text when it matches, so the loop ends.
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.rules().iter().fold(current.clone(), |acc, rule| rule.apply(&acc));
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Sanitize `text` with the default rule set
pub fn sanitize(text: &str) -> String {
    ContentSanitizer.sanitize(text)
}

/// Sanitize a whole markdown document: cleanup rules, then the layout passes
/// selected in `options`
pub fn sanitize_document(text: &str, options: &SanitizeOptions) -> String {
    let mut document = sanitize(text);

    if options.remove_html_comments {
        document = HTML_COMMENT_RE.replace_all(&document, "").into_owned();
    }
    if options.fix_headings {
        document = HEADING_RE.replace_all(&document, "${1} ${2}").into_owned();
    }
    if options.normalize_whitespace {
        document = document.replace('\t', "    ");
        document = TRAILING_WS_RE.replace_all(&document, "").into_owned();
    }
    if options.collapse_blank_lines {
        document = BLANK_LINES_RE.replace_all(&document, "\n\n").into_owned();
    }
    if options.trim {
        document = document.trim().to_string();
    }

    document
}
