//! In-memory model of an INI file.
//!
//! The document keeps every line it was parsed from, so that editing one
//! entry and rendering the file back leaves comments, blank lines, and
//! unrecognised lines exactly as they were. Name lookups follow the Windows
//! profile rules: case-insensitive, surrounding whitespace ignored, and the
//! first occurrence wins when a section or key is duplicated.
//!
//! Format:
//! ```ini
//! ; comment
//! [section]
//! key = value
//! quoted = "  value with edge spaces  "
//! ```

use tracing::warn;

/// One physical line of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `[name]` header.
    Section { name: String, raw: String },
    /// `key = value` inside a section. `value` is already unquoted.
    Entry {
        key: String,
        value: String,
        raw: String,
    },
    /// Blank lines, comments, orphan entries before the first header, and
    /// anything else that is carried through untouched.
    Other(String),
}

impl Line {
    fn raw(&self) -> &str {
        match self {
            Self::Section { raw, .. } | Self::Entry { raw, .. } | Self::Other(raw) => raw,
        }
    }

    fn is_section(&self) -> bool {
        matches!(self, Self::Section { .. })
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Other(raw) if raw.trim().is_empty())
    }
}

/// A parsed INI file that can be queried, edited, and rendered back.
///
/// # Examples
///
/// ```
/// use profile_store::backend::document::Document;
///
/// let mut doc = Document::parse("; settings\n[Window]\nWidth=640\n");
/// assert_eq!(doc.value("window", "WIDTH"), Some("640"));
///
/// doc.set("Window", "Height", "480");
/// assert_eq!(doc.render(), "; settings\n[Window]\nWidth=640\nHeight=480\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    newline: &'static str,
    bom: bool,
}

impl Document {
    /// Parse `content` into a document. Parsing never fails: lines that are
    /// not headers or entries are kept as opaque text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let (bom, body) = content
            .strip_prefix('\u{feff}')
            .map_or((false, content), |rest| (true, rest));
        let newline = if body.contains("\r\n") { "\r\n" } else { "\n" };

        let mut lines = Vec::new();
        let mut in_section = false;
        for raw in body.lines() {
            let line = parse_line(raw, in_section);
            in_section |= line.is_section();
            lines.push(line);
        }

        Self {
            lines,
            newline,
            bom,
        }
    }

    /// Render the document back to text.
    ///
    /// Every line, including the last, is terminated by the document's line
    /// ending. An empty document renders to an empty string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push('\u{feff}');
        }
        for line in &self.lines {
            out.push_str(line.raw());
            out.push_str(self.line_ending());
        }
        out
    }

    /// Section names in file order, each listed once with its on-disk case.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for line in &self.lines {
            if let Line::Section { name, .. } = line {
                if names.iter().any(|seen| names_match(seen, name)) {
                    warn!(section = %name, "duplicate section header, later block is ignored");
                    continue;
                }
                names.push(name);
            }
        }
        names
    }

    /// Key names of `section` in file order, each listed once.
    #[must_use]
    pub fn key_names(&self, section: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (key, _) in self.entries_of(section) {
            if !keys.iter().any(|seen| names_match(seen, key)) {
                keys.push(key);
            }
        }
        keys
    }

    /// Value of `key` in `section`, if present.
    #[must_use]
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.entries_of(section)
            .find(|(k, _)| names_match(k, key))
            .map(|(_, v)| v)
    }

    /// Insert or replace `key = value` in `section`, creating the section at
    /// the end of the document if needed.
    ///
    /// Returns `true` if the document changed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        let section = section.trim();
        let key = key.trim();

        let Some((start, end)) = self.block(section) else {
            if !self.lines.is_empty() && !self.lines.last().is_some_and(Line::is_blank) {
                self.lines.push(Line::Other(String::new()));
            }
            self.lines.push(Line::Section {
                name: section.to_string(),
                raw: format!("[{section}]"),
            });
            self.lines.push(entry_line(key, value));
            return true;
        };

        let existing = self
            .lines
            .get(start + 1..end)
            .and_then(|block| {
                block.iter().position(
                    |line| matches!(line, Line::Entry { key: k, .. } if names_match(k, key)),
                )
            })
            .map(|offset| start + 1 + offset);

        if let Some(idx) = existing {
            if let Some(Line::Entry { key: k, value: v, .. }) = self.lines.get(idx) {
                if v == value {
                    return false;
                }
                let replacement = entry_line(k, value);
                if let Some(slot) = self.lines.get_mut(idx) {
                    *slot = replacement;
                }
            }
            return true;
        }

        // Append after the last entry of the block, keeping trailing blank
        // lines and comments between this section and the next one.
        let insert_at = self
            .lines
            .get(start + 1..end)
            .and_then(|block| block.iter().rposition(|l| matches!(l, Line::Entry { .. })))
            .map_or(start + 1, |offset| start + 2 + offset);
        self.lines.insert(insert_at, entry_line(key, value));
        true
    }

    /// Remove `key` from `section`. Returns `true` if the document changed.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        let Some((start, end)) = self.block(section) else {
            return false;
        };
        let found = self.lines.get(start + 1..end).and_then(|block| {
            block
                .iter()
                .position(|line| matches!(line, Line::Entry { key: k, .. } if names_match(k, key)))
        });
        found.is_some_and(|offset| {
            self.lines.remove(start + 1 + offset);
            true
        })
    }

    /// Remove every block headed by `section`, entries and comments included.
    /// Returns `true` if the document changed.
    pub fn remove_section(&mut self, section: &str) -> bool {
        let mut changed = false;
        while let Some((start, end)) = self.block(section) {
            self.lines.drain(start..end);
            changed = true;
        }
        changed
    }

    fn line_ending(&self) -> &'static str {
        if self.newline.is_empty() {
            "\n"
        } else {
            self.newline
        }
    }

    /// Line range `[header, next header)` of the first block named `section`.
    fn block(&self, section: &str) -> Option<(usize, usize)> {
        let start = self
            .lines
            .iter()
            .position(|line| matches!(line, Line::Section { name, .. } if names_match(name, section)))?;
        let end = self
            .lines
            .iter()
            .skip(start + 1)
            .position(Line::is_section)
            .map_or(self.lines.len(), |offset| start + 1 + offset);
        Some((start, end))
    }

    fn entries_of<'a>(&'a self, section: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let block = self
            .block(section)
            .and_then(|(start, end)| self.lines.get(start + 1..end))
            .unwrap_or_default();
        block.iter().filter_map(|line| match line {
            Line::Entry { key, value, .. } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }
}

/// Compare two section or key names the way profile stores do.
///
/// # Examples
///
/// ```
/// use profile_store::backend::document::names_match;
///
/// assert!(names_match("Settings", " settings "));
/// assert!(names_match("GRÖSSE", "grösse"));
/// assert!(!names_match("a", "b"));
/// ```
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

/// Encode a value so that reading it back yields exactly `value`.
///
/// Values whose edges would be trimmed, or that are themselves wrapped in
/// quotes, get an extra pair of double quotes.
///
/// # Examples
///
/// ```
/// use profile_store::backend::document::encode_value;
///
/// assert_eq!(encode_value("plain"), "plain");
/// assert_eq!(encode_value("  padded "), "\"  padded \"");
/// assert_eq!(encode_value("\"quoted\""), "\"\"quoted\"\"");
/// ```
#[must_use]
pub fn encode_value(value: &str) -> String {
    if value.trim() != value || is_quoted(value) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Undo [`encode_value`] on a raw value from the file.
#[must_use]
pub fn decode_value(raw: &str) -> &str {
    let trimmed = raw.trim();
    if is_quoted(trimmed) {
        trimmed
            .get(1..trimmed.len() - 1)
            .unwrap_or(trimmed)
    } else {
        trimmed
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

fn entry_line(key: &str, value: &str) -> Line {
    Line::Entry {
        key: key.to_string(),
        value: value.to_string(),
        raw: format!("{key}={}", encode_value(value)),
    }
}

/// Classify one raw line. Entries only count inside a section.
fn parse_line(raw: &str, in_section: bool) -> Line {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return Line::Other(raw.to_string());
    }

    if let Some(name) = parse_header(trimmed) {
        return Line::Section {
            name,
            raw: raw.to_string(),
        };
    }

    if in_section && let Some((key, value)) = trimmed.split_once('=') {
        let key = key.trim();
        if !key.is_empty() {
            return Line::Entry {
                key: key.to_string(),
                value: decode_value(value).to_string(),
                raw: raw.to_string(),
            };
        }
    }

    Line::Other(raw.to_string())
}

/// Parse a `[header]` line preserving original case. Text after the closing
/// bracket is ignored.
fn parse_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?;
    let (name, _) = inner.split_once(']')?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
