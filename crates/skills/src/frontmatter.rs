//! Parser for the YAML subset allowed in skill document headers.
//!
//! Supported: `key: value` scalars (strings, numbers, booleans, `[a, b]` flow
//! lists), nested mappings and `- item` sequences by indentation, and `>`
//! folded / `|` literal block scalars. Anything else is skipped. The parser
//! never fails; a missing or unterminated header yields an empty mapping.

use crate::types::{Frontmatter, FrontmatterValue};

const DELIMITER: &str = "---";

/// Parse the frontmatter block of a skill document.
pub fn parse_frontmatter(content: &str) -> Frontmatter {
    match split_frontmatter(content) {
        Some((header, _body)) => parse_header(header),
        None => Frontmatter::new(),
    }
}

/// Return the value at `key` only when it is a string.
pub fn get_frontmatter_value<'a>(frontmatter: &'a Frontmatter, key: &str) -> Option<&'a str> {
    frontmatter.get(key).and_then(FrontmatterValue::as_str)
}

/// Split a document into `(header, body)` around its `---` delimiter lines.
///
/// The first line must be the opening delimiter and a closing delimiter line
/// must follow; otherwise returns `None`. Trailing whitespace on delimiter
/// lines is tolerated.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let header = &content[header_start..offset];
            let body = &content[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

/// Parse header text (without delimiters) into a mapping.
pub fn parse_header(header: &str) -> Frontmatter {
    let lines: Vec<Line<'_>> = header
        .split('\n')
        .map(|raw| Line::new(raw.strip_suffix('\r').unwrap_or(raw)))
        .collect();
    let Some(top_indent) = lines
        .iter()
        .filter(|l| l.is_content())
        .map(|l| l.indent)
        .min()
    else {
        return Frontmatter::new();
    };

    let mut parser = Parser { lines, pos: 0 };
    parser.parse_mapping(top_indent)
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    raw: &'a str,
    /// Column where `text()` starts. Leading whitespace and the `- ` of a
    /// sequence item are ASCII, so this is also a byte offset into `raw`.
    indent: usize,
}

impl<'a> Line<'a> {
    fn new(raw: &'a str) -> Self {
        let indent = raw.bytes().take_while(|b| *b == b' ' || *b == b'\t').count();
        Self { raw, indent }
    }

    fn text(&self) -> &'a str {
        &self.raw[self.indent..]
    }

    fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    fn is_content(&self) -> bool {
        !self.is_blank() && !self.text().starts_with('#')
    }

    /// The line with at most `block_indent` columns of indentation removed.
    fn dedent(&self, block_indent: usize) -> &'a str {
        &self.raw[self.indent.min(block_indent)..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStyle {
    Folded,
    Literal,
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Skip blank and comment lines; return the index of the next content line.
    fn peek_content(&mut self) -> Option<usize> {
        while self.pos < self.lines.len() && !self.lines[self.pos].is_content() {
            self.pos += 1;
        }
        (self.pos < self.lines.len()).then_some(self.pos)
    }

    fn parse_mapping(&mut self, indent: usize) -> Frontmatter {
        let mut map = Frontmatter::new();

        while let Some(idx) = self.peek_content() {
            let line = self.lines[idx];
            if line.indent < indent {
                break;
            }
            self.pos = idx + 1;

            let text = line.text().trim_end();
            if line.indent > indent || is_sequence_item(text) {
                tracing::trace!(line = text, "skipping stray frontmatter line");
                continue;
            }
            let Some((key, rest)) = split_key(text) else {
                tracing::trace!(line = text, "skipping frontmatter line without key");
                continue;
            };

            let rest = rest.trim();
            if rest.is_empty() {
                if let Some(value) = self.parse_nested(indent, true) {
                    map.insert(key, value);
                }
            } else if let Some(style) = block_style(rest) {
                let text = self.parse_block_scalar(indent, style);
                map.insert(key, FrontmatterValue::String(text));
            } else {
                map.insert(key, parse_scalar(rest));
            }
        }

        map
    }

    /// Parse the block that follows a value-less `key:` or a bare `-`.
    fn parse_nested(
        &mut self,
        parent_indent: usize,
        same_indent_list: bool,
    ) -> Option<FrontmatterValue> {
        let idx = self.peek_content()?;
        let line = self.lines[idx];
        let text = line.text().trim_end();

        let list_indent_ok =
            line.indent > parent_indent || (same_indent_list && line.indent == parent_indent);
        if is_sequence_item(text) && list_indent_ok {
            return Some(FrontmatterValue::List(self.parse_sequence(line.indent)));
        }
        if line.indent > parent_indent {
            return Some(FrontmatterValue::Map(self.parse_mapping(line.indent)));
        }
        None
    }

    fn parse_sequence(&mut self, indent: usize) -> Vec<FrontmatterValue> {
        let mut items = Vec::new();

        while let Some(idx) = self.peek_content() {
            let line = self.lines[idx];
            let text = line.text().trim_end();
            if line.indent < indent || (line.indent == indent && !is_sequence_item(text)) {
                break;
            }
            if line.indent > indent {
                self.pos = idx + 1;
                tracing::trace!(line = text, "skipping stray frontmatter line");
                continue;
            }

            let after_dash = &text[1..];
            let item = after_dash.trim_start();
            let item_column = line.indent + 1 + (after_dash.len() - item.len());

            if item.is_empty() {
                self.pos = idx + 1;
                if let Some(value) = self.parse_nested(indent, false) {
                    items.push(value);
                }
            } else if starts_inline_mapping(item) {
                // `- kind: brew` opens a mapping whose keys align with `kind`.
                self.lines[idx] = Line {
                    raw: line.raw,
                    indent: item_column,
                };
                self.pos = idx;
                items.push(FrontmatterValue::Map(self.parse_mapping(item_column)));
            } else {
                self.pos = idx + 1;
                items.push(parse_scalar(item));
            }
        }

        items
    }

    fn parse_block_scalar(&mut self, parent_indent: usize, style: BlockStyle) -> String {
        let start = self.pos;
        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            if !line.is_blank() && line.indent <= parent_indent {
                break;
            }
            self.pos += 1;
        }

        let block = &self.lines[start..self.pos];
        let Some(block_indent) = block.iter().find(|l| !l.is_blank()).map(|l| l.indent) else {
            return String::new();
        };
        let lines = block
            .iter()
            .map(|l| (!l.is_blank()).then(|| l.dedent(block_indent)));

        match style {
            BlockStyle::Folded => fold_lines(lines),
            BlockStyle::Literal => literal_lines(lines),
        }
    }
}

/// Join lines with spaces; blank lines separate paragraphs with one `\n`.
fn fold_lines<'a>(lines: impl Iterator<Item = Option<&'a str>>) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        match line {
            Some(text) => current.push(text.trim_end()),
            None if !current.is_empty() => {
                paragraphs.push(current.join(" "));
                current.clear();
            },
            None => {},
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs.join("\n")
}

/// Keep line breaks verbatim, dropping trailing blank lines.
fn literal_lines<'a>(lines: impl Iterator<Item = Option<&'a str>>) -> String {
    let mut out: Vec<&str> = lines.map(Option::unwrap_or_default).collect();
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn is_sequence_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ") || text.starts_with("-\t")
}

fn starts_inline_mapping(item: &str) -> bool {
    !item.starts_with(['[', '{']) && split_key(item).is_some()
}

/// `>` or `|` with optional chomping / indentation indicators.
fn block_style(value: &str) -> Option<BlockStyle> {
    let mut chars = value.chars();
    let style = match chars.next()? {
        '>' => BlockStyle::Folded,
        '|' => BlockStyle::Literal,
        _ => return None,
    };
    let indicators = chars.as_str();
    let valid = indicators.len() <= 2
        && indicators
            .chars()
            .all(|c| c == '+' || c == '-' || c.is_ascii_digit());
    valid.then_some(style)
}

/// Split `key: rest` at the first colon followed by whitespace or end of line.
fn split_key(text: &str) -> Option<(String, &str)> {
    if let Some(quote) = text.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let close = text[1..].find(quote)? + 1;
        let rest = text[close + 1..].trim_start().strip_prefix(':')?;
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let key = &text[1..close];
        return (!key.is_empty()).then(|| (key.to_string(), rest));
    }

    let bytes = text.as_bytes();
    let colon = (0..bytes.len()).find(|&i| {
        bytes[i] == b':' && matches!(bytes.get(i + 1), None | Some(b' ' | b'\t'))
    })?;
    let key = text[..colon].trim();
    (!key.is_empty()).then(|| (key.to_string(), &text[colon + 1..]))
}

/// Classify a bare scalar.
pub(crate) fn parse_scalar(raw: &str) -> FrontmatterValue {
    let raw = raw.trim();
    if let Some(inner) = strip_matching_quotes(raw) {
        return FrontmatterValue::String(inner.to_string());
    }
    match raw {
        "true" => return FrontmatterValue::Bool(true),
        "false" => return FrontmatterValue::Bool(false),
        _ => {},
    }
    if let Some(number) = parse_number(raw) {
        return FrontmatterValue::Number(number);
    }
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return FrontmatterValue::List(
            inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(parse_scalar)
                .collect(),
        );
    }
    FrontmatterValue::String(raw.to_string())
}

/// Strip one layer of matching `"` or `'` quotes.
pub(crate) fn strip_matching_quotes(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    if value.len() < 2 || !(first == '"' || first == '\'') || !value.ends_with(first) {
        return None;
    }
    Some(&value[1..value.len() - 1])
}

/// `-?digits(.digits)?`
fn parse_number(raw: &str) -> Option<serde_json::Number> {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
        return None;
    }

    if frac_part.is_none()
        && let Ok(int) = raw.parse::<i64>()
    {
        return Some(int.into());
    }
    raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn s(value: &str) -> FrontmatterValue {
        FrontmatterValue::from(value)
    }

    fn n(value: i64) -> FrontmatterValue {
        FrontmatterValue::Number(value.into())
    }

    #[test]
    fn parses_simple_keys() {
        let fm = parse_frontmatter("---\nname: demo\ndescription: Hello\n---\nBody");
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
        assert_eq!(get_frontmatter_value(&fm, "description"), Some("Hello"));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["name", "description"]);
    }

    #[test]
    fn missing_or_unterminated_header_is_empty() {
        assert!(parse_frontmatter("nope").is_empty());
        assert!(parse_frontmatter("no header markers").is_empty());
        assert!(parse_frontmatter("---\nname: demo\nBody without end").is_empty());
        assert!(parse_frontmatter("--- \nkey: v\nunterminated").is_empty());
        assert!(parse_frontmatter("").is_empty());
    }

    #[test]
    fn header_must_open_on_first_line() {
        assert!(parse_frontmatter("\n---\nname: demo\n---\n").is_empty());
        assert!(parse_frontmatter("----\nname: demo\n---\n").is_empty());
    }

    #[test]
    fn tolerates_crlf_and_trailing_delimiter_whitespace() {
        let fm = parse_frontmatter("--- \r\nname: demo\r\ncount: 2\r\n---  \r\nBody");
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
        assert_eq!(fm.get("count"), Some(&n(2)));
    }

    #[test]
    fn strips_one_layer_of_quotes() {
        let fm = parse_frontmatter(
            "---\nname: \"demo\"\ndescription: 'Hello'\nnested: \"'inner'\"\nkey: \"a \\\"b\\\"\"\n---\n",
        );
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
        assert_eq!(get_frontmatter_value(&fm, "description"), Some("Hello"));
        assert_eq!(get_frontmatter_value(&fm, "nested"), Some("'inner'"));
        assert_eq!(get_frontmatter_value(&fm, "key"), Some("a \\\"b\\\""));
    }

    #[test]
    fn quoted_numbers_and_booleans_stay_strings() {
        let fm = parse_frontmatter("---\nversion: \"3\"\nflag: 'true'\n---\n");
        assert_eq!(get_frontmatter_value(&fm, "version"), Some("3"));
        assert_eq!(get_frontmatter_value(&fm, "flag"), Some("true"));
    }

    #[rstest]
    #[case("3", n(3))]
    #[case("-12", n(-12))]
    #[case("1.5", FrontmatterValue::Number(serde_json::Number::from_f64(1.5).unwrap()))]
    #[case("true", FrontmatterValue::Bool(true))]
    #[case("false", FrontmatterValue::Bool(false))]
    #[case("True", s("True"))]
    #[case("1.2.3", s("1.2.3"))]
    #[case("1e5", s("1e5"))]
    #[case("-", s("-"))]
    #[case("[]", FrontmatterValue::List(vec![]))]
    #[case("[1, 2]", FrontmatterValue::List(vec![n(1), n(2)]))]
    #[case("[rg, \"fd\" , true]", FrontmatterValue::List(vec![s("rg"), s("fd"), FrontmatterValue::Bool(true)]))]
    #[case("https://example.com/a:b", s("https://example.com/a:b"))]
    fn classifies_scalars(#[case] raw: &str, #[case] expected: FrontmatterValue) {
        assert_eq!(parse_scalar(raw), expected);
    }

    #[test]
    fn getter_only_returns_strings() {
        let fm = parse_frontmatter("---\nname: demo\ncount: 3\nnums: [1, 2]\nobj:\n  a: b\n---\nBody");
        assert_eq!(fm.get("count"), Some(&n(3)));
        assert_eq!(fm.get("nums"), Some(&FrontmatterValue::List(vec![n(1), n(2)])));
        let mut obj = Frontmatter::new();
        obj.insert("a".into(), s("b"));
        assert_eq!(fm.get("obj"), Some(&FrontmatterValue::Map(obj)));
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
        assert_eq!(get_frontmatter_value(&fm, "count"), None);
        assert_eq!(get_frontmatter_value(&fm, "nums"), None);
        assert_eq!(get_frontmatter_value(&fm, "obj"), None);
        assert_eq!(get_frontmatter_value(&fm, "missing"), None);
    }

    #[test]
    fn folded_block_joins_lines_and_paragraphs() {
        let fm = parse_frontmatter(
            "---\nname: demo\ndescription: >\n  Hello\n  world.\n\n  Next paragraph.\n---\nBody",
        );
        assert_eq!(
            get_frontmatter_value(&fm, "description"),
            Some("Hello world.\nNext paragraph.")
        );
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
    }

    #[test]
    fn folded_block_collapses_blank_runs() {
        let fm = parse_frontmatter("---\nd: >-\n  a\n  b\n\n\n  c\n\nnext: 1\n---\n");
        assert_eq!(get_frontmatter_value(&fm, "d"), Some("a b\nc"));
        assert_eq!(fm.get("next"), Some(&n(1)));
    }

    #[test]
    fn literal_block_preserves_line_breaks() {
        let fm = parse_frontmatter("---\nname: demo\ndescription: |\n  Hello\n  world.\n---\nBody");
        assert_eq!(get_frontmatter_value(&fm, "description"), Some("Hello\nworld."));
    }

    #[test]
    fn literal_block_keeps_relative_indent_and_inner_blanks() {
        let fm = parse_frontmatter(
            "---\nhelp: |\n    usage: tool\n      --flag\n\n    # not a comment\nafter: x\n---\n",
        );
        assert_eq!(
            get_frontmatter_value(&fm, "help"),
            Some("usage: tool\n  --flag\n\n# not a comment")
        );
        assert_eq!(get_frontmatter_value(&fm, "after"), Some("x"));
    }

    #[test]
    fn empty_block_scalar_is_empty_string() {
        let fm = parse_frontmatter("---\nd: |\nname: x\n---\n");
        assert_eq!(get_frontmatter_value(&fm, "d"), Some(""));
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("x"));
    }

    #[test]
    fn nested_mappings_to_arbitrary_depth() {
        let fm = parse_frontmatter(
            "---\nmetadata:\n  jovis:\n    emoji: \"⚡\"\n    requires:\n      bins:\n        - rg\n  other: 1\ntop: yes\n---\n",
        );
        let json = serde_json::Value::Object(crate::types::frontmatter_to_json(fm));
        assert_eq!(
            json,
            serde_json::json!({
                "metadata": {"jovis": {"emoji": "⚡", "requires": {"bins": ["rg"]}}, "other": 1},
                "top": "yes"
            })
        );
    }

    #[test]
    fn block_sequences_of_scalars_and_mappings() {
        let fm = parse_frontmatter(
            "---\ntags:\n- code\n- \"search\"\ninstall:\n  - kind: brew\n    formula: rg\n    os: [macos]\n  - kind: node\n    package: x\n  -\n    kind: go\nafter: done\n---\n",
        );
        let json = serde_json::Value::Object(crate::types::frontmatter_to_json(fm));
        assert_eq!(
            json,
            serde_json::json!({
                "tags": ["code", "search"],
                "install": [
                    {"kind": "brew", "formula": "rg", "os": ["macos"]},
                    {"kind": "node", "package": "x"},
                    {"kind": "go"}
                ],
                "after": "done"
            })
        );
    }

    #[test]
    fn sequence_items_with_quoted_keys_open_mappings() {
        let fm = parse_frontmatter(
            "---\ninstall:\n  - \"kind\": brew\n    formula: rg\n  - 'kind': go\n  - \"quoted: text\"\n  - 'plain'\n---\n",
        );
        let json = serde_json::Value::Object(crate::types::frontmatter_to_json(fm));
        assert_eq!(
            json,
            serde_json::json!({
                "install": [
                    {"kind": "brew", "formula": "rg"},
                    {"kind": "go"},
                    "quoted: text",
                    "plain"
                ]
            })
        );
    }

    #[test]
    fn skips_unrecognized_lines() {
        let fm = parse_frontmatter(
            "---\n# comment\nname: demo\njust some words\n    stray: indented\n- orphan\nkey:value\ndescription: ok\n---\n",
        );
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
        assert_eq!(get_frontmatter_value(&fm, "description"), Some("ok"));
        assert!(!fm.contains_key("stray"));
        assert!(!fm.contains_key("key"));
        assert_eq!(fm.len(), 2);
    }

    #[test]
    fn later_duplicate_keys_overwrite() {
        let fm = parse_frontmatter("---\nname: first\nother: 1\nname: second\n---\n");
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("second"));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["name", "other"]);
    }

    #[test]
    fn valueless_key_without_block_is_absent() {
        let fm = parse_frontmatter("---\nempty:\nname: demo\n---\n");
        assert!(!fm.contains_key("empty"));
        assert_eq!(get_frontmatter_value(&fm, "name"), Some("demo"));
    }

    #[test]
    fn quoted_keys_and_json_values() {
        let fm = parse_frontmatter(
            "---\n\"allowed-tools\": [read]\nmetadata: {\"jovis\":{\"emoji\":\"⚡\"}}\n---\n",
        );
        assert_eq!(fm.get("allowed-tools"), Some(&FrontmatterValue::List(vec![s("read")])));
        assert_eq!(
            get_frontmatter_value(&fm, "metadata"),
            Some("{\"jovis\":{\"emoji\":\"⚡\"}}")
        );
    }

    #[test]
    fn split_returns_body_after_closing_delimiter() {
        let (header, body) = split_frontmatter("---\nname: demo\n---\n# Title\nText").unwrap();
        assert_eq!(header, "name: demo\n");
        assert_eq!(body, "# Title\nText");

        let (header, body) = split_frontmatter("---\n---").unwrap();
        assert_eq!(header, "");
        assert_eq!(body, "");
        assert!(split_frontmatter("# no header").is_none());
    }
}
