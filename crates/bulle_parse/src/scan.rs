//! Line tokenizer and ordered tag dispatch shared by the parsers.

use regex::{Captures, Regex};

/// Strip surrounding whitespace and markdown decoration from one line.
///
/// Emphasis markers (`**`, `__`) are removed anywhere and heading marks (`#`)
/// at the start, so `## **PAGE 1**` and `__CASE 2__` read as `PAGE 1` and
/// `CASE 2`.
///
/// # Examples
///
/// ```
/// use bulle_parse::normalize_line;
///
/// assert_eq!(normalize_line("  ## **CASE 2** : Un quai  "), "CASE 2 : Un quai");
/// assert_eq!(normalize_line("   "), "");
/// ```
pub fn normalize_line(line: &str) -> String {
    let plain = line.replace("**", "").replace("__", "");
    plain
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

/// Normalized, non-empty lines of `text`.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(normalize_line).filter(|line| !line.is_empty())
}

/// Horizontal rules and code fences carry no content.
pub(crate) fn is_separator(line: &str) -> bool {
    line.starts_with("---") || line.starts_with("===") || line.starts_with("```")
}

/// Captured decimal number, `None` when absent or out of range.
pub(crate) fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// Captured text, trimmed, empty when the group did not participate.
pub(crate) fn text<'t>(caps: &Captures<'t>, group: usize) -> &'t str {
    caps.get(group).map_or("", |m| m.as_str().trim())
}

/// Handler invoked with the scan state and the captures of a matching line.
pub(crate) type TagHandler<S> = fn(&mut S, &Captures<'_>);

struct TagRule<S> {
    name: &'static str,
    pattern: Regex,
    handle: TagHandler<S>,
}

/// Ordered list of (pattern, handler) pairs.
///
/// Rules are tried in declaration order and the first match wins, so longer
/// synonyms must be declared before their prefixes.
pub(crate) struct TagTable<S> {
    rules: Vec<TagRule<S>>,
}

impl<S> TagTable<S> {
    pub(crate) fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Patterns are compiled once, when the table is built.
    pub(crate) fn rule(mut self, name: &'static str, pattern: &str, handle: TagHandler<S>) -> Self {
        let pattern = Regex::new(pattern).expect("valid tag pattern");
        self.rules.push(TagRule {
            name,
            pattern,
            handle,
        });
        self
    }

    /// Whether the rule called `name` matches `line`, without running it.
    pub(crate) fn matches(&self, name: &str, line: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.name == name && rule.pattern.is_match(line))
    }

    /// Run the first rule matching `line`, returning its name.
    pub(crate) fn dispatch(&self, state: &mut S, line: &str) -> Option<&'static str> {
        self.rules.iter().find_map(|rule| {
            let caps = rule.pattern.captures(line)?;
            (rule.handle)(state, &caps);
            Some(rule.name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Seen(Vec<String>);

    fn record(seen: &mut Seen, caps: &Captures<'_>) {
        seen.0.push(text(caps, 1).to_string());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = TagTable::new()
            .rule("long", r"(?i)^TYPE DE PLAN\s*:\s*(.*)", record)
            .rule("short", r"(?i)^PLAN\s*:\s*(.*)", record);
        let mut seen = Seen::default();
        assert_eq!(table.dispatch(&mut seen, "type de plan: large"), Some("long"));
        assert_eq!(table.dispatch(&mut seen, "PLAN : serré"), Some("short"));
        assert_eq!(table.dispatch(&mut seen, "Un chat dort."), None);
        assert_eq!(seen.0, vec!["large", "serré"]);
    }

    #[test]
    fn test_matches_by_rule_name() {
        let table = TagTable::new().rule("short", r"(?i)^PLAN\s*:\s*(.*)", record);
        assert!(table.matches("short", "plan: large"));
        assert!(!table.matches("long", "plan: large"));
        assert!(!table.matches("short", "Un chat dort."));
    }

    #[test]
    fn test_lines_skip_blank_and_strip_markdown() {
        let collected: Vec<String> = lines("\n# TITRE\n\n  **PAGE 1**\n__CASE 2__ : Un quai\n").collect();
        assert_eq!(collected, vec!["TITRE", "PAGE 1", "CASE 2 : Un quai"]);
    }

    #[test]
    fn test_number_rejects_overflow() {
        let re = Regex::new(r"(\d+)").unwrap();
        let caps = re.captures("99999999999").unwrap();
        assert_eq!(number(&caps, 1), None);
    }
}
