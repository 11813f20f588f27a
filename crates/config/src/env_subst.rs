/// Replace `${ENV_VAR}` and `${ENV_VAR:-fallback}` placeholders in raw config text.
///
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace placeholders using a custom lookup function.
///
/// This is the implementation used by [`substitute_env`]; the separate
/// signature makes it testable without mutating the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }

        chars.next(); // consume '{'
        let mut placeholder = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            placeholder.push(c);
        }

        if !closed || placeholder.is_empty() {
            // Malformed, emit literal.
            result.push_str("${");
            result.push_str(&placeholder);
            continue;
        }

        let (name, fallback) = match placeholder.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (placeholder.as_str(), None),
        };

        let value = match fallback {
            Some(fallback) => Some(
                lookup(name)
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| fallback.to_owned()),
            ),
            None => lookup(name),
        };
        match value {
            Some(val) => result.push_str(&val),
            None => {
                result.push_str("${");
                result.push_str(&placeholder);
                result.push('}');
            },
        }
    }

    result
}
