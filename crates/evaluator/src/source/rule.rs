//! Composite alarm rule parsing.

const STATE_FUNCTIONS: [&str; 3] = ["ALARM", "OK", "INSUFFICIENT_DATA"];

/// Alarm names referenced by a composite alarm rule.
///
/// Handles `ALARM(name)`, `OK("name")`, `INSUFFICIENT_DATA('name')` and
/// ARN references, which are reduced to the alarm name. Boolean operators,
/// parentheses and `TRUE`/`FALSE` literals are ignored.
pub fn rule_references(rule: &str) -> Vec<String> {
    let mut references = Vec::new();
    let mut rest = rule;

    while let Some(open) = rest.find('(') {
        let function = trailing_identifier(&rest[..open]);
        let after = &rest[open + 1..];

        if !STATE_FUNCTIONS.contains(&function) {
            rest = after;
            continue;
        }

        let (argument, remaining) = read_argument(after);
        if let Some(name) = argument.map(alarm_name) {
            if !name.is_empty() {
                references.push(name.to_string());
            }
        }
        rest = remaining;
    }

    references
}

fn trailing_identifier(text: &str) -> &str {
    let text = text.trim_end();
    let start = text
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|i| i + 1)
        .unwrap_or(0);
    &text[start..]
}

/// Read one function argument, quoted or bare, up to the closing parenthesis.
fn read_argument(text: &str) -> (Option<&str>, &str) {
    let text = text.trim_start();
    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &text[1..];
            match body.find(quote) {
                Some(end) => {
                    let remaining = &body[end + 1..];
                    let remaining = remaining
                        .find(')')
                        .map(|i| &remaining[i + 1..])
                        .unwrap_or(remaining);
                    (Some(&body[..end]), remaining)
                }
                None => (None, ""),
            }
        }
        Some(_) => match text.find(')') {
            Some(end) => (Some(text[..end].trim()), &text[end + 1..]),
            None => (None, ""),
        },
        None => (None, ""),
    }
}

fn alarm_name(reference: &str) -> &str {
    match reference.find(":alarm:") {
        Some(i) if reference.starts_with("arn:") => &reference[i + ":alarm:".len()..],
        _ => reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_and_bare_references() {
        let rule = r#"ALARM("api-errors") AND (OK(db-cpu) OR INSUFFICIENT_DATA('queue depth'))"#;
        assert_eq!(rule_references(rule), vec!["api-errors", "db-cpu", "queue depth"]);
    }

    #[test]
    fn test_arn_reference() {
        let rule = "ALARM(arn:aws:cloudwatch:us-east-1:123456789012:alarm:svc/errors)";
        assert_eq!(rule_references(rule), vec!["svc/errors"]);
    }

    #[test]
    fn test_quoted_name_with_parentheses() {
        let rule = r#"NOT ALARM("disk (root)") AND TRUE"#;
        assert_eq!(rule_references(rule), vec!["disk (root)"]);
    }

    #[test]
    fn test_ignores_other_functions_and_malformed() {
        assert!(rule_references("TRUE").is_empty());
        assert!(rule_references("AT_LEAST(2, ALARM, (x))").is_empty());
        assert!(rule_references(r#"ALARM("unterminated"#).is_empty());
        assert!(rule_references("NOTALARM(x)").is_empty());
    }
}
