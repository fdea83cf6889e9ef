//! Keyword expression expansion.
//!
//! A term prefixed with `+` is required and appears in every generated
//! search; each unprefixed term becomes its own narrower search combined with
//! the required terms. `"+queen live bootleg"` therefore searches
//! `"queen live"` and `"queen bootleg"` separately.

/// Expand `expression` into the term-groups to search for, in order.
///
/// An expression without required terms is searched verbatim as one group.
pub fn parse_expression(expression: &str) -> Vec<String> {
    let mut required = Vec::new();
    let mut optional = Vec::new();

    for token in expression.split_whitespace() {
        match token.strip_prefix('+') {
            Some("") => {}
            Some(term) => required.push(term),
            None => optional.push(token),
        }
    }

    if required.is_empty() {
        return vec![expression.to_string()];
    }

    let base = required.join(" ");
    if optional.is_empty() {
        return vec![base];
    }

    optional.into_iter().map(|term| format!("{base} {term}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_expression_is_one_group() {
        assert_eq!(parse_expression("alpha beta"), vec!["alpha beta"]);
    }

    #[test]
    fn test_required_with_one_optional() {
        assert_eq!(parse_expression("+alpha beta"), vec!["alpha beta"]);
    }

    #[test]
    fn test_required_only() {
        assert_eq!(parse_expression("+alpha +beta"), vec!["alpha beta"]);
        assert_eq!(parse_expression("  +alpha   +beta  "), vec!["alpha beta"]);
    }

    #[test]
    fn test_required_with_many_optional() {
        assert_eq!(parse_expression("+alpha +beta gamma delta"), vec!["alpha beta gamma", "alpha beta delta"]);
    }

    #[test]
    fn test_required_position_does_not_matter() {
        assert_eq!(parse_expression("live +queen bootleg"), vec!["queen live", "queen bootleg"]);
    }

    #[test]
    fn test_bare_plus_is_ignored() {
        assert_eq!(parse_expression("+ +queen live"), vec!["queen live"]);
        assert_eq!(parse_expression("+ live"), vec!["+ live"]);
    }

    #[test]
    fn test_whitespace_runs_collapse_between_terms() {
        assert_eq!(parse_expression("+queen\tlive   bootleg"), vec!["queen live", "queen bootleg"]);
    }
}
