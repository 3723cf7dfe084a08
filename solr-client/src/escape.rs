/// Escapes all characters that are part of the Solr query syntax so a
/// value can be embedded verbatim in a query or filter query.
///
/// Mirrors SolrJ's `ClientUtils.escapeQueryChars`.
pub fn escape_query_chars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '+'
                | '-'
                | '!'
                | '('
                | ')'
                | ':'
                | '^'
                | '['
                | ']'
                | '"'
                | '{'
                | '}'
                | '~'
                | '*'
                | '?'
                | '|'
                | '&'
                | ';'
                | '/'
        ) || c.is_whitespace()
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_query_syntax_chars() {
        assert_eq!(escape_query_chars("a:b"), "a\\:b");
        assert_eq!(escape_query_chars("1+1"), "1\\+1");
        assert_eq!(escape_query_chars("x^2"), "x\\^2");
        assert_eq!(escape_query_chars("{!frange}"), "\\{\\!frange\\}");
        assert_eq!(escape_query_chars("a/b;c"), "a\\/b\\;c");
    }

    #[test]
    fn escapes_whitespace_and_backslash() {
        assert_eq!(escape_query_chars("a b"), "a\\ b");
        assert_eq!(escape_query_chars("a\\b"), "a\\\\b");
    }

    #[test]
    fn leaves_plain_values_untouched() {
        assert_eq!(escape_query_chars("example.pt"), "example.pt");
        assert_eq!(escape_query_chars("imgTitle"), "imgTitle");
    }

    #[test]
    fn escapes_wildcard() {
        // Callers that want wildcard matching must undo this one.
        assert_eq!(escape_query_chars("*.example.pt"), "\\*.example.pt");
    }
}
