//! Line tokenizers for the two CSV ingestion paths.

/// Tokenizer state: inside or outside a double-quoted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    Unquoted,
    Quoted,
}

/// What to do with the current character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the character.
    Skip,
    /// Append the character to the current field.
    Push,
    /// Close the current field and start a new one.
    EndField,
}

/// The single transition table of the quote-aware splitter.
pub fn step(state: QuoteState, ch: char) -> (QuoteState, Action) {
    match (state, ch) {
        (QuoteState::Unquoted, '"') => (QuoteState::Quoted, Action::Skip),
        (QuoteState::Quoted, '"') => (QuoteState::Unquoted, Action::Skip),
        (QuoteState::Unquoted, ',') => (QuoteState::Unquoted, Action::EndField),
        (state, _) => (state, Action::Push),
    }
}

/// Split a line on commas that are not inside double quotes.
///
/// Quote characters are consumed, so `""` contributes nothing. Every field is
/// trimmed and the last field is always emitted, so a trailing comma yields an
/// empty final field.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = QuoteState::Unquoted;

    for ch in line.chars() {
        let (next, action) = step(state, ch);
        match action {
            Action::Skip => {}
            Action::Push => current.push(ch),
            Action::EndField => {
                fields.push(current.trim().to_string());
                current.clear();
            }
        }
        state = next;
    }
    fields.push(current.trim().to_string());
    fields
}

/// Pull field tokens out of a line for the header-less path.
///
/// At each position a double-quoted run is tried first: it ends at the nearest
/// closing quote that is followed by optional whitespace and then a comma or
/// the end of the line. Failing that, the run of non-comma characters is
/// taken. Commas between tokens are skipped, so empty fields produce no token.
pub fn match_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b',' {
            pos += 1;
            continue;
        }
        let end = quoted_run_end(line, pos).unwrap_or_else(|| {
            line[pos..]
                .find(',')
                .map_or(line.len(), |offset| pos + offset)
        });
        fields.push(&line[pos..end]);
        pos = end;
    }
    fields
}

/// End (exclusive) of a quoted run starting at `start`, if one closes cleanly.
fn quoted_run_end(line: &str, start: usize) -> Option<usize> {
    if !line[start..].starts_with('"') {
        return None;
    }
    line[start + 1..]
        .match_indices('"')
        .map(|(offset, _)| start + 1 + offset + 1)
        .find(|&end| {
            let rest = line[end..].trim_start();
            rest.is_empty() || rest.starts_with(',')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_table() {
        use Action::*;
        use QuoteState::*;
        assert_eq!(step(Unquoted, '"'), (Quoted, Skip));
        assert_eq!(step(Quoted, '"'), (Unquoted, Skip));
        assert_eq!(step(Unquoted, ','), (Unquoted, EndField));
        assert_eq!(step(Quoted, ','), (Quoted, Push));
        assert_eq!(step(Unquoted, 'a'), (Unquoted, Push));
        assert_eq!(step(Quoted, 'a'), (Quoted, Push));
    }

    #[test]
    fn test_split_keeps_quoted_commas() {
        assert_eq!(
            split_fields(r#"John Doe,john@example.com,john123,"admin,user""#),
            vec!["John Doe", "john@example.com", "john123", "admin,user"]
        );
    }

    #[test]
    fn test_split_trims_fields() {
        assert_eq!(split_fields(" a , b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_trailing_comma_yields_empty_field() {
        assert_eq!(split_fields("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_split_escaped_quotes_vanish() {
        assert_eq!(split_fields(r#""say ""hi""",x"#), vec!["say hi", "x"]);
    }

    #[test]
    fn test_split_unterminated_quote_swallows_rest() {
        assert_eq!(split_fields(r#"a,"b,c"#), vec!["a", "b,c"]);
    }

    #[test]
    fn test_match_plain_and_quoted() {
        assert_eq!(
            match_fields(r#"John Doe,john@example.com,john123,"admin,user""#),
            vec!["John Doe", "john@example.com", "john123", r#""admin,user""#]
        );
    }

    #[test]
    fn test_match_skips_empty_fields() {
        assert_eq!(match_fields("a,,b,c,"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_match_keeps_leading_space() {
        assert_eq!(match_fields("a, b"), vec!["a", " b"]);
    }

    #[test]
    fn test_match_quote_needs_clean_close() {
        // The closing quote is followed by text, so the run falls back to
        // plain characters.
        assert_eq!(match_fields(r#""a"b,c"#), vec![r#""a"b"#, "c"]);
        // Unterminated quote.
        assert_eq!(match_fields(r#""admin,user"#), vec![r#""admin"#, "user"]);
        // Whitespace before the comma still closes the run.
        assert_eq!(match_fields(r#""x, y"  ,z"#), vec![r#""x, y""#, "  ", "z"]);
    }

    #[test]
    fn test_match_non_greedy_quote() {
        assert_eq!(
            match_fields(r#""a","b,c""#),
            vec![r#""a""#, r#""b,c""#]
        );
    }
}
