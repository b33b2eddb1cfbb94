/// One token of a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    /// A bare whitespace-delimited word
    Word(String),
    /// A segment enclosed in `"` or `'`, quotes removed
    Quoted(String),
}

/// Split a query into tokens the way a shell would, keeping quoted segments
/// (including their whitespace) together.
///
/// A quote only opens a segment at the start of a token; inside a word it is
/// an ordinary character. A closing quote ends the token. An unterminated
/// quote runs to the end of the input.
pub fn split_query(input: &str) -> Vec<QueryToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => {
                tokens.push(QueryToken::Quoted(std::mem::take(&mut current)));
                quote = None;
            }
            Some(_) => current.push(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(QueryToken::Word(std::mem::take(&mut current)));
                }
            }
            None if (c == '"' || c == '\'') && current.is_empty() => quote = Some(c),
            None => current.push(c),
        }
    }

    match quote {
        Some(_) => tokens.push(QueryToken::Quoted(current)),
        None if !current.is_empty() => tokens.push(QueryToken::Word(current)),
        None => {}
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use QueryToken::{Quoted, Word};

    fn w(s: &str) -> QueryToken {
        Word(s.to_string())
    }

    fn q(s: &str) -> QueryToken {
        Quoted(s.to_string())
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(split_query("  buy  milk\tnow "), vec![w("buy"), w("milk"), w("now")]);
    }

    #[test]
    fn test_keeps_quoted_segments() {
        assert_eq!(
            split_query(r#"fix "the roof" 'and  door'"#),
            vec![w("fix"), q("the roof"), q("and  door")]
        );
    }

    #[test]
    fn test_quote_inside_word_is_literal() {
        assert_eq!(split_query(r#"it"s fine"#), vec![w(r#"it"s"#), w("fine")]);
    }

    #[test]
    fn test_closing_quote_ends_token() {
        assert_eq!(split_query(r#""ab"cd"#), vec![q("ab"), w("cd")]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(split_query(r#"a "b c"#), vec![w("a"), q("b c")]);
    }

    #[test]
    fn test_keyword_tokens_stay_whole() {
        assert_eq!(split_query("e:garden l:home"), vec![w("e:garden"), w("l:home")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_query("").is_empty());
        assert!(split_query("   ").is_empty());
    }

    #[test]
    fn test_empty_quotes_give_empty_phrase() {
        assert_eq!(split_query(r#""""#), vec![q("")]);
    }
}
