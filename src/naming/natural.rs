//! Natural ("human") ordering of file names.
//!
//! Names are split into maximal runs of ASCII digits and non-digits. Digit
//! runs compare by numeric value, other runs compare case-insensitively, and
//! a numeric run sorts before a text run at the same position. Names that
//! tie on every token (`a01` vs `a1`, `A.pdf` vs `a.pdf`) fall back to a
//! plain byte comparison, so distinct names never compare equal.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    /// Digit run with leading zeros stripped (arbitrary length)
    Number(&'a str),
    Text(String),
}

impl Ord for Token<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Token::Number(_), Token::Text(_)) => Ordering::Less,
            (Token::Text(_), Token::Number(_)) => Ordering::Greater,
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Token<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn tokenize(name: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (idx, ch) in name.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                tokens.push(make_token(&name[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }

    if let Some(digits) = in_digits {
        tokens.push(make_token(&name[start..], digits));
    }

    tokens
}

fn make_token(run: &str, digits: bool) -> Token<'_> {
    if digits {
        Token::Number(run.trim_start_matches('0'))
    } else {
        Token::Text(run.to_lowercase())
    }
}

/// Compare two names in natural order. Total and deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    tokenize(a).cmp(&tokenize(b)).then_with(|| a.cmp(b))
}

/// Sort items in place by the natural order of the name `name_of` yields.
pub fn natural_sort<T, F>(items: &mut [T], name_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(name_of(a), name_of(b)));
}
