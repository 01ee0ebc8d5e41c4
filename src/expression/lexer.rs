use super::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A plain SPDX-style id (license or exception).
    Ident,
    /// `LicenseRef-<idstring>`
    LicenseRef,
    /// `DocumentRef-<idstring>:LicenseRef-<idstring>`
    DocumentRef,
    Plus,
    And,
    Or,
    With,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the source text.
    pub offset: usize,
}

fn is_idstring_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

fn is_idstring(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_idstring_char)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn is_license_ref(s: &str) -> bool {
    strip_prefix_ignore_case(s, "LicenseRef-").is_some_and(is_idstring)
}

fn is_document_ref(s: &str) -> bool {
    let Some(rest) = strip_prefix_ignore_case(s, "DocumentRef-") else {
        return false;
    };
    match rest.split_once(':') {
        Some((document, license)) => is_idstring(document) && is_license_ref(license),
        None => false,
    }
}

/// Split an expression into tokens.
///
/// Words are runs of idstring characters plus `:`. Operators are matched
/// case-insensitively.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let single = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '+' => Some(TokenKind::Plus),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            tokens.push(Token {
                kind,
                text: &source[offset..offset + 1],
                offset,
            });
            continue;
        }

        if !(is_idstring_char(c) || c == ':') {
            return Err(ExpressionError::syntax(
                source,
                &source[offset..offset + c.len_utf8()],
                offset,
                "unexpected character",
            ));
        }

        let mut end = offset;
        while let Some(&(i, c)) = chars.peek() {
            if !(is_idstring_char(c) || c == ':') {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }

        let text = &source[offset..end];
        let kind = if text.eq_ignore_ascii_case("AND") {
            TokenKind::And
        } else if text.eq_ignore_ascii_case("OR") {
            TokenKind::Or
        } else if text.eq_ignore_ascii_case("WITH") {
            TokenKind::With
        } else if text.contains(':') {
            if !is_document_ref(text) {
                return Err(ExpressionError::syntax(
                    source,
                    text,
                    offset,
                    "expected 'DocumentRef-<id>:LicenseRef-<id>'",
                ));
            }
            TokenKind::DocumentRef
        } else if strip_prefix_ignore_case(text, "LicenseRef-").is_some() {
            if !is_license_ref(text) {
                return Err(ExpressionError::syntax(
                    source,
                    text,
                    offset,
                    "'LicenseRef-' must be followed by an id",
                ));
            }
            TokenKind::LicenseRef
        } else {
            TokenKind::Ident
        };

        tokens.push(Token { kind, text, offset });
    }

    Ok(tokens)
}
