//! A small SQL tokenizer for the lexical fallback scan and for normalizing
//! identifiers.
//!
//! It only distinguishes what table extraction needs: words, quoted
//! identifiers, literals and punctuation. Comments must already be stripped.

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted word: keyword or identifier, original case kept.
    Word(String),
    /// Double-quoted or backtick-quoted identifier, quotes removed.
    Quoted(String),
    /// Single-quoted string literal.
    Literal,
    /// Numeric literal.
    Number,
    Dot,
    Comma,
    LParen,
    RParen,
    Semicolon,
    /// Any other operator or symbol.
    Other,
}

impl Token {
    /// Upper-cased keyword text for unquoted words.
    pub fn keyword(&self) -> Option<String> {
        match self {
            Token::Word(w) => Some(w.to_ascii_uppercase()),
            _ => None,
        }
    }

    /// Identifier text for words and quoted identifiers.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Word(w) | Token::Quoted(w) => Some(w),
            _ => None,
        }
    }

    /// True for an unquoted word equal to `kw`, ignoring case.
    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(kw))
    }
}

/// Split SQL text into tokens.
pub fn tokenize(sql: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '\'' => {
                chars.next();
                read_quoted(&mut chars, '\'');
                tokens.push(Token::Literal);
            }
            '"' | '`' => {
                chars.next();
                tokens.push(Token::Quoted(read_quoted(&mut chars, ch)));
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            c if c.is_ascii_digit() => {
                while chars
                    .next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                    .is_some()
                {}
                tokens.push(Token::Number);
            }
            c if is_word_start(c) => {
                let mut end = start;
                while let Some((idx, c)) = chars.next_if(|&(_, c)| is_word_part(c)) {
                    end = idx + c.len_utf8();
                }
                tokens.push(Token::Word(sql[start..end].to_string()));
            }
            _ => {
                chars.next();
                tokens.push(Token::Other);
            }
        }
    }

    tokens
}

/// Normalize a possibly quoted, possibly schema-qualified name.
///
/// Quotes are stripped from each part and the parts are re-joined with `.`:
/// `"db".` + "`events`" becomes `db.events`. Text that is not a dotted
/// identifier chain is returned trimmed but otherwise untouched.
pub fn normalize_qualified_name(raw: &str) -> String {
    let tokens = tokenize(raw);
    let mut parts = Vec::new();
    let mut expect_part = true;

    for token in &tokens {
        match (token, expect_part) {
            (Token::Word(_) | Token::Quoted(_), true) => {
                parts.push(token.ident().unwrap_or_default().to_string());
                expect_part = false;
            }
            (Token::Dot, false) => expect_part = true,
            _ => return raw.trim().to_string(),
        }
    }

    if parts.is_empty() || expect_part {
        return raw.trim().to_string();
    }
    parts.join(".")
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Read up to the closing `quote`, unescaping doubled quotes.
fn read_quoted(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, quote: char) -> String {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        if c == quote {
            if chars.next_if(|&(_, next)| next == quote).is_some() {
                value.push(quote);
                continue;
            }
            break;
        }
        value.push(c);
    }
    value
}
