//! Cpp2 parser infrastructure.
//!
//! - [`token`] — lexical token definitions, the contract with the upstream
//!   lexer that feeds [`parse::Parser`].
//! - [`ast`] — parse-tree node definitions and the visitor protocol.
//! - [`parse`] — the recursive-descent parser.
//! - [`print`] — the reference tree-printing visitor.

/// Parse-tree node definitions and the visitor protocol.
pub mod ast;
/// Recursive-descent parser for Cpp2 token streams.
pub mod parse;
/// Reference tree-printing visitor.
pub mod print;
/// Lexical token definitions.
pub mod token;

#[cfg(test)]
pub(crate) mod testing {
    //! Source-level scenario support for tests.
    //!
    //! Production parsing always starts from caller-provided tokens; this
    //! minimal tokenizer exists only so tests (and nothing else) can state
    //! their input as Cpp2 source text instead of hand-built token vectors.

    use crate::parser::token::{SourcePosition, Token, TokenKind};

    /// Reserved words the upstream lexer classifies as [`TokenKind::Keyword`].
    /// The parser-relevant ones are `if`, `else`, `constexpr`, `is`, and
    /// `as`; the rest are fundamental type names and common C++ keywords.
    const KEYWORDS: &[&str] = &[
        "if", "else", "constexpr", "is", "as", "auto", "bool", "char", "double", "float", "int",
        "long", "return", "short", "signed", "unsigned", "void",
    ];

    /// Multi-character operators, longest first so that prefix overlaps
    /// (`<<=` / `<<` / `<`) resolve by longest match.
    const OPERATORS: &[(&str, TokenKind)] = &[
        ("<<=", TokenKind::LeftShiftEq),
        (">>=", TokenKind::RightShiftEq),
        ("<=>", TokenKind::Spaceship),
        ("...", TokenKind::Ellipsis),
        ("..=", TokenKind::DotDotEqual),
        ("..<", TokenKind::DotDotLess),
        ("::", TokenKind::Scope),
        (":=", TokenKind::ColonEq),
        ("==", TokenKind::EqualComparison),
        ("!=", TokenKind::NotEqualComparison),
        ("<=", TokenKind::LessEq),
        (">=", TokenKind::GreaterEq),
        ("&&", TokenKind::LogicalAnd),
        ("||", TokenKind::LogicalOr),
        ("<<", TokenKind::LeftShift),
        (">>", TokenKind::RightShift),
        ("++", TokenKind::PlusPlus),
        ("--", TokenKind::MinusMinus),
        ("+=", TokenKind::PlusEq),
        ("-=", TokenKind::MinusEq),
        ("*=", TokenKind::MultiplyEq),
        ("/=", TokenKind::SlashEq),
        ("%=", TokenKind::ModuloEq),
        ("&=", TokenKind::AmpersandEq),
        ("^=", TokenKind::CaretEq),
        ("|=", TokenKind::PipeEq),
        ("{", TokenKind::LeftBrace),
        ("}", TokenKind::RightBrace),
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        ("[", TokenKind::LeftBracket),
        ("]", TokenKind::RightBracket),
        (";", TokenKind::Semicolon),
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        (".", TokenKind::Dot),
        ("=", TokenKind::Assignment),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Multiply),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Modulo),
        ("!", TokenKind::Not),
        ("&", TokenKind::Ampersand),
        ("^", TokenKind::Caret),
        ("~", TokenKind::Tilde),
        ("$", TokenKind::Dollar),
        ("|", TokenKind::Pipe),
        ("<", TokenKind::Less),
        (">", TokenKind::Greater),
        ("?", TokenKind::QuestionMark),
        ("@", TokenKind::At),
    ];

    /// Tokenize `src` the way the upstream lexer would.
    ///
    /// Panics on input outside the table above — tests only feed it
    /// well-formed scenarios.
    pub fn lex(src: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut rest = src;
        let mut line: u32 = 1;
        let mut column: u32 = 1;

        'outer: while let Some(c) = rest.chars().next() {
            // Whitespace and newlines only move the position.
            if c == '\n' {
                line += 1;
                column = 1;
                rest = &rest[1..];
                continue;
            }
            if c.is_whitespace() {
                column += 1;
                rest = &rest[c.len_utf8()..];
                continue;
            }

            let pos = SourcePosition::new(line, column);

            // Identifiers and keywords.
            if c.is_ascii_alphabetic() || c == '_' {
                let len = rest
                    .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
                    .unwrap_or(rest.len());
                let text = &rest[..len];
                let kind = if KEYWORDS.contains(&text) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                tokens.push(Token::new(kind, text, pos));
                column += len as u32;
                rest = &rest[len..];
                continue;
            }

            // Numeric literals: 0b…, 0x…, decimal, and decimal floats.
            if c.is_ascii_digit() {
                let (kind, len) = if rest.starts_with("0b") || rest.starts_with("0B") {
                    let digits = rest[2..]
                        .find(|ch: char| !ch.is_digit(2))
                        .unwrap_or(rest.len() - 2);
                    (TokenKind::BinaryLiteral, 2 + digits)
                } else if rest.starts_with("0x") || rest.starts_with("0X") {
                    let digits = rest[2..]
                        .find(|ch: char| !ch.is_ascii_hexdigit())
                        .unwrap_or(rest.len() - 2);
                    (TokenKind::HexadecimalLiteral, 2 + digits)
                } else {
                    let int_len = rest
                        .find(|ch: char| !ch.is_ascii_digit())
                        .unwrap_or(rest.len());
                    let after = &rest[int_len..];
                    let frac = after
                        .strip_prefix('.')
                        .filter(|a| a.starts_with(|ch: char| ch.is_ascii_digit()));
                    match frac {
                        Some(a) => {
                            let frac_len =
                                a.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(a.len());
                            (TokenKind::FloatLiteral, int_len + 1 + frac_len)
                        }
                        None => (TokenKind::DecimalLiteral, int_len),
                    }
                };
                tokens.push(Token::new(kind, &rest[..len], pos));
                column += len as u32;
                rest = &rest[len..];
                continue;
            }

            // String and character literals; no escape handling.
            if c == '"' || c == '\'' {
                let close = rest[1..]
                    .find(c)
                    .map(|i| i + 2)
                    .unwrap_or_else(|| panic!("unterminated literal at {pos}"));
                let kind = if c == '"' {
                    TokenKind::StringLiteral
                } else {
                    TokenKind::CharacterLiteral
                };
                tokens.push(Token::new(kind, &rest[..close], pos));
                column += close as u32;
                rest = &rest[close..];
                continue;
            }

            // Operators and punctuation, longest match first.
            for (text, kind) in OPERATORS {
                if let Some(after) = rest.strip_prefix(text) {
                    tokens.push(Token::new(*kind, *text, pos));
                    column += text.len() as u32;
                    rest = after;
                    continue 'outer;
                }
            }

            panic!("test lexer cannot tokenize {c:?} at {pos}");
        }
        tokens
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_lex_positions_and_kinds() {
            let tokens = lex("x : int = 0;");
            let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
            assert_eq!(
                kinds,
                [
                    TokenKind::Identifier,
                    TokenKind::Colon,
                    TokenKind::Keyword,
                    TokenKind::Assignment,
                    TokenKind::DecimalLiteral,
                    TokenKind::Semicolon,
                ]
            );
            assert_eq!(tokens[0].pos, SourcePosition::new(1, 1));
            assert_eq!(tokens[2].pos, SourcePosition::new(1, 5));
            assert_eq!(tokens[5].pos, SourcePosition::new(1, 12));
        }

        #[test]
        fn test_lex_longest_match() {
            let tokens = lex("a <<= b << c < d :: e := f");
            let kinds: Vec<TokenKind> = tokens
                .iter()
                .filter(|t| t.kind != TokenKind::Identifier)
                .map(|t| t.kind)
                .collect();
            assert_eq!(
                kinds,
                [
                    TokenKind::LeftShiftEq,
                    TokenKind::LeftShift,
                    TokenKind::Less,
                    TokenKind::Scope,
                    TokenKind::ColonEq,
                ]
            );
        }

        #[test]
        fn test_lex_tracks_lines() {
            let tokens = lex("a\n  b");
            assert_eq!(tokens[0].pos, SourcePosition::new(1, 1));
            assert_eq!(tokens[1].pos, SourcePosition::new(2, 3));
        }

        #[test]
        fn test_lex_literal_kinds() {
            let tokens = lex(r#"42 3.14 0b101 0x2a "hi" 'c'"#);
            let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
            assert_eq!(
                kinds,
                [
                    TokenKind::DecimalLiteral,
                    TokenKind::FloatLiteral,
                    TokenKind::BinaryLiteral,
                    TokenKind::HexadecimalLiteral,
                    TokenKind::StringLiteral,
                    TokenKind::CharacterLiteral,
                ]
            );
        }
    }
}
