#![no_main]

use libfuzzer_sys::fuzz_target;
use prow_core::parser::parse::Parser;
use prow_core::parser::print::ParseTreePrinter;
use prow_core::parser::token::{SourcePosition, Token, TokenKind};

/// Subset of the lexicon biased towards well-formed declarations so the
/// printer sees deep trees, not just failed parses.
const TABLE: &[(TokenKind, &str)] = &[
    (TokenKind::Identifier, "a"),
    (TokenKind::Identifier, "b"),
    (TokenKind::Identifier, "out"),
    (TokenKind::Keyword, "if"),
    (TokenKind::Keyword, "else"),
    (TokenKind::Keyword, "int"),
    (TokenKind::DecimalLiteral, "0"),
    (TokenKind::DecimalLiteral, "1"),
    (TokenKind::Colon, ":"),
    (TokenKind::Semicolon, ";"),
    (TokenKind::Comma, ","),
    (TokenKind::Assignment, "="),
    (TokenKind::LeftParen, "("),
    (TokenKind::RightParen, ")"),
    (TokenKind::LeftBracket, "["),
    (TokenKind::RightBracket, "]"),
    (TokenKind::LeftBrace, "{"),
    (TokenKind::RightBrace, "}"),
    (TokenKind::Plus, "+"),
    (TokenKind::Multiply, "*"),
    (TokenKind::EqualComparison, "=="),
    (TokenKind::LogicalAnd, "&&"),
    (TokenKind::Not, "!"),
    (TokenKind::Scope, "::"),
];

fn token_stream(data: &[u8]) -> Vec<Token> {
    data.iter()
        .enumerate()
        .map(|(i, byte)| {
            let (kind, text) = TABLE[*byte as usize % TABLE.len()];
            Token::new(kind, text, SourcePosition::new(1, i as u32 + 1))
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    // The grammar recurses once per nesting level, so bound the stream
    // length to keep deeply nested inputs within the thread stack.
    if data.len() > 512 {
        return;
    }

    // Whatever tree the parser produced — complete or partial — the
    // printing visitor must walk it without panicking, and two walks must
    // print the same text.
    let tokens = token_stream(data);
    let mut errors = Vec::new();
    let mut parser = Parser::new();
    let _ = parser.parse(&tokens, &mut errors);

    let mut first = ParseTreePrinter::new(String::new());
    parser.visit(&mut first);
    let mut second = ParseTreePrinter::new(String::new());
    parser.visit(&mut second);
    assert_eq!(
        first.into_inner(),
        second.into_inner(),
        "printing must be deterministic"
    );
});
