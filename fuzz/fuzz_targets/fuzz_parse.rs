#![no_main]

use libfuzzer_sys::fuzz_target;
use prow_core::parser::parse::Parser;
use prow_core::parser::token::{SourcePosition, Token, TokenKind};

/// One candidate token per table entry; each input byte picks one.
const TABLE: &[(TokenKind, &str)] = &[
    (TokenKind::Identifier, "a"),
    (TokenKind::Identifier, "b"),
    (TokenKind::Identifier, "out"),
    (TokenKind::Identifier, "inout"),
    (TokenKind::Identifier, "implicit"),
    (TokenKind::Keyword, "if"),
    (TokenKind::Keyword, "else"),
    (TokenKind::Keyword, "constexpr"),
    (TokenKind::Keyword, "is"),
    (TokenKind::Keyword, "as"),
    (TokenKind::Keyword, "int"),
    (TokenKind::DecimalLiteral, "0"),
    (TokenKind::FloatLiteral, "1.5"),
    (TokenKind::StringLiteral, "\"s\""),
    (TokenKind::CharacterLiteral, "'c'"),
    (TokenKind::BinaryLiteral, "0b1"),
    (TokenKind::HexadecimalLiteral, "0x1f"),
    (TokenKind::LeftParen, "("),
    (TokenKind::RightParen, ")"),
    (TokenKind::LeftBracket, "["),
    (TokenKind::RightBracket, "]"),
    (TokenKind::LeftBrace, "{"),
    (TokenKind::RightBrace, "}"),
    (TokenKind::Semicolon, ";"),
    (TokenKind::Comma, ","),
    (TokenKind::Colon, ":"),
    (TokenKind::ColonEq, ":="),
    (TokenKind::Scope, "::"),
    (TokenKind::Dot, "."),
    (TokenKind::Assignment, "="),
    (TokenKind::PlusEq, "+="),
    (TokenKind::LeftShiftEq, "<<="),
    (TokenKind::Plus, "+"),
    (TokenKind::Minus, "-"),
    (TokenKind::Multiply, "*"),
    (TokenKind::Slash, "/"),
    (TokenKind::Modulo, "%"),
    (TokenKind::Not, "!"),
    (TokenKind::PlusPlus, "++"),
    (TokenKind::MinusMinus, "--"),
    (TokenKind::Caret, "^"),
    (TokenKind::Ampersand, "&"),
    (TokenKind::Tilde, "~"),
    (TokenKind::Dollar, "$"),
    (TokenKind::LogicalAnd, "&&"),
    (TokenKind::LogicalOr, "||"),
    (TokenKind::EqualComparison, "=="),
    (TokenKind::NotEqualComparison, "!="),
    (TokenKind::Less, "<"),
    (TokenKind::GreaterEq, ">="),
    (TokenKind::Spaceship, "<=>"),
    (TokenKind::LeftShift, "<<"),
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

    // Arbitrary token streams must never panic the parser, and the success
    // flag must agree with the diagnostic list.
    let tokens = token_stream(data);
    let mut errors = Vec::new();
    let mut parser = Parser::new();
    let ok = parser.parse(&tokens, &mut errors);

    if ok {
        assert!(errors.is_empty(), "successful parse appended diagnostics");
    }
    // Declarations are only ever produced from real tokens, so an empty
    // input yields an empty unit.
    if tokens.is_empty() {
        assert!(ok, "empty input must parse");
        assert!(parser.parse_tree().declarations.is_empty());
    }
});
