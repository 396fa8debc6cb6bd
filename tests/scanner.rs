#[cfg(test)]
mod scanner_tests {
    use rox::error::LoxError;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn two_character_operators_use_maximal_munch() {
        assert_token_sequence(
            "!= ! == = <= < >= > /",
            &[
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::BANG, "!"),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::EQUAL, "="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::LESS, "<"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::GREATER, ">"),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_token_sequence(
            "class fun var_x _under orchid or this super",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "var_x"),
                (TokenType::IDENTIFIER, "_under"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::OR, "or"),
                (TokenType::THIS, "this"),
                (TokenType::SUPER, "super"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn numbers_require_digits_on_both_sides_of_the_dot() {
        let (tokens, errors) = scan("12 3.5 7. .5");
        assert!(errors.is_empty());

        let kinds: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "NUMBER 12 12.0",
                "NUMBER 3.5 3.5",
                "NUMBER 7 7.0",
                "DOT . null",
                "DOT . null",
                "NUMBER 5 5.0",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn whole_numbers_beyond_i64_keep_their_fraction() {
        let (tokens, errors) = scan("10000000000000000000 12345678901234567890");
        assert!(errors.is_empty());

        assert_eq!(
            tokens[0].to_string(),
            "NUMBER 10000000000000000000 10000000000000000000.0"
        );
        assert_eq!(
            tokens[1].to_string(),
            "NUMBER 12345678901234567890 12345678901234567000.0"
        );
    }

    #[test]
    fn comments_are_discarded() {
        assert_token_sequence(
            "a // ignored ( ) \"\nb",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn multiline_string_reports_closing_line() {
        let (tokens, errors) = scan("\"one\ntwo\nthree\" x");
        assert!(errors.is_empty());

        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
        assert_eq!(tokens[0].lexeme, "\"one\ntwo\nthree\"");
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[1].line, 3);

        if let TokenType::STRING(ref s) = tokens[0].token_type {
            assert_eq!(s, "one\ntwo\nthree");
        } else {
            panic!("expected a string token");
        }
    }

    #[test]
    fn line_numbers_never_decrease() {
        let source = "var a = 1;\n// note\nprint \"x\ny\";\n\nfun f() {\n  return a;\n}\n";
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());

        for pair in tokens.windows(2) {
            assert!(pair[0].line <= pair[1].line);
        }
        assert_eq!(tokens.last().map(|t| t.line), Some(9));
    }

    #[test]
    fn unterminated_string_is_reported_and_eof_still_emitted() {
        let (tokens, errors) = scan("print \"oops");

        assert_eq!(errors, vec![LoxError::lex(1, "Unterminated string.")]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::PRINT);
        assert_eq!(tokens[1].token_type, TokenType::EOF);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source);

        let results: Vec<_> = scanner.collect();

        // 0: COMMA  1: DOT  2: Error '$'  3: LEFT_PAREN  4: Error '#'  5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            let rendered = err.to_string();
            assert!(
                rendered.starts_with("[line 1] Error: Unexpected character"),
                "got: {}",
                rendered
            );
        }

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn non_ascii_character_is_one_error() {
        let (tokens, errors) = scan("a é b");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error: Unexpected character: é"
        );
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn tokens_serialise_to_json() {
        let (tokens, _) = scan("x = 1;");
        let json = serde_json::to_value(&tokens).expect("tokens serialise");

        assert_eq!(json[0]["lexeme"], "x");
        assert_eq!(json[0]["token_type"], "IDENTIFIER");
        assert_eq!(json[2]["token_type"]["NUMBER"], 1.0);
    }
}
