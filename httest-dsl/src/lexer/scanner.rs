//! Lexer implementation

use super::token::*;
use std::iter::Peekable;
use std::str::CharIndices;

/// Lexer for the httest DSL.
///
/// Produces a finite token sequence terminated by [`TokenKind::Eof`]; every
/// token is stamped with the 1-based line and column of its first character.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '{' => {
                    self.advance();
                    TokenKind::LBrace
                }
                '}' => {
                    self.advance();
                    TokenKind::RBrace
                }
                '(' => {
                    self.advance();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance();
                    TokenKind::RParen
                }
                '=' => {
                    self.advance();
                    TokenKind::Eq
                }
                ';' => {
                    self.advance();
                    TokenKind::Semicolon
                }

                '.' => {
                    self.advance();
                    if self.peek_char() == Some('.') {
                        self.advance();
                        TokenKind::DotDot
                    } else {
                        TokenKind::Error("Unexpected character: .".to_string())
                    }
                }

                '$' => self.scan_variable(),

                '"' => self.scan_string(),

                c if c.is_ascii_digit() => self.scan_number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

                c => {
                    self.advance();
                    TokenKind::Error(format!("Unexpected character: {}", c))
                }
            },
        };

        Token {
            kind,
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
        }
    }

    /// Scan an identifier or keyword. Keywords are case-sensitive: the
    /// statement keywords are lowercase and the HTTP methods uppercase.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ident = &self.source[start..self.pos];

        match ident {
            "config" => TokenKind::Config,
            "base_url" => TokenKind::BaseUrl,
            "header" => TokenKind::Header,
            "let" => TokenKind::Let,
            "test" => TokenKind::Test,
            "expect" => TokenKind::Expect,
            "status" => TokenKind::Status,
            "body" => TokenKind::Body,
            "contains" => TokenKind::Contains,
            "in" => TokenKind::In,

            "GET" => TokenKind::Method(Method::Get),
            "POST" => TokenKind::Method(Method::Post),
            "PUT" => TokenKind::Method(Method::Put),
            "DELETE" => TokenKind::Method(Method::Delete),

            _ => TokenKind::Identifier(ident.to_string()),
        }
    }

    /// Scan a `$name` variable reference.
    fn scan_variable(&mut self) -> TokenKind {
        self.advance(); // consume '$'

        let start = self.pos;
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        self.advance();
                    } else {
                        break;
                    }
                }
                TokenKind::Variable(self.source[start..self.pos].to_string())
            }
            _ => TokenKind::Error("Expected identifier after '$'".to_string()),
        }
    }

    /// Scan a string literal with escape sequences.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => return TokenKind::Error("Unterminated string".to_string()),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => {
                            self.advance();
                            value.push('\n');
                        }
                        Some('t') => {
                            self.advance();
                            value.push('\t');
                        }
                        Some('\\') => {
                            self.advance();
                            value.push('\\');
                        }
                        Some('"') => {
                            self.advance();
                            value.push('"');
                        }
                        Some('r') => {
                            self.advance();
                            value.push('\r');
                        }
                        _ => value.push('\\'),
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        TokenKind::String(value)
    }

    /// Scan a numeric literal. Digits only; the range operator `..` that may
    /// follow a number is left for the next token.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        match text.parse::<u32>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Error(format!("Invalid number: {}", text)),
        }
    }

    /// Skip whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('/') => {
                    let next = self.peek_next_char();
                    if next == Some('/') {
                        // Line comment
                        while let Some(c) = self.peek_char() {
                            if c == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    } else if next == Some('*') {
                        // Block comment
                        self.advance(); // /
                        self.advance(); // *
                        loop {
                            match self.peek_char() {
                                None => break,
                                Some('*') if self.peek_next_char() == Some('/') => {
                                    self.advance();
                                    self.advance();
                                    break;
                                }
                                Some('\n') => {
                                    self.advance();
                                    self.line += 1;
                                    self.column = 1;
                                }
                                _ => {
                                    self.advance();
                                }
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].char_indices();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            self.column += 1;
            Some(c)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_keywords_and_methods() {
        assert_eq!(
            kinds("config base_url let test expect GET DELETE"),
            vec![
                TokenKind::Config,
                TokenKind::BaseUrl,
                TokenKind::Let,
                TokenKind::Test,
                TokenKind::Expect,
                TokenKind::Method(Method::Get),
                TokenKind::Method(Method::Delete),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn methods_are_case_sensitive() {
        assert_eq!(
            kinds("get"),
            vec![TokenKind::Identifier("get".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn tokenizes_status_range() {
        assert_eq!(
            kinds("status in 200..299"),
            vec![
                TokenKind::Status,
                TokenKind::In,
                TokenKind::Number(200),
                TokenKind::DotDot,
                TokenKind::Number(299),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a \"b\" \\ c""#),
            vec![
                TokenKind::String("a \"b\" \\ c".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unterminated_string_is_error_token() {
        let tokens = Lexer::new("test T { GET \"oops").tokenize();
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Error("Unterminated string".to_string())));
    }

    #[test]
    fn variable_reference_token() {
        assert_eq!(
            kinds("$id"),
            vec![TokenKind::Variable("id".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = Lexer::new("test T {\n  GET \"/x\";\n}").tokenize();
        let get = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Method(Method::Get))
            .unwrap();
        assert_eq!(get.span.line, 2);
        assert_eq!(get.span.column, 3);
        let url = tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::String(_)))
            .unwrap();
        assert_eq!(url.span.line, 2);
        assert_eq!(url.span.column, 7);
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            kinds("// nothing here\ntest"),
            vec![TokenKind::Test, TokenKind::Eof]
        );
    }
}
