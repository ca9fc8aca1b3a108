// ABOUTME: Lexer turning Veureka source text into a token stream

use crate::token::{keyword_kind, Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> u8 {
        self.source.get(self.pos).copied().unwrap_or(0)
    }

    fn peek(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) {
        if self.current() == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), b' ' | b'\t' | b'\r') {
            self.advance();
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }

            let c = self.current();
            let line = self.line;
            let col = self.column;

            if c == b'#' {
                while !self.is_at_end() && self.current() != b'\n' {
                    self.advance();
                }
                continue;
            }

            if c == b'\n' {
                tokens.push(Token::new(TokenKind::Newline, "\n", line, col));
                self.advance();
                continue;
            }

            if c.is_ascii_digit() {
                tokens.push(self.lex_number(line, col));
                continue;
            }

            if c == b'"' || c == b'\'' {
                tokens.push(self.lex_string(c, line, col));
                continue;
            }

            if c.is_ascii_alphabetic() || c == b'_' {
                tokens.push(self.lex_identifier(line, col));
                continue;
            }

            if c == b'!' && self.peek(1) != b'=' {
                // a lone '!' carries no operator meaning in Veureka; silently consumed
                self.advance();
                continue;
            }

            if let Some(tok) = self.lex_operator(c, line, col) {
                tokens.push(tok);
                continue;
            }

            if let Some(kind) = single_char_delimiter(c) {
                let lexeme = (c as char).to_string();
                tokens.push(Token::new(kind, lexeme, line, col));
                self.advance();
                continue;
            }

            eprintln!("!! Unexpected character '{}' at {}:{}", c as char, line, col);
            self.advance();
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        tokens
    }

    fn lex_number(&mut self, line: usize, col: usize) -> Token {
        let start = self.pos;
        let mut has_dot = false;
        while !self.is_at_end() && (self.current().is_ascii_digit() || (self.current() == b'.' && !has_dot)) {
            if self.current() == b'.' {
                has_dot = true;
            }
            self.advance();
        }
        let lexeme = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        let value: f64 = lexeme.parse().unwrap_or(0.0);
        Token::number(value, lexeme, line, col)
    }

    fn lex_string(&mut self, quote: u8, line: usize, col: usize) -> Token {
        self.advance();
        let mut buf = String::new();
        while !self.is_at_end() && self.current() != quote {
            if self.current() == b'\\' {
                self.advance();
                match self.current() {
                    b'n' => buf.push('\n'),
                    b't' => buf.push('\t'),
                    b'\\' => buf.push('\\'),
                    other => buf.push(other as char),
                }
                self.advance();
            } else {
                buf.push(self.current() as char);
                self.advance();
            }
        }
        self.advance();
        Token::new(TokenKind::String, buf, line, col)
    }

    fn lex_identifier(&mut self, line: usize, col: usize) -> Token {
        let start = self.pos;
        while !self.is_at_end() && (self.current().is_ascii_alphanumeric() || self.current() == b'_') {
            self.advance();
        }
        let lexeme = std::str::from_utf8(&self.source[start..self.pos]).unwrap().to_string();
        let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Identifier);
        Token::new(kind, lexeme, line, col)
    }

    fn lex_operator(&mut self, c: u8, line: usize, col: usize) -> Option<Token> {
        use TokenKind::*;
        let tok = match c {
            b'+' => {
                if self.peek(1) == b'+' {
                    self.advance();
                    Token::new(PlusPlus, "++", line, col)
                } else if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(PlusEq, "+=", line, col)
                } else {
                    Token::new(Plus, "+", line, col)
                }
            }
            b'-' => {
                if self.peek(1) == b'-' {
                    self.advance();
                    Token::new(MinusMinus, "--", line, col)
                } else if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(MinusEq, "-=", line, col)
                } else {
                    Token::new(Minus, "-", line, col)
                }
            }
            b'*' => {
                if self.peek(1) == b'*' {
                    self.advance();
                    Token::new(StarStar, "**", line, col)
                } else if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(StarEq, "*=", line, col)
                } else {
                    Token::new(Star, "*", line, col)
                }
            }
            b'/' => {
                if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(SlashEq, "/=", line, col)
                } else {
                    Token::new(Slash, "/", line, col)
                }
            }
            b'=' => {
                if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(EqEq, "==", line, col)
                } else if self.peek(1) == b'>' {
                    self.advance();
                    Token::new(FatArrow, "=>", line, col)
                } else {
                    Token::new(Eq, "=", line, col)
                }
            }
            b'!' => {
                self.advance();
                Token::new(NotEq, "!=", line, col)
            }
            b'<' => {
                if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(LtEq, "<=", line, col)
                } else {
                    Token::new(Lt, "<", line, col)
                }
            }
            b'>' => {
                if self.peek(1) == b'=' {
                    self.advance();
                    Token::new(GtEq, ">=", line, col)
                } else {
                    Token::new(Gt, ">", line, col)
                }
            }
            b'%' => Token::new(Percent, "%", line, col),
            b'&' => Token::new(Amp, "&", line, col),
            b'|' => Token::new(Pipe, "|", line, col),
            b'^' => Token::new(Caret, "^", line, col),
            b'~' => Token::new(Tilde, "~", line, col),
            _ => return None,
        };
        self.advance();
        Some(tok)
    }
}

fn single_char_delimiter(c: u8) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match c {
        b'(' => LParen,
        b')' => RParen,
        b'{' => LBrace,
        b'}' => RBrace,
        b'[' => LBracket,
        b']' => RBracket,
        b',' => Comma,
        b':' => Colon,
        b'.' => Dot,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_skips_whitespace_and_comments() {
        let toks = kinds("  # comment\n let");
        assert_eq!(toks, vec![TokenKind::Newline, TokenKind::Let, TokenKind::Eof]);
    }

    #[test]
    fn test_number_literal() {
        let toks = Lexer::new("3.5").tokenize();
        assert_eq!(toks[0].kind, TokenKind::Number);
        assert_eq!(toks[0].number, 3.5);
    }

    #[test]
    fn test_string_escapes() {
        let toks = Lexer::new("\"a\\nb\\t\\\\c\"").tokenize();
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].lexeme, "a\nb\t\\c");
    }

    #[test]
    fn test_keyword_vs_identifier() {
        let toks = kinds("let x fn foo");
        assert_eq!(
            toks,
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Fn,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_two_char_operators_prefer_longest_match() {
        let toks = kinds("++ -- += -= *= /= ** == != <= >= =>");
        assert_eq!(
            toks,
            vec![
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::StarStar,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::FatArrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_bang_is_silently_consumed() {
        let toks = kinds("! x");
        assert_eq!(toks, vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_lone_bang_before_newline_does_not_swallow_the_newline() {
        let toks = kinds("!\nx");
        assert_eq!(toks, vec![TokenKind::Newline, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_lone_bang_at_eof_produces_no_token() {
        let toks = kinds("x !");
        assert_eq!(toks, vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let toks = Lexer::new("let\nx").tokenize();
        // let -> line 1 col 1; newline; x -> line 2 col 1
        assert_eq!((toks[0].line, toks[0].column), (1, 1));
        let x_tok = toks.iter().find(|t| t.kind == TokenKind::Identifier).unwrap();
        assert_eq!((x_tok.line, x_tok.column), (2, 1));
    }
}
