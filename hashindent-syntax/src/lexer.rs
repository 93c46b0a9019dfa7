//! Tokenizer for the subset of Ruby the hash scanner needs.
//!
//! It recognizes enough structure to tell brackets apart from bracket characters inside strings,
//! symbols, regexps, percent literals, heredocs and comments. Everything else is an operator.

use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// `key:` (also `"key":`).
    Label,
    Symbol,
    Str,
    Regex,
    Number,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    /// `.`, `&.` and `::`.
    Dot,
    /// `=>`
    Arrow,
    /// `=` and compound assignment.
    Assign,
    Op,
    Newline,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    /// Whitespace separates this token from the previous one on the same line.
    pub space_before: bool,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

const KEYWORDS: &[&str] = &[
    "BEGIN", "END", "alias", "and", "begin", "break", "case", "class", "def", "defined?", "do",
    "else", "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not",
    "or", "redo", "rescue", "retry", "return", "self", "super", "then", "true", "undef", "unless",
    "until", "when", "while", "yield",
];

/// Keywords that end an expression the way an identifier does.
const VALUE_KEYWORDS: &[&str] = &["end", "false", "nil", "self", "true", "super"];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

pub fn is_value_keyword(text: &str) -> bool {
    VALUE_KEYWORDS.contains(&text)
}

/// Longest-match operator table.
const OPERATORS: &[&str] = &[
    "**=", "<=>", "===", "...", "<<=", ">>=", "&&=", "||=", "==", "!=", ">=", "<=", "&&", "||",
    "<<", ">>", "**", "=~", "!~", "..", "::", "->", "&.", "+=", "-=", "*=", "/=", "%=", "|=",
    "&=", "^=", "=>", "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~", "?", ":",
];

const ASSIGN_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "|=", "&=", "^=", "<<=", ">>=", "&&=", "||=",
];

pub fn tokenize(source: &SourceFile) -> Vec<Token> {
    Lexer::new(source).run()
}

struct PendingHeredoc {
    terminator: String,
    indented: bool,
}

struct Lexer<'a> {
    source: &'a SourceFile,
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    space_before: bool,
    tokens: Vec<Token>,
    heredocs: Vec<PendingHeredoc>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            src: source.text(),
            bytes: source.text().as_bytes(),
            pos: 0,
            space_before: false,
            tokens: Vec::new(),
            heredocs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let start = self.pos;
            match b {
                b' ' | b'\t' | b'\r' | 0x0c => {
                    self.pos += 1;
                    self.space_before = true;
                }
                b'\\' if self.peek(1) == Some(b'\n') => {
                    self.pos += 2;
                    self.space_before = true;
                }
                b'\n' => {
                    self.pos += 1;
                    self.push(TokenKind::Newline, start);
                    if !self.heredocs.is_empty() {
                        self.skip_heredoc_bodies();
                    }
                }
                b'#' => self.skip_line(),
                b'=' if self.at_line_start() && self.rest().starts_with("=begin") => {
                    self.skip_block_comment();
                }
                b'_' if self.at_line_start() && self.rest_of_line() == "__END__" => {
                    self.pos = self.bytes.len();
                }
                b'"' | b'\'' | b'`' => {
                    self.skip_quoted(b);
                    if b != b'`' && self.peek(0) == Some(b':') && self.peek(1) != Some(b':') {
                        self.pos += 1;
                        self.push(TokenKind::Label, start);
                    } else {
                        self.push(TokenKind::Str, start);
                    }
                }
                b':' => self.lex_colon(),
                b'/' if self.value_expected() => {
                    self.pos += 1;
                    self.skip_until_closing(b'/');
                    self.skip_while(|c| c.is_ascii_alphabetic());
                    self.push(TokenKind::Regex, start);
                }
                b'%' if self.value_expected() && self.percent_literal_len().is_some() => {
                    self.lex_percent_literal();
                }
                b'<' if self.heredoc_start() => self.lex_heredoc_marker(),
                b'(' => self.single(TokenKind::LParen),
                b')' => self.single(TokenKind::RParen),
                b'[' => self.single(TokenKind::LBracket),
                b']' => self.single(TokenKind::RBracket),
                b'{' => self.single(TokenKind::LBrace),
                b'}' => self.single(TokenKind::RBrace),
                b',' => self.single(TokenKind::Comma),
                b';' => self.single(TokenKind::Semicolon),
                b'0'..=b'9' => self.lex_number(),
                _ if is_ident_start(b) || b == b'@' || b == b'$' => self.lex_ident(),
                _ => self.lex_operator(),
            }
        }
        self.tokens
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn rest_of_line(&self) -> &'a str {
        let rest = self.rest();
        rest.split('\n').next().unwrap_or(rest).trim_end_matches('\r')
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.bytes[self.pos - 1] == b'\n'
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let (line, column) = self.source.offset_to_line_col(start);
        self.tokens.push(Token {
            kind,
            start,
            end: self.pos,
            line,
            column,
            space_before: self.space_before,
        });
        self.space_before = false;
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start);
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn skip_line(&mut self) {
        self.skip_while(|c| c != b'\n');
    }

    fn skip_block_comment(&mut self) {
        loop {
            self.skip_line();
            if self.pos >= self.bytes.len() {
                return;
            }
            self.pos += 1;
            if self.rest().starts_with("=end") {
                self.skip_line();
                return;
            }
        }
    }

    /// True when the previous token cannot end an expression, so `/`, `%` and `<<` begin a
    /// literal rather than act as binary operators.
    fn value_expected(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return true;
        };
        match prev.kind {
            TokenKind::Number
            | TokenKind::Str
            | TokenKind::Symbol
            | TokenKind::Regex
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace => false,
            TokenKind::Ident => {
                let text = prev.text(self.src);
                if is_keyword(text) {
                    return !is_value_keyword(text);
                }
                // `puts /re/` is an argument, `a / b` is a division.
                self.space_before && !matches!(self.peek(1), Some(b' ' | b'\t' | b'='))
            }
            _ => true,
        }
    }

    /// Skips to just past the next unescaped `close`, honoring `#{}` interpolation.
    fn skip_until_closing(&mut self, close: u8) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'#' if self.peek(1) == Some(b'{') => {
                    self.pos += 2;
                    self.skip_interpolation();
                }
                c if c == close => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn skip_interpolation(&mut self) {
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 1,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn skip_quoted(&mut self, quote: u8) {
        self.pos += 1;
        if quote == b'\'' {
            while self.pos < self.bytes.len() {
                match self.bytes[self.pos] {
                    b'\\' => self.pos += 2,
                    b'\'' => {
                        self.pos += 1;
                        return;
                    }
                    _ => self.pos += 1,
                }
            }
            self.pos = self.pos.min(self.bytes.len());
        } else {
            self.skip_until_closing(quote);
        }
    }

    fn lex_colon(&mut self) {
        let start = self.pos;
        match self.peek(1) {
            Some(b':') => {
                self.pos += 2;
                self.push(TokenKind::Dot, start);
            }
            Some(q @ (b'"' | b'\'')) => {
                self.pos += 1;
                self.skip_quoted(q);
                self.push(TokenKind::Symbol, start);
            }
            Some(c) if is_ident_start(c) || c == b'@' || c == b'$' => {
                self.pos += 1;
                self.skip_while(|c| c == b'@' || c == b'$');
                self.skip_while(is_ident_char);
                if matches!(self.peek(0), Some(b'?' | b'!' | b'='))
                    && !matches!(self.peek(1), Some(b'=' | b'>' | b'~'))
                {
                    self.pos += 1;
                }
                self.push(TokenKind::Symbol, start);
            }
            Some(b'[') if self.rest().starts_with(":[]") => {
                self.pos += 3;
                if self.peek(0) == Some(b'=') {
                    self.pos += 1;
                }
                self.push(TokenKind::Symbol, start);
            }
            Some(c) if self.value_expected() && is_operator_char(c) => {
                self.pos += 1;
                let len = longest_operator(self.rest()).map(str::len).unwrap_or(1);
                self.pos += len;
                self.push(TokenKind::Symbol, start);
            }
            _ => {
                self.pos += 1;
                self.push(TokenKind::Op, start);
            }
        }
    }

    fn percent_literal_len(&self) -> Option<usize> {
        let next = self.peek(1)?;
        if b"qQwWiIrsx".contains(&next) {
            let delim = self.peek(2)?;
            delim.is_ascii_punctuation().then_some(2)
        } else if b"([{<|!/^".contains(&next) {
            Some(1)
        } else {
            None
        }
    }

    fn lex_percent_literal(&mut self) {
        let start = self.pos;
        let Some(prefix) = self.percent_literal_len() else {
            return self.lex_operator();
        };
        self.pos += prefix;
        let open = self.bytes[self.pos];
        let close = match open {
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            b'<' => b'>',
            other => other,
        };
        self.pos += 1;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos];
            if c == b'\\' {
                self.pos += 2;
                continue;
            }
            if c == close {
                depth -= 1;
                if depth == 0 {
                    self.pos += 1;
                    break;
                }
            } else if c == open && open != close {
                depth += 1;
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.bytes.len());
        let kind = if self.bytes.get(start + 1) == Some(&b'r') {
            TokenKind::Regex
        } else {
            TokenKind::Str
        };
        self.push(kind, start);
    }

    fn heredoc_start(&self) -> bool {
        if !self.rest().starts_with("<<") || !self.value_expected() {
            return false;
        }
        match self.peek(2) {
            Some(b'~' | b'-') => self
                .peek(3)
                .is_some_and(|c| is_ident_start(c) || c == b'"' || c == b'\''),
            Some(c) => c.is_ascii_uppercase() || c == b'"' || c == b'\'',
            None => false,
        }
    }

    fn lex_heredoc_marker(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let indented = matches!(self.peek(0), Some(b'~' | b'-'));
        if indented {
            self.pos += 1;
        }
        let terminator = match self.peek(0) {
            Some(q @ (b'"' | b'\'')) => {
                let body_start = self.pos + 1;
                self.pos += 1;
                self.skip_while(|c| c != q && c != b'\n');
                let term = self.src[body_start..self.pos].to_string();
                if self.peek(0) == Some(q) {
                    self.pos += 1;
                }
                term
            }
            _ => {
                let body_start = self.pos;
                self.skip_while(is_ident_char);
                self.src[body_start..self.pos].to_string()
            }
        };
        self.heredocs.push(PendingHeredoc {
            terminator,
            indented,
        });
        self.push(TokenKind::Str, start);
    }

    fn skip_heredoc_bodies(&mut self) {
        for heredoc in std::mem::take(&mut self.heredocs) {
            while self.pos < self.bytes.len() {
                let line = self.rest_of_line();
                let candidate = if heredoc.indented {
                    line.trim()
                } else {
                    line
                };
                self.skip_line();
                if self.pos < self.bytes.len() {
                    self.pos += 1;
                }
                if candidate == heredoc.terminator {
                    break;
                }
            }
        }
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        loop {
            self.skip_while(|c| c.is_ascii_alphanumeric() || c == b'_');
            let more = self.peek(0) == Some(b'.')
                && self.peek(1).is_some_and(|c| c.is_ascii_digit());
            if !more {
                break;
            }
            self.pos += 1;
        }
        self.push(TokenKind::Number, start);
    }

    fn lex_ident(&mut self) {
        let start = self.pos;
        let sigil = matches!(self.bytes[self.pos], b'@' | b'$');
        self.skip_while(|c| c == b'@' || c == b'$');
        if sigil && self.peek(0).is_some_and(|c| !is_ident_char(c)) {
            // Special globals such as `$!` and `$0`.
            self.pos = (self.pos + 1).min(self.bytes.len());
            self.push(TokenKind::Ident, start);
            return;
        }
        self.skip_while(is_ident_char);
        if !sigil
            && matches!(self.peek(0), Some(b'?' | b'!'))
            && !matches!(self.peek(1), Some(b'='))
        {
            self.pos += 1;
        }
        let is_label = !sigil
            && self.peek(0) == Some(b':')
            && self.peek(1) != Some(b':')
            && !self.src[start..self.pos].ends_with('?');
        if is_label {
            self.pos += 1;
            self.push(TokenKind::Label, start);
        } else {
            self.push(TokenKind::Ident, start);
        }
    }

    fn lex_operator(&mut self) {
        let start = self.pos;
        let Some(op) = longest_operator(self.rest()) else {
            let width = self.rest().chars().next().map(char::len_utf8).unwrap_or(1);
            self.pos += width;
            self.push(TokenKind::Other, start);
            return;
        };
        self.pos += op.len();
        let kind = match op {
            "=>" => TokenKind::Arrow,
            "." | "&." | "::" => TokenKind::Dot,
            _ if ASSIGN_OPERATORS.contains(&op) => TokenKind::Assign,
            _ => TokenKind::Op,
        };
        self.push(kind, start);
    }
}

fn longest_operator(rest: &str) -> Option<&'static str> {
    if rest.starts_with('.') && !rest.starts_with("..") {
        return Some(".");
    }
    OPERATORS.iter().copied().find(|op| rest.starts_with(op))
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

fn is_operator_char(c: u8) -> bool {
    b"+-*/%<>=!&|^~".contains(&c)
}
