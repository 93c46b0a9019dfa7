//! Structural scanner that finds hash literals in a token stream.
//!
//! The scanner keeps a stack of open delimiters and keyword blocks. Elements (comma separated
//! runs of tokens) are tracked per frame so that braced hashes get their pairs and argument
//! lists can yield their trailing braceless hash.

use crate::lexer::{Token, TokenKind, is_keyword, is_value_keyword, tokenize};
use crate::source::SourceFile;
use crate::tree::{Braces, Enclosing, HashLiteral, PairNode, TokenRef};
use tracing::debug;

/// Every hash literal in `source`, ordered by position.
pub fn scan_hashes(source: &SourceFile) -> Vec<HashLiteral> {
    let tokens = tokenize(source);
    let hashes = Scanner::new(source.text(), &tokens).run();
    debug!(
        tokens = tokens.len(),
        hashes = hashes.len(),
        "scanned hash literals"
    );
    hashes
}

/// Keywords that end a command argument list.
const CLAUSE_KEYWORDS: &[&str] = &[
    "and", "or", "then", "else", "elsif", "when", "in", "rescue", "ensure",
];

/// Keywords that take arguments like a method call does.
const COMMAND_KEYWORDS: &[&str] = &["return", "yield", "super", "next", "break"];

#[derive(Debug, Clone, Copy)]
enum FrameKind {
    CallParen { open: TokenRef },
    GroupParen,
    Bracket,
    Hash { open: TokenRef, enclosing: Enclosing },
    Block { params: BlockParams },
    Keyword { awaiting_do: bool },
    /// Arguments of a call written without parentheses.
    BareArgs,
}

/// Progress through the `|...|` parameter list at the start of a brace block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockParams {
    Pending,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct Element {
    start: usize,
    end: usize,
    line: usize,
    column: usize,
    is_pair: bool,
}

impl Element {
    fn pair(&self) -> PairNode {
        PairNode {
            start: self.start,
            end: self.end,
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    elements: Vec<Element>,
    current: Option<Element>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
            current: None,
        }
    }

    fn touch(&mut self, tok: &Token) {
        match &mut self.current {
            Some(element) => element.end = tok.end,
            None => {
                self.current = Some(Element {
                    start: tok.start,
                    end: tok.end,
                    line: tok.line,
                    column: tok.column,
                    is_pair: tok.kind == TokenKind::Label,
                })
            }
        }
    }

    fn mark_pair(&mut self) {
        if let Some(element) = &mut self.current {
            element.is_pair = true;
        }
    }

    fn finish_element(&mut self) {
        if let Some(element) = self.current.take() {
            self.elements.push(element);
        }
    }

    fn closes_with(&self, kind: TokenKind) -> bool {
        matches!(
            (self.kind, kind),
            (
                FrameKind::CallParen { .. } | FrameKind::GroupParen,
                TokenKind::RParen
            ) | (FrameKind::Bracket, TokenKind::RBracket)
                | (FrameKind::Hash { .. } | FrameKind::Block { .. }, TokenKind::RBrace)
        )
    }
}

struct Scanner<'a> {
    src: &'a str,
    tokens: &'a [Token],
    stack: Vec<Frame>,
    out: Vec<HashLiteral>,
    /// Between `def` and the end of the method signature.
    in_def_signature: bool,
    /// Index of the latest `|` (or `||`) that closed a block's parameter list.
    params_closed_at: Option<usize>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            src,
            tokens,
            stack: Vec::new(),
            out: Vec::new(),
            in_def_signature: false,
            params_closed_at: None,
        }
    }

    fn run(mut self) -> Vec<HashLiteral> {
        for index in 0..self.tokens.len() {
            self.step(index);
        }
        while let Some(frame) = self.stack.pop() {
            self.close_frame(frame, None);
        }
        self.out.sort_by_key(HashLiteral::offset);
        self.out
    }

    fn token_ref(&self, index: usize) -> TokenRef {
        let tok = &self.tokens[index];
        TokenRef {
            index,
            offset: tok.start,
            line: tok.line,
            column: tok.column,
        }
    }

    fn text(&self, tok: &Token) -> &'a str {
        tok.text(self.src)
    }

    fn touch(&mut self, tok: &Token) {
        if let Some(frame) = self.stack.last_mut() {
            frame.touch(tok);
        }
    }

    fn step(&mut self, index: usize) {
        let tok = self.tokens[index];
        let prev = index.checked_sub(1).map(|i| self.tokens[i]);
        match tok.kind {
            TokenKind::Newline => self.on_newline(prev),
            TokenKind::Semicolon => {
                self.in_def_signature = false;
                self.close_bare_args();
                if let Some(frame) = self.stack.last_mut() {
                    frame.finish_element();
                }
            }
            TokenKind::Comma => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.finish_element();
                }
            }
            TokenKind::LParen => {
                self.touch(&tok);
                let kind = if !self.in_def_signature
                    && !tok.space_before
                    && prev.is_some_and(|p| self.opens_call(&p))
                {
                    FrameKind::CallParen {
                        open: self.token_ref(index),
                    }
                } else {
                    FrameKind::GroupParen
                };
                self.in_def_signature = false;
                self.stack.push(Frame::new(kind));
            }
            TokenKind::LBracket => {
                self.touch(&tok);
                self.stack.push(Frame::new(FrameKind::Bracket));
            }
            TokenKind::LBrace => {
                let kind = if self.is_block_brace(prev) {
                    FrameKind::Block {
                        params: BlockParams::Pending,
                    }
                } else {
                    FrameKind::Hash {
                        open: self.token_ref(index),
                        enclosing: self.enclosing(index, prev),
                    }
                };
                self.touch(&tok);
                self.stack.push(Frame::new(kind));
            }
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => self.on_closer(index),
            TokenKind::Ident => self.on_ident(index, prev),
            TokenKind::Arrow => {
                self.touch(&tok);
                if let Some(frame) = self.stack.last_mut() {
                    frame.mark_pair();
                }
            }
            TokenKind::Op if matches!(self.text(&tok), "|" | "||") => {
                self.on_pipe(index);
                self.touch(&tok);
            }
            _ => self.touch(&tok),
        }
    }

    fn on_pipe(&mut self, index: usize) {
        let empty_list = self.text(&self.tokens[index]) == "||";
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let at_start = frame.current.is_none() && frame.elements.is_empty();
        let FrameKind::Block { params } = &mut frame.kind else {
            return;
        };
        let closes = match (*params, at_start, empty_list) {
            (BlockParams::Pending, true, false) => {
                *params = BlockParams::Open;
                false
            }
            (BlockParams::Pending, true, true) | (BlockParams::Open, _, false) => {
                *params = BlockParams::Closed;
                true
            }
            _ => false,
        };
        if closes {
            self.params_closed_at = Some(index);
        }
    }

    fn on_newline(&mut self, prev: Option<Token>) {
        self.in_def_signature = false;
        let continued = prev.is_some_and(|p| {
            matches!(
                p.kind,
                TokenKind::Comma
                    | TokenKind::Op
                    | TokenKind::Arrow
                    | TokenKind::Assign
                    | TokenKind::Dot
                    | TokenKind::Label
            )
        });
        if !continued {
            self.close_bare_args();
        }
        if let Some(Frame {
            kind: FrameKind::Keyword { awaiting_do },
            ..
        }) = self.stack.last_mut()
        {
            *awaiting_do = false;
        }
    }

    fn on_closer(&mut self, index: usize) {
        let tok = self.tokens[index];
        let Some(pos) = self.stack.iter().rposition(|f| f.closes_with(tok.kind)) else {
            debug!(line = tok.line, column = tok.column, "unmatched closing delimiter");
            self.touch(&tok);
            return;
        };
        while self.stack.len() > pos + 1 {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame, None);
            }
        }
        if let Some(frame) = self.stack.pop() {
            let close = self.token_ref(index);
            self.close_frame(frame, Some(close));
        }
        self.touch(&tok);
    }

    fn on_ident(&mut self, index: usize, prev: Option<Token>) {
        let tok = self.tokens[index];
        let text = self.text(&tok);
        if !is_keyword(text) {
            self.touch(&tok);
            if self.starts_command(index) {
                self.stack.push(Frame::new(FrameKind::BareArgs));
            }
            return;
        }

        match text {
            "end" => {
                self.close_keyword_frame();
                self.touch(&tok);
            }
            "do" => {
                self.close_bare_args();
                match self.stack.last_mut() {
                    Some(Frame {
                        kind: FrameKind::Keyword { awaiting_do },
                        ..
                    }) if *awaiting_do => *awaiting_do = false,
                    _ => self.stack.push(Frame::new(FrameKind::Keyword {
                        awaiting_do: false,
                    })),
                }
            }
            "def" => {
                self.touch(&tok);
                self.stack.push(Frame::new(FrameKind::Keyword { awaiting_do: false }));
                self.in_def_signature = true;
            }
            "class" | "module" | "begin" | "case" => {
                self.touch(&tok);
                self.stack.push(Frame::new(FrameKind::Keyword { awaiting_do: false }));
            }
            "if" | "unless" | "while" | "until" => {
                if prev.is_some_and(|p| self.is_valueish(&p)) {
                    // Modifier form.
                    self.close_bare_args();
                    self.touch(&tok);
                } else {
                    self.touch(&tok);
                    self.stack.push(Frame::new(FrameKind::Keyword {
                        awaiting_do: matches!(text, "while" | "until"),
                    }));
                }
            }
            "for" => {
                self.touch(&tok);
                self.stack.push(Frame::new(FrameKind::Keyword { awaiting_do: true }));
            }
            _ if CLAUSE_KEYWORDS.contains(&text) => {
                self.close_bare_args();
                self.touch(&tok);
            }
            _ => {
                self.touch(&tok);
                if COMMAND_KEYWORDS.contains(&text) && self.starts_command(index) {
                    self.stack.push(Frame::new(FrameKind::BareArgs));
                }
            }
        }
    }

    fn close_bare_args(&mut self) {
        while matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::BareArgs,
                ..
            })
        ) {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame, None);
            }
        }
    }

    fn close_keyword_frame(&mut self) {
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|f| matches!(f.kind, FrameKind::Keyword { .. }))
        else {
            self.close_bare_args();
            return;
        };
        while self.stack.len() > pos {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame, None);
            }
        }
    }

    fn close_frame(&mut self, mut frame: Frame, close: Option<TokenRef>) {
        frame.finish_element();
        match frame.kind {
            FrameKind::Hash { open, enclosing } => {
                self.out.push(HashLiteral {
                    braces: close.map(|close| Braces { open, close }),
                    pairs: frame.elements.iter().map(Element::pair).collect(),
                    enclosing,
                });
            }
            FrameKind::CallParen { open } => self.emit_braceless(
                &frame.elements,
                Enclosing::Argument {
                    left_paren: Some(open),
                },
            ),
            FrameKind::BareArgs => {
                self.emit_braceless(&frame.elements, Enclosing::Argument { left_paren: None })
            }
            FrameKind::Bracket => self.emit_braceless(&frame.elements, Enclosing::Other),
            FrameKind::GroupParen | FrameKind::Block { .. } | FrameKind::Keyword { .. } => {}
        }
    }

    /// Trailing `key => value` / `key: value` elements form a hash without braces.
    fn emit_braceless(&mut self, elements: &[Element], enclosing: Enclosing) {
        let first_pair = elements
            .iter()
            .rposition(|e| !e.is_pair)
            .map(|i| i + 1)
            .unwrap_or(0);
        let pairs: Vec<PairNode> = elements[first_pair..].iter().map(Element::pair).collect();
        if !pairs.is_empty() {
            self.out.push(HashLiteral {
                braces: None,
                pairs,
                enclosing,
            });
        }
    }

    fn is_valueish(&self, tok: &Token) -> bool {
        match tok.kind {
            TokenKind::Ident => {
                let text = self.text(tok);
                !is_keyword(text) || is_value_keyword(text)
            }
            TokenKind::Number
            | TokenKind::Str
            | TokenKind::Symbol
            | TokenKind::Regex
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace => true,
            _ => false,
        }
    }

    fn opens_call(&self, prev: &Token) -> bool {
        match prev.kind {
            TokenKind::Ident => {
                let text = self.text(prev);
                !is_keyword(text) || matches!(text, "super" | "yield" | "defined?")
            }
            TokenKind::Dot | TokenKind::RParen | TokenKind::RBracket => true,
            _ => false,
        }
    }

    /// A `{` after an expression (or `->`) opens a block, not a hash.
    fn is_block_brace(&self, prev: Option<Token>) -> bool {
        prev.is_some_and(|p| {
            self.is_valueish(&p) || (p.kind == TokenKind::Op && self.text(&p) == "->")
        })
    }

    /// Where the hash opened at `index` sits. A hash right after block parameters is decided by
    /// what encloses the block.
    fn enclosing(&self, index: usize, prev: Option<Token>) -> Enclosing {
        let after_block_params = self.params_closed_at.is_some_and(|at| at + 1 == index);
        if let Some(p) = prev {
            match p.kind {
                TokenKind::Op if !after_block_params => return Enclosing::Operand,
                TokenKind::Assign => return Enclosing::Assignment,
                TokenKind::Ident if is_keyword(self.text(&p)) => return Enclosing::Other,
                _ => {}
            }
        }
        for frame in self.stack.iter().rev() {
            match frame.kind {
                FrameKind::Hash { .. } | FrameKind::Bracket | FrameKind::Block { .. } => continue,
                FrameKind::CallParen { open } => {
                    return Enclosing::Argument {
                        left_paren: Some(open),
                    };
                }
                FrameKind::BareArgs => return Enclosing::Argument { left_paren: None },
                _ => return Enclosing::Other,
            }
        }
        Enclosing::Other
    }

    /// Whether the identifier at `index` is a method call whose arguments follow without
    /// parentheses, e.g. `func x, {` or `puts a: 1`.
    fn starts_command(&self, index: usize) -> bool {
        if self.in_def_signature {
            return false;
        }
        let tok = &self.tokens[index];
        if self.text(tok).starts_with(['@', '$']) {
            return false;
        }
        let Some(next) = self.tokens.get(index + 1) else {
            return false;
        };
        if !next.space_before {
            return false;
        }
        let tight_after = || {
            self.tokens
                .get(index + 2)
                .is_some_and(|after| !after.space_before && after.kind != TokenKind::Newline)
        };
        match next.kind {
            TokenKind::Ident => {
                let text = self.text(next);
                !is_keyword(text)
                    || (is_value_keyword(text) && text != "end")
                    || matches!(text, "not" | "defined?" | "yield" | "super")
            }
            TokenKind::Label
            | TokenKind::Symbol
            | TokenKind::Str
            | TokenKind::Regex
            | TokenKind::Number
            | TokenKind::LBracket
            | TokenKind::LParen => true,
            TokenKind::Op => {
                matches!(self.text(next), "-" | "*" | "&" | "**" | "!" | "->" | "~")
                    && tight_after()
            }
            TokenKind::Dot => self.text(next) == "::" && tight_after(),
            _ => false,
        }
    }
}
