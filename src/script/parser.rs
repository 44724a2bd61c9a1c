//! Script parser.
//!
//! Splits script text into literal text and `$name[arg;arg]` calls. Arguments
//! are parsed eagerly into their own node lists, so evaluation never has to
//! re-scan text; commands that defer resolution still receive the raw source
//! of each argument alongside its nodes.

use crate::error::{EaselError, Result};

use super::span::{Location, Span};

/// Calls nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 128;

/// A parsed piece of script.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text (escapes already applied)
    Text(String),
    /// A command call
    Call(Call),
}

/// A command call: `$name`, `$name[]` or `$name[a;b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Command name including the `$` sigil, as written.
    pub name: String,
    /// Arguments, or `None` when the call had no brackets.
    pub args: Option<Vec<Argument>>,
    pub span: Span,
}

impl Call {
    /// The call's arguments (empty for unbracketed calls).
    pub fn arguments(&self) -> &[Argument] {
        self.args.as_deref().unwrap_or_default()
    }

    pub fn is_bracketed(&self) -> bool {
        self.args.is_some()
    }
}

/// One `;`-separated argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub nodes: Vec<Node>,
    /// The argument's raw source text, unresolved.
    pub source: String,
    pub span: Span,
}

/// Parse script text into nodes.
pub fn parse(source: &str) -> Result<Vec<Node>> {
    let mut parser = Parser {
        source,
        pos: 0,
        depth: 0,
        cursor: Location::START,
    };
    let (nodes, _) = parser.sequence(Mode::TopLevel)?;
    Ok(nodes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    TopLevel,
    Argument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    End,
    Separator,
    Close,
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
    depth: usize,
    /// Last located position; spans are located in increasing offset order.
    cursor: Location,
}

impl Parser<'_> {
    fn locate(&mut self, offset: usize) -> Location {
        self.cursor = self.cursor.advance(self.source, offset);
        self.cursor
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn sequence(&mut self, mode: Mode) -> Result<(Vec<Node>, Stop)> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        // Bare brackets inside an argument nest and must balance before `;` or `]` count.
        let mut brackets = 0usize;

        let stop = loop {
            let Some(c) = self.peek() else {
                break Stop::End;
            };

            match c {
                '\\' => {
                    match self.source[self.pos + 1..].chars().next() {
                        Some(escaped @ ('$' | '[' | ']' | ';' | '\\')) => {
                            text.push(escaped);
                            self.pos += 2;
                        }
                        _ => {
                            text.push('\\');
                            self.pos += 1;
                        }
                    }
                }
                '$' => match self.call()? {
                    Some(call) => {
                        flush(&mut text, &mut nodes);
                        nodes.push(Node::Call(call));
                    }
                    None => text.push('$'),
                },
                ';' if mode == Mode::Argument && brackets == 0 => {
                    self.pos += 1;
                    break Stop::Separator;
                }
                ']' if mode == Mode::Argument && brackets == 0 => {
                    self.pos += 1;
                    break Stop::Close;
                }
                '[' if mode == Mode::Argument => {
                    brackets += 1;
                    text.push(c);
                    self.pos += 1;
                }
                ']' if mode == Mode::Argument => {
                    brackets -= 1;
                    text.push(c);
                    self.pos += 1;
                }
                _ => {
                    text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        };

        flush(&mut text, &mut nodes);
        Ok((nodes, stop))
    }

    /// Parse a call starting at `$`. Returns `None` (having consumed the `$`)
    /// when no identifier follows.
    fn call(&mut self) -> Result<Option<Call>> {
        let start = self.pos;
        let ident = identifier_len(&self.source[start + 1..]);
        if ident == 0 {
            self.pos += 1;
            return Ok(None);
        }
        let begin = self.locate(start);

        self.pos = start + 1 + ident;
        let name = self.source[start..self.pos].to_string();

        if self.peek() != Some('[') {
            return Ok(Some(Call {
                name,
                args: None,
                span: Span::new(begin, self.locate(self.pos)),
            }));
        }

        if self.depth >= MAX_DEPTH {
            return Err(EaselError::Parse {
                message: format!(
                    "{} at {} is nested more than {} calls deep",
                    name, begin, MAX_DEPTH
                ),
                help: None,
            });
        }

        self.pos += 1;
        self.depth += 1;

        let mut args = Vec::new();
        if self.peek() == Some(']') {
            self.pos += 1;
        } else {
            loop {
                let arg_start = self.pos;
                let arg_begin = self.locate(arg_start);
                let (nodes, stop) = self.sequence(Mode::Argument)?;
                let arg_end = match stop {
                    Stop::End => self.pos,
                    Stop::Separator | Stop::Close => self.pos - 1,
                };

                args.push(Argument {
                    nodes,
                    source: self.source[arg_start..arg_end].to_string(),
                    span: Span::new(arg_begin, self.locate(arg_end)),
                });

                match stop {
                    Stop::Separator => continue,
                    Stop::Close => break,
                    Stop::End => {
                        return Err(EaselError::Parse {
                            message: format!(
                                "Unclosed `[` for {} at {}",
                                name, begin
                            ),
                            help: Some("Add a closing `]` or escape the bracket as `\\[`".to_string()),
                        });
                    }
                }
            }
        }

        self.depth -= 1;

        Ok(Some(Call {
            name,
            args: Some(args),
            span: Span::new(begin, self.locate(self.pos)),
        }))
    }
}

fn flush(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

/// Length in bytes of the ASCII identifier at the start of `s`.
fn identifier_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return 0,
    }
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count()
}
