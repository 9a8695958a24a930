//! Hand-written lexer and recursive-descent parser for the `.ripple`
//! IDL (§4.B): `package p; struct S { type name; type name[N]; type
//! name[other_field]; const i32 K = 42; }`, plus `enum`.
//!
//! `original_source/lcmgen` only retrieved the C/C++ emitters
//! (`emit_c.c`, `emit_cpp.c`), which already operate on a built AST and
//! don't show how the reference tool lexes or parses `.lcm` source —
//! this module's comment syntax (line `//` and block `/* */`) and its
//! forward-reference tolerance (a struct may name a user type declared
//! later in the same file) come from spec.md §4.B directly, not from a
//! retrieved parser file. This parser only builds the [`Schema`] tree;
//! resolving user-type references against the whole schema happens
//! afterward in [`crate::validate`].

use ripple_core::{Error, SourceSpan};

use crate::model::{Constant, ConstValue, Dimension, EnumDef, Member, Schema, StructDef, TypeDescriptor};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    IntLit(i64),
    FloatLit(f64),
    Symbol(char),
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    span: SourceSpan,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            chars: src.char_indices().peekable(),
            src,
            line: 1,
            col: 1,
        }
    }

    fn span(&self) -> SourceSpan {
        SourceSpan {
            line: self.line,
            col: self.col,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some(&(_, '/')) => {
                            while !matches!(self.peek_char(), Some('\n') | None) {
                                self.bump();
                            }
                        }
                        Some(&(_, '*')) => {
                            let start = self.span();
                            self.bump();
                            self.bump();
                            loop {
                                match self.bump() {
                                    None => {
                                        return Err(Error::Schema {
                                            span: start,
                                            message: "unterminated block comment".to_string(),
                                        })
                                    }
                                    Some('*') if self.peek_char() == Some('/') => {
                                        self.bump();
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_trivia()?;
        let span = self.span();
        let Some(c) = self.peek_char() else {
            return Ok(Token { tok: Tok::Eof, span });
        };

        if c.is_ascii_digit() || (c == '-' && self.is_number_start()) {
            return self.lex_number(span);
        }

        if c.is_alphabetic() || c == '_' {
            let mut s = String::new();
            while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.') {
                s.push(self.bump().unwrap());
            }
            return Ok(Token {
                tok: Tok::Ident(s),
                span,
            });
        }

        self.bump();
        Ok(Token {
            tok: Tok::Symbol(c),
            span,
        })
    }

    fn is_number_start(&mut self) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        matches!(lookahead.peek(), Some((_, d)) if d.is_ascii_digit())
    }

    fn lex_number(&mut self, span: SourceSpan) -> Result<Token, Error> {
        let mut s = String::new();
        if self.peek_char() == Some('-') {
            s.push(self.bump().unwrap());
        }
        let mut is_float = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                s.push(self.bump().unwrap());
            } else if c == '.' && !is_float {
                is_float = true;
                s.push(self.bump().unwrap());
            } else {
                break;
            }
        }
        if is_float {
            let value: f64 = s.parse().map_err(|_| Error::Schema {
                span,
                message: format!("invalid float literal {s:?}"),
            })?;
            Ok(Token {
                tok: Tok::FloatLit(value),
                span,
            })
        } else {
            let value: i64 = s.parse().map_err(|_| Error::Schema {
                span,
                message: format!("invalid integer literal {s:?}"),
            })?;
            Ok(Token {
                tok: Tok::IntLit(value),
                span,
            })
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_symbol(&mut self, expected: char) -> Result<(), Error> {
        let tok = self.advance();
        match tok.tok {
            Tok::Symbol(c) if c == expected => Ok(()),
            other => Err(Error::Schema {
                span: tok.span,
                message: format!("expected {expected:?}, found {other:?}"),
            }),
        }
    }

    fn expect_ident(&mut self) -> Result<(String, SourceSpan), Error> {
        let tok = self.advance();
        match tok.tok {
            Tok::Ident(s) => Ok((s, tok.span)),
            other => Err(Error::Schema {
                span: tok.span,
                message: format!("expected identifier, found {other:?}"),
            }),
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<SourceSpan, Error> {
        let (got, span) = self.expect_ident()?;
        if got == word {
            Ok(span)
        } else {
            Err(Error::Schema {
                span,
                message: format!("expected keyword {word:?}, found {got:?}"),
            })
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().tok, Tok::Eof)
    }

    fn parse_schema(&mut self) -> Result<Schema, Error> {
        self.expect_keyword("package")?;
        let (package, _) = self.expect_ident()?;
        self.expect_symbol(';')?;

        let mut schema = Schema {
            package,
            structs: Vec::new(),
            enums: Vec::new(),
        };

        while !self.at_eof() {
            let (keyword, span) = match &self.peek().tok {
                Tok::Ident(s) => (s.clone(), self.peek().span),
                other => {
                    return Err(Error::Schema {
                        span: self.peek().span,
                        message: format!("expected 'struct' or 'enum', found {other:?}"),
                    })
                }
            };
            match keyword.as_str() {
                "struct" => schema.structs.push(self.parse_struct(&schema.package)?),
                "enum" => schema.enums.push(self.parse_enum(&schema.package)?),
                other => {
                    return Err(Error::Schema {
                        span,
                        message: format!("expected 'struct' or 'enum', found {other:?}"),
                    })
                }
            }
        }

        Ok(schema)
    }

    fn parse_struct(&mut self, package: &str) -> Result<StructDef, Error> {
        let span = self.expect_keyword("struct")?;
        let (name, _) = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut members = Vec::new();
        let mut constants = Vec::new();

        loop {
            if matches!(self.peek().tok, Tok::Symbol('}')) {
                self.advance();
                break;
            }
            if matches!(&self.peek().tok, Tok::Ident(s) if s == "const") {
                constants.push(self.parse_const()?);
            } else {
                members.push(self.parse_member()?);
            }
        }

        Ok(StructDef {
            qualified_name: format!("{package}.{name}"),
            members,
            constants,
            span,
        })
    }

    fn parse_const(&mut self) -> Result<Constant, Error> {
        let span = self.expect_keyword("const")?;
        let (type_word, type_span) = self.expect_ident()?;
        let type_descriptor = TypeDescriptor::from_keyword(&type_word).ok_or_else(|| Error::Schema {
            span: type_span,
            message: format!("{type_word:?} is not a legal constant type"),
        })?;
        let (name, _) = self.expect_ident()?;
        self.expect_symbol('=')?;

        let negate = if matches!(self.peek().tok, Tok::Symbol('-')) {
            self.advance();
            true
        } else {
            false
        };
        let value_tok = self.advance();
        let value = match value_tok.tok {
            Tok::IntLit(n) => ConstValue::Int(if negate { -n } else { n }),
            Tok::FloatLit(f) => ConstValue::Float(if negate { -f } else { f }),
            other => {
                return Err(Error::Schema {
                    span: value_tok.span,
                    message: format!("expected a literal constant value, found {other:?}"),
                })
            }
        };
        self.expect_symbol(';')?;

        Ok(Constant {
            name,
            type_descriptor,
            value,
            span,
        })
    }

    fn parse_member(&mut self) -> Result<Member, Error> {
        let (type_word, span) = self.expect_ident()?;
        let type_descriptor = TypeDescriptor::from_keyword(&type_word).unwrap_or(TypeDescriptor::User(type_word));
        let (name, _) = self.expect_ident()?;

        let mut dimensions = Vec::new();
        while matches!(self.peek().tok, Tok::Symbol('[')) {
            self.advance();
            let dim_tok = self.advance();
            let dim = match dim_tok.tok {
                Tok::IntLit(n) if n >= 0 => Dimension::Const(n as u32),
                Tok::IntLit(n) => {
                    return Err(Error::Schema {
                        span: dim_tok.span,
                        message: format!("array dimension cannot be negative, got {n}"),
                    })
                }
                Tok::Ident(field) => Dimension::Var(field),
                other => {
                    return Err(Error::Schema {
                        span: dim_tok.span,
                        message: format!("expected array size or field name, found {other:?}"),
                    })
                }
            };
            dimensions.push(dim);
            self.expect_symbol(']')?;
        }
        self.expect_symbol(';')?;

        Ok(Member {
            name,
            type_descriptor,
            dimensions,
            span,
        })
    }

    fn parse_enum(&mut self, package: &str) -> Result<EnumDef, Error> {
        let span = self.expect_keyword("enum")?;
        let (name, _) = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut values = Vec::new();
        let mut next_value = 0i32;
        loop {
            if matches!(self.peek().tok, Tok::Symbol('}')) {
                self.advance();
                break;
            }
            let (value_name, value_span) = self.expect_ident()?;
            if matches!(self.peek().tok, Tok::Symbol('=')) {
                self.advance();
                let negate = if matches!(self.peek().tok, Tok::Symbol('-')) {
                    self.advance();
                    true
                } else {
                    false
                };
                let tok = self.advance();
                next_value = match tok.tok {
                    Tok::IntLit(n) => (if negate { -n } else { n }) as i32,
                    other => {
                        return Err(Error::Schema {
                            span: tok.span,
                            message: format!("expected an integer enum value, found {other:?}"),
                        })
                    }
                };
            }
            values.push((value_name, next_value));
            next_value += 1;

            match self.peek().tok {
                Tok::Symbol(',') => {
                    self.advance();
                }
                Tok::Symbol('}') => {}
                _ => {
                    return Err(Error::Schema {
                        span: value_span,
                        message: "expected ',' or '}' after enum value".to_string(),
                    })
                }
            }
        }

        Ok(EnumDef {
            qualified_name: format!("{package}.{name}"),
            values,
            span,
        })
    }
}

/// Parses one `.ripple` source file into a [`Schema`].
///
/// User-type member references (e.g. a struct naming another struct
/// declared later in the file) are accepted syntactically here and
/// resolved afterward by [`crate::validate::validate`].
pub fn parse(src: &str) -> Result<Schema, Error> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let is_eof = matches!(tok.tok, Tok::Eof);
        tokens.push(tok);
        if is_eof {
            break;
        }
    }

    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_schema()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_struct() {
        let schema = parse("package chat; struct Ping { i32 seq; }").unwrap();
        assert_eq!(schema.package, "chat");
        assert_eq!(schema.structs.len(), 1);
        assert_eq!(schema.structs[0].qualified_name, "chat.Ping");
        assert_eq!(schema.structs[0].members[0].name, "seq");
        assert_eq!(schema.structs[0].members[0].type_descriptor, TypeDescriptor::I32);
    }

    #[test]
    fn parses_const_and_array_members() {
        let src = r#"
            package chat;
            struct Message {
                const i32 MAX_LEN = 256;
                i32 len;
                byte body[len];
                f64 coords[3];
            }
        "#;
        let schema = parse(src).unwrap();
        let s = &schema.structs[0];
        assert_eq!(s.constants[0].name, "MAX_LEN");
        assert_eq!(s.constants[0].value, ConstValue::Int(256));
        assert_eq!(s.members[1].dimensions, vec![Dimension::Var("len".to_string())]);
        assert_eq!(s.members[2].dimensions, vec![Dimension::Const(3)]);
    }

    #[test]
    fn parses_user_type_forward_reference() {
        let src = r#"
            package chat;
            struct Envelope { Header header; }
            struct Header { i32 version; }
        "#;
        let schema = parse(src).unwrap();
        assert_eq!(
            schema.structs[0].members[0].type_descriptor,
            TypeDescriptor::User("Header".to_string())
        );
    }

    #[test]
    fn parses_enum_with_explicit_and_implicit_values() {
        let schema = parse("package chat; enum Level { LOW, MID = 5, HIGH }").unwrap();
        assert_eq!(
            schema.enums[0].values,
            vec![
                ("LOW".to_string(), 0),
                ("MID".to_string(), 5),
                ("HIGH".to_string(), 6),
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let src = r#"
            package chat; // trailing comment
            /* a block
               comment */
            struct Ping { i32 seq; }
        "#;
        let schema = parse(src).unwrap();
        assert_eq!(schema.structs.len(), 1);
    }

    #[test]
    fn rejects_unterminated_block_comment() {
        let err = parse("package chat; /* oops").unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn multi_dimensional_array_with_mixed_dimensions() {
        let src = "package chat; struct Grid { i32 w; f32 cells[w][4]; }";
        let schema = parse(src).unwrap();
        assert_eq!(
            schema.structs[0].members[1].dimensions,
            vec![Dimension::Var("w".to_string()), Dimension::Const(4)]
        );
    }
}
