//! Recursive-descent parser producing [`crate::ast`] nodes from the MiniLang
//! grammar. A hand-written descent parser is the idiomatic Rust choice for
//! a grammar this small: no left-recursion once `expr`/`term` are rewritten
//! iteratively below, and no ambiguity requiring a generated table.

use crate::ast::{Expr, FunCall, Proc, Program, Stmt, StmtList};
use crate::error::{MiniLangError, Result, SourcePos};
use crate::parser::lexer::{Lexer, Token, TokenKind};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

/// Parses a complete program.
pub fn parse(src: &str) -> Result<Program> {
    let mut parser = Parser::new(src)?;
    let stmts = parser.parse_stmt_list()?;
    parser.expect_eof()?;
    Ok(Program(stmts))
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn pos(&self) -> SourcePos {
        self.current.pos
    }

    fn bump(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error(&self, message: impl Into<String>) -> MiniLangError {
        MiniLangError::Parse {
            message: message.into(),
            pos: self.pos(),
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if &self.current.kind == kind {
            self.bump()?;
            Ok(())
        } else {
            Err(self.error(format!("expected {kind:?}, found {:?}", self.current.kind)))
        }
    }

    fn expect_eof(&mut self) -> Result<()> {
        if self.current.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error(format!("expected end of input, found {:?}", self.current.kind)))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(name)
            }
            other => Err(self.error(format!("expected an identifier, found {other:?}"))),
        }
    }

    /// `stmt_list := stmt (';' stmt)*`
    fn parse_stmt_list(&mut self) -> Result<StmtList> {
        let mut stmts = vec![self.parse_stmt()?];
        while self.current.kind == TokenKind::Semicolon {
            self.bump()?;
            stmts.push(self.parse_stmt()?);
        }
        Ok(StmtList::new(stmts))
    }

    /// `stmt := assign | if | while | define`
    fn parse_stmt(&mut self) -> Result<Stmt> {
        match &self.current.kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Define => self.parse_define(),
            TokenKind::Ident(_) => self.parse_assign(),
            other => Err(self.error(format!("expected a statement, found {other:?}"))),
        }
    }

    /// `assign := IDENT ':=' element`
    fn parse_assign(&mut self) -> Result<Stmt> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Assign)?;
        let rhs = self.parse_element()?;
        Ok(Stmt::Assign { name, rhs })
    }

    /// `if := 'if' expr 'then' stmt_list 'else' stmt_list 'fi'`
    fn parse_if(&mut self) -> Result<Stmt> {
        self.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Then)?;
        let then_body = self.parse_stmt_list()?;
        self.expect(&TokenKind::Else)?;
        let else_body = self.parse_stmt_list()?;
        self.expect(&TokenKind::Fi)?;
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
        })
    }

    /// `while := 'while' expr 'do' stmt_list 'od'`
    fn parse_while(&mut self) -> Result<Stmt> {
        self.expect(&TokenKind::While)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_stmt_list()?;
        self.expect(&TokenKind::Od)?;
        Ok(Stmt::While { cond, body })
    }

    /// `define := 'define' IDENT 'proc' '(' param_list ')' stmt_list 'end'`
    fn parse_define(&mut self) -> Result<Stmt> {
        self.expect(&TokenKind::Define)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Proc)?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt_list()?;
        self.expect(&TokenKind::End)?;
        Ok(Stmt::Define {
            name,
            proc: Proc { params, body },
        })
    }

    /// `param_list := IDENT (',' IDENT)*`. The grammar doesn't give an
    /// empty alternative, but `define f proc ()` with zero parameters is
    /// common enough that we accept an empty list too.
    fn parse_param_list(&mut self) -> Result<Vec<String>> {
        if self.current.kind == TokenKind::RParen {
            return Ok(Vec::new());
        }
        let mut params = vec![self.expect_ident()?];
        while self.current.kind == TokenKind::Comma {
            self.bump()?;
            params.push(self.expect_ident()?);
        }
        Ok(params)
    }

    /// `element := expr | list`. A `[` starts a list literal unambiguously;
    /// otherwise parse an `expr`, then fold in any trailing `||` operators
    /// (`list := element '||' element` is left-recursive through `element`
    /// and so is handled here as a loop rather than by recursing into
    /// `parse_element` again).
    fn parse_element(&mut self) -> Result<Expr> {
        let mut lhs = if self.current.kind == TokenKind::LBracket {
            self.parse_list_literal()?
        } else {
            self.parse_expr()?
        };

        while self.current.kind == TokenKind::Concat {
            self.bump()?;
            let rhs = if self.current.kind == TokenKind::LBracket {
                self.parse_list_literal()?
            } else {
                self.parse_expr()?
            };
            lhs = Expr::Concat(Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    /// `list := '[' sequence ']' | '[' ']'`
    fn parse_list_literal(&mut self) -> Result<Expr> {
        self.expect(&TokenKind::LBracket)?;
        if self.current.kind == TokenKind::RBracket {
            self.bump()?;
            return Ok(Expr::ListLit(Vec::new()));
        }
        let elements = self.parse_sequence()?;
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::ListLit(elements))
    }

    /// `sequence := element (',' element)*`
    fn parse_sequence(&mut self) -> Result<Vec<Expr>> {
        let mut elements = vec![self.parse_element()?];
        while self.current.kind == TokenKind::Comma {
            self.bump()?;
            elements.push(self.parse_element()?);
        }
        Ok(elements)
    }

    /// `expr := expr '+' term | expr '-' term | term`, rewritten
    /// iteratively to avoid left recursion.
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.current.kind {
                TokenKind::Plus => {
                    self.bump()?;
                    let rhs = self.parse_term()?;
                    lhs = Expr::Plus(Box::new(lhs), Box::new(rhs));
                }
                TokenKind::Minus => {
                    self.bump()?;
                    let rhs = self.parse_term()?;
                    lhs = Expr::Minus(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    /// `term := term '*' fact | fact`, likewise rewritten iteratively.
    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_fact()?;
        while self.current.kind == TokenKind::Times {
            self.bump()?;
            let rhs = self.parse_fact()?;
            lhs = Expr::Times(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// `fact := '(' expr ')' | NUMBER | IDENT | funcall`
    fn parse_fact(&mut self) -> Result<Expr> {
        match self.current.kind.clone() {
            TokenKind::LParen => {
                self.bump()?;
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Number(n) => {
                self.bump()?;
                Ok(Expr::Number(n))
            }
            TokenKind::Ident(name) => {
                self.bump()?;
                if self.current.kind == TokenKind::LParen {
                    self.parse_funcall_args(name)
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            other => Err(self.error(format!("expected a factor, found {other:?}"))),
        }
    }

    /// `funcall := IDENT '(' expr_list ')'`, called after the leading
    /// `IDENT` has already been consumed by [`Self::parse_fact`].
    fn parse_funcall_args(&mut self, name: String) -> Result<Expr> {
        self.expect(&TokenKind::LParen)?;
        let args = if self.current.kind == TokenKind::RParen {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect(&TokenKind::RParen)?;
        Ok(Expr::Call(FunCall { name, args }))
    }

    /// `expr_list := element (',' element)*`
    fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut args = vec![self.parse_element()?];
        while self.current.kind == TokenKind::Comma {
            self.bump()?;
            args.push(self.parse_element()?);
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_assignment() {
        let program = parse("x := 1 + 2 * 3").unwrap();
        assert_eq!(
            program.0 .0,
            vec![Stmt::Assign {
                name: "x".to_string(),
                rhs: Expr::Plus(
                    Box::new(Expr::Number(1)),
                    Box::new(Expr::Times(Box::new(Expr::Number(2)), Box::new(Expr::Number(3)))),
                ),
            }]
        );
    }

    #[test]
    fn parses_list_literal_and_concat() {
        let program = parse("x := [1, 2] || [3]").unwrap();
        let Stmt::Assign { rhs, .. } = &program.0 .0[0] else {
            panic!("expected assign");
        };
        assert_eq!(
            *rhs,
            Expr::Concat(
                Box::new(Expr::ListLit(vec![Expr::Number(1), Expr::Number(2)])),
                Box::new(Expr::ListLit(vec![Expr::Number(3)])),
            )
        );
    }

    #[test]
    fn parses_funcall_with_args() {
        let program = parse("x := f(1, y)").unwrap();
        let Stmt::Assign { rhs, .. } = &program.0 .0[0] else {
            panic!("expected assign");
        };
        assert_eq!(
            *rhs,
            Expr::Call(FunCall {
                name: "f".to_string(),
                args: vec![Expr::Number(1), Expr::Ident("y".to_string())],
            })
        );
    }

    #[test]
    fn parses_define_if_while() {
        let src = "define sum(i) proc return := 0; while i do return := return + i; i := i - 1 od end; \
                    x := 5; x := sum(x)";
        let program = parse(src).unwrap();
        assert_eq!(program.0 .0.len(), 3);
        assert!(matches!(program.0 .0[0], Stmt::Define { .. }));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("x := ").is_err());
        assert!(parse("if x then y := 1 fi").is_err());
    }
}
