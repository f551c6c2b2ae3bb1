//! Recursive-descent parser producing the expression AST.
//!
//! One precedence level per method, mirroring the operator ladder of the
//! calculator language (lowest to highest):
//!
//! `=` assignment, `|`, `^^` (and `^` in JS mode), `&`, equality,
//! relational, shifts, additive, multiplicative (`* / % .*`), `//`,
//! unary `+ - ~`, power (`**`, or `^` outside JS mode, right-assoc),
//! postfix call/index.

use crate::tokenizer::{NumberText, Token, TokenKind, Tokenizer};
use abax_common::{CalcError, CalcResult};

pub type NumberLit = NumberText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    DotMul,
    FracDiv,
    Pow,
}

/// One bracketed index position: `a[i]`, `a[lo:hi]`, `a[:]`, `a[]`.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexExpr {
    Single(AstNode),
    Slice {
        start: Option<AstNode>,
        stop: Option<AstNode>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Number(NumberLit),
    Str(String),
    Ident(String),
    Unary {
        op: UnOp,
        expr: Box<AstNode>,
    },
    Binary {
        op: BinOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    Call {
        callee: Box<AstNode>,
        args: Vec<AstNode>,
    },
    Index {
        base: Box<AstNode>,
        indices: Vec<IndexExpr>,
    },
    /// `[...]` literal: a tensor, or an array in JS mode.
    Bracket(Vec<AstNode>),
    Assign {
        target: Box<AstNode>,
        value: Box<AstNode>,
    },
}

/// A `;`-separated input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub expr: AstNode,
    /// False when a trailing `;` suppressed printing.
    pub print: bool,
}

pub type Program = Vec<Statement>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    js_mode: bool,
}

impl Parser {
    pub fn new(src: &str, js_mode: bool) -> CalcResult<Self> {
        Ok(Parser {
            tokens: Tokenizer::new(src).tokenize()?,
            pos: 0,
            js_mode,
        })
    }

    /// Parse a whole input line: expressions separated by `;`.
    pub fn parse(src: &str, js_mode: bool) -> CalcResult<Program> {
        let mut p = Parser::new(src, js_mode)?;
        let mut out = Vec::new();
        loop {
            if p.at_eof() {
                break;
            }
            let expr = p.parse_expr()?;
            // a ';' terminator suppresses printing of this statement
            let print = if p.eat_op(";") {
                false
            } else if p.at_eof() {
                true
            } else {
                return Err(p.unexpected("';' or end of input"));
            };
            out.push(Statement { expr, print });
        }
        Ok(out)
    }

    fn at_eof(&self) -> bool {
        matches!(self.tokens[self.pos].kind, TokenKind::Eof)
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn bump(&mut self) -> TokenKind {
        let k = self.tokens[self.pos].kind.clone();
        if !matches!(k, TokenKind::Eof) {
            self.pos += 1;
        }
        k
    }

    fn peek_op(&self) -> Option<&'static str> {
        match self.peek() {
            TokenKind::Op(o) => Some(o),
            _ => None,
        }
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.peek_op() == Some(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: &'static str) -> CalcResult<()> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{op}'")))
        }
    }

    fn unexpected(&self, wanted: &str) -> CalcError {
        let tok = &self.tokens[self.pos];
        let found = match &tok.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Op(o) => format!("'{o}'"),
            TokenKind::Ident(s) => format!("'{s}'"),
            TokenKind::Number(_) => "number".to_string(),
            TokenKind::Str(_) => "string".to_string(),
        };
        CalcError::syntax(format!(
            "expected {wanted}, found {found} (at position {})",
            tok.start
        ))
    }

    pub fn parse_expr(&mut self) -> CalcResult<AstNode> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> CalcResult<AstNode> {
        let lhs = self.parse_or()?;
        if self.peek_op() == Some("=") {
            if !matches!(lhs, AstNode::Ident(_) | AstNode::Index { .. }) {
                return Err(self.unexpected("an assignable target before '='"));
            }
            self.pos += 1;
            let value = self.parse_assign()?;
            return Ok(AstNode::Assign {
                target: Box::new(lhs),
                value: Box::new(value),
            });
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_xor()?;
        while self.eat_op("|") {
            let rhs = self.parse_xor()?;
            lhs = bin(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_xor(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_and()?;
        loop {
            if self.eat_op("^^") || (self.js_mode && self.eat_op("^")) {
                let rhs = self.parse_and()?;
                lhs = bin(BinOp::Xor, lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_and(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_equality()?;
        while self.eat_op("&") {
            let rhs = self.parse_equality()?;
            lhs = bin(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek_op() {
                Some("==") => BinOp::Eq,
                Some("!=") => BinOp::Ne,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_relational()?;
            lhs = bin(op, lhs, rhs);
        }
    }

    fn parse_relational(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_shift()?;
        loop {
            let op = match self.peek_op() {
                Some("<") => BinOp::Lt,
                Some(">") => BinOp::Gt,
                Some("<=") => BinOp::Le,
                Some(">=") => BinOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_shift()?;
            lhs = bin(op, lhs, rhs);
        }
    }

    fn parse_shift(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_op() {
                Some("<<") => BinOp::Shl,
                Some(">>") => BinOp::Shr,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_additive()?;
            lhs = bin(op, lhs, rhs);
        }
    }

    fn parse_additive(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_op() {
                Some("+") => BinOp::Add,
                Some("-") => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = bin(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_frac_div()?;
        loop {
            let op = match self.peek_op() {
                Some("*") => BinOp::Mul,
                Some("/") => BinOp::Div,
                Some("%") => BinOp::Mod,
                Some(".*") => BinOp::DotMul,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_frac_div()?;
            lhs = bin(op, lhs, rhs);
        }
    }

    fn parse_frac_div(&mut self) -> CalcResult<AstNode> {
        let mut lhs = self.parse_unary()?;
        while self.eat_op("//") {
            let rhs = self.parse_unary()?;
            lhs = bin(BinOp::FracDiv, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        let op = match self.peek_op() {
            Some("+") => Some(UnOp::Plus),
            Some("-") => Some(UnOp::Neg),
            Some("~") => Some(UnOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            let expr = self.parse_unary()?;
            return Ok(AstNode::Unary {
                op,
                expr: Box::new(expr),
            });
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> CalcResult<AstNode> {
        let base = self.parse_postfix()?;
        let is_pow = self.peek_op() == Some("**")
            || (!self.js_mode && self.peek_op() == Some("^"));
        if is_pow {
            self.pos += 1;
            // right-associative; the exponent admits unary signs
            let exp = self.parse_unary()?;
            return Ok(bin(BinOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> CalcResult<AstNode> {
        let mut node = self.parse_primary()?;
        loop {
            if self.eat_op("(") {
                let mut args = Vec::new();
                if !self.eat_op(")") {
                    loop {
                        args.push(self.parse_expr()?);
                        if self.eat_op(",") {
                            continue;
                        }
                        self.expect_op(")")?;
                        break;
                    }
                }
                node = AstNode::Call {
                    callee: Box::new(node),
                    args,
                };
            } else if self.eat_op("[") {
                let mut indices = Vec::new();
                if !self.eat_op("]") {
                    loop {
                        indices.push(self.parse_index_expr()?);
                        if self.eat_op(",") {
                            continue;
                        }
                        self.expect_op("]")?;
                        break;
                    }
                }
                node = AstNode::Index {
                    base: Box::new(node),
                    indices,
                };
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_index_expr(&mut self) -> CalcResult<IndexExpr> {
        let at_bound = |p: &Self| matches!(p.peek_op(), Some(":") | Some("]") | Some(","));
        let start = if at_bound(self) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        if self.eat_op(":") {
            let stop = if at_bound(self) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            Ok(IndexExpr::Slice { start, stop })
        } else {
            match start {
                Some(e) => Ok(IndexExpr::Single(e)),
                None => Err(self.unexpected("an index expression")),
            }
        }
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        match self.bump() {
            TokenKind::Number(n) => Ok(AstNode::Number(n)),
            TokenKind::Str(s) => Ok(AstNode::Str(s)),
            TokenKind::Ident(s) => Ok(AstNode::Ident(s)),
            TokenKind::Op("(") => {
                let e = self.parse_expr()?;
                self.expect_op(")")?;
                Ok(e)
            }
            TokenKind::Op("[") => {
                let mut items = Vec::new();
                if !self.eat_op("]") {
                    loop {
                        items.push(self.parse_expr()?);
                        if self.eat_op(",") {
                            continue;
                        }
                        self.expect_op("]")?;
                        break;
                    }
                }
                Ok(AstNode::Bracket(items))
            }
            _ => {
                // bump does not advance past EOF, so the reported
                // position is the offending token
                Err(self.unexpected("an expression"))
            }
        }
    }
}

fn bin(op: BinOp, lhs: AstNode, rhs: AstNode) -> AstNode {
    AstNode::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(src: &str) -> AstNode {
        let prog = Parser::parse(src, false).unwrap();
        assert_eq!(prog.len(), 1);
        prog.into_iter().next().unwrap().expr
    }

    #[test]
    fn precedence_mul_over_add() {
        match expr("1+2*3") {
            AstNode::Binary { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(*rhs, AstNode::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn frac_div_binds_tighter_than_mod() {
        // -2//3 % 1//5 == ((-2)//3) % (1//5)
        match expr("-2//3%1//5") {
            AstNode::Binary { op: BinOp::Mod, lhs, rhs } => {
                assert!(matches!(*lhs, AstNode::Binary { op: BinOp::FracDiv, .. }));
                assert!(matches!(*rhs, AstNode::Binary { op: BinOp::FracDiv, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative_and_admits_signed_exponent() {
        match expr("2^-2") {
            AstNode::Binary { op: BinOp::Pow, rhs, .. } => {
                assert!(matches!(*rhs, AstNode::Unary { op: UnOp::Neg, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        match expr("2^3^2") {
            AstNode::Binary { op: BinOp::Pow, rhs, .. } => {
                assert!(matches!(*rhs, AstNode::Binary { op: BinOp::Pow, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn caret_is_xor_in_js_mode() {
        let prog = Parser::parse("2^3", true).unwrap();
        assert!(matches!(
            prog[0].expr,
            AstNode::Binary { op: BinOp::Xor, .. }
        ));
    }

    #[test]
    fn postfix_chains() {
        match expr("f(1)(2)[3]") {
            AstNode::Index { base, .. } => {
                assert!(matches!(*base, AstNode::Call { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn slices_and_multidim_indices() {
        match expr("a[:,1]") {
            AstNode::Index { indices, .. } => {
                assert_eq!(indices.len(), 2);
                assert!(matches!(
                    indices[0],
                    IndexExpr::Slice { start: None, stop: None }
                ));
                assert!(matches!(indices[1], IndexExpr::Single(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        match expr("a[]") {
            AstNode::Index { indices, .. } => assert!(indices.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn statements_and_print_suppression() {
        let prog = Parser::parse("a=1;a+1", false).unwrap();
        assert_eq!(prog.len(), 2);
        assert!(!prog[0].print);
        assert!(prog[1].print);
        let prog = Parser::parse("a=1;", false).unwrap();
        assert_eq!(prog.len(), 1);
        assert!(!prog[0].print);
    }

    #[test]
    fn assignment_targets_are_checked() {
        assert!(Parser::parse("1=2", false).is_err());
        assert!(Parser::parse("a[0]=2", false).is_ok());
    }

    #[test]
    fn imaginary_and_float_literals() {
        match expr("3i") {
            AstNode::Number(n) => assert!(n.imaginary),
            other => panic!("unexpected {other:?}"),
        }
        match expr("2.5l") {
            AstNode::Number(n) => assert!(n.binary_float),
            other => panic!("unexpected {other:?}"),
        }
    }
}
