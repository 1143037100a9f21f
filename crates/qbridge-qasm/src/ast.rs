//! Syntax tree for the supported OpenQASM subset.

use std::fmt;

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Version string from the header, e.g. `"3.0"`.
    pub version: String,
    /// Statements with their source lines.
    pub statements: Vec<Located<Statement>>,
}

/// A node tagged with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub line: usize,
    pub node: T,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `include "file";`
    Include(String),

    /// `qubit[n] name;`, `qubit name;` or `qreg name[n];`
    QubitDecl { name: String, size: u32 },

    /// `bit[n] name;`, `bit name;` or `creg name[n];`
    BitDecl { name: String, size: u32 },

    /// Gate application.
    Gate(GateCall),

    /// `target = measure source;`, `measure source -> target;` or `measure source;`
    Measure {
        source: Operand,
        target: Option<Operand>,
    },

    /// `reset q;`
    Reset(Operand),

    /// `barrier q, r;` or `barrier;` (all qubits)
    Barrier(Vec<Operand>),
}

/// A gate call: `name(params) operands;`
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub operands: Vec<Operand>,
}

/// A register reference, either one slot (`q[2]`) or the whole register (`q`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub register: String,
    pub index: Option<u32>,
}

impl Operand {
    /// Reference to a single slot.
    pub fn indexed(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Reference to a whole register.
    pub fn whole(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.register),
            None => write!(f, "{}", self.register),
        }
    }
}

/// A constant expression used as a gate parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Int(u64),
    Float(f64),
    Pi,
    Tau,
    Euler,
    /// A name the subset cannot resolve, kept for error reporting.
    Identifier(String),
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    Paren(Box<Expression>),
}

impl Expression {
    /// Evaluate to a float. `None` if the expression references a name.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Int(v) => Some(*v as f64),
            Expression::Float(v) => Some(*v),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Tau => Some(std::f64::consts::TAU),
            Expression::Euler => Some(std::f64::consts::E),
            Expression::Identifier(_) => None,
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::BinOp { left, op, right } => {
                let l = left.as_f64()?;
                let r = right.as_f64()?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
            Expression::Paren(e) => e.as_f64(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Int(v) => write!(f, "{v}"),
            Expression::Float(v) => write!(f, "{v:?}"),
            Expression::Pi => write!(f, "pi"),
            Expression::Tau => write!(f, "tau"),
            Expression::Euler => write!(f, "euler"),
            Expression::Identifier(name) => write!(f, "{name}"),
            Expression::Neg(e) => write!(f, "-{e}"),
            Expression::BinOp { left, op, right } => write!(f, "{left} {op} {right}"),
            Expression::Paren(e) => write!(f, "({e})"),
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "**",
        };
        f.write_str(symbol)
    }
}
