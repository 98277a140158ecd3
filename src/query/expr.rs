use super::select::Select;
use super::source::SourceRef;

/// A column of a specific FROM element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    owner: SourceRef,
    name: String,
}

impl ColumnRef {
    pub(crate) fn new(owner: SourceRef, name: impl Into<String>) -> Self {
        ColumnRef {
            owner,
            name: name.into(),
        }
    }

    /// The FROM element this column belongs to.
    pub fn owner(&self) -> &SourceRef {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    Plus,
    Minus,
    Multiply,
    Divide,
    Concat,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::LtEq
                | BinaryOperator::Gt
                | BinaryOperator::GtEq
                | BinaryOperator::Like
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Concat => "||",
        }
    }
}

/// Scalar and boolean expressions appearing in select lists, ON and WHERE clauses.
#[derive(Debug, Clone)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    /// Named bind parameter.
    Parameter(String),
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Case {
        operand: Option<Box<Expr>>,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },
    Cast {
        expr: Box<Expr>,
        data_type: String,
    },
    Exists(Box<Select>),
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Select>,
        negated: bool,
    },
    ScalarSubquery(Box<Select>),
}

impl Expr {
    pub fn literal(value: impl Into<Literal>) -> Expr {
        Expr::Literal(value.into())
    }

    pub fn null() -> Expr {
        Expr::Literal(Literal::Null)
    }

    pub fn param(name: impl Into<String>) -> Expr {
        Expr::Parameter(name.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    pub fn exists(select: Select) -> Expr {
        Expr::Exists(Box::new(select))
    }

    pub fn scalar(select: Select) -> Expr {
        Expr::ScalarSubquery(Box::new(select))
    }

    pub fn case(
        operand: Option<Expr>,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Expr>,
    ) -> Expr {
        Expr::Case {
            operand: operand.map(Box::new),
            when_then,
            else_expr: else_expr.map(Box::new),
        }
    }

    /// AND together all conditions, flattening nested ANDs; no conditions at
    /// all is `true`.
    pub fn and_all(conditions: impl IntoIterator<Item = Expr>) -> Expr {
        let mut terms = Vec::new();
        for condition in conditions {
            match condition {
                Expr::And(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        match terms.len() {
            0 => Expr::literal(true),
            1 => terms.remove(0),
            _ => Expr::And(terms),
        }
    }

    /// OR together all conditions; no conditions at all is `false`.
    pub fn or_any(conditions: impl IntoIterator<Item = Expr>) -> Expr {
        let mut terms: Vec<Expr> = conditions.into_iter().collect();
        match terms.len() {
            0 => Expr::literal(false),
            1 => terms.remove(0),
            _ => Expr::Or(terms),
        }
    }

    pub fn binary(self, op: BinaryOperator, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(rhs.into()),
        }
    }

    pub fn equals(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, rhs)
    }

    pub fn not_equals(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::NotEq, rhs)
    }

    pub fn less_than(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, rhs)
    }

    pub fn less_or_equal(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::LtEq, rhs)
    }

    pub fn greater_than(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, rhs)
    }

    pub fn greater_or_equal(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::GtEq, rhs)
    }

    pub fn like(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Like, pattern)
    }

    pub fn plus(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Plus, rhs)
    }

    pub fn minus(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Minus, rhs)
    }

    pub fn concat(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Concat, rhs)
    }

    pub fn and(self, rhs: Expr) -> Expr {
        Expr::and_all([self, rhs])
    }

    pub fn or(self, rhs: Expr) -> Expr {
        Expr::Or(vec![self, rhs])
    }

    pub fn negate(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn in_list(self, list: Vec<Expr>) -> Expr {
        Expr::InList {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    pub fn in_subquery(self, subquery: Select) -> Expr {
        Expr::InSubquery {
            expr: Box::new(self),
            subquery: Box::new(subquery),
            negated: false,
        }
    }

    pub fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    pub fn cast(self, data_type: impl Into<String>) -> Expr {
        Expr::Cast {
            expr: Box::new(self),
            data_type: data_type.into(),
        }
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::Column(column)
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(Literal::Integer(value.into()))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(Literal::Boolean(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(Literal::String(value.to_string()))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}
