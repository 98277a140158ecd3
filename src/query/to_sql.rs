//! SQL text rendering, used to name queries in lint warnings.

use std::collections::HashSet;

use super::expr::{Expr, Literal};
use super::select::{Select, SelectItem, Statement};
use super::source::{FromSource, SourceId, Table};

pub trait ToSql {
    fn to_sql(&self) -> String;
}

impl ToSql for Statement {
    fn to_sql(&self) -> String {
        match self {
            Statement::Select(select) => select.to_sql(),
            Statement::Text(sql) => sql.clone(),
        }
    }
}

impl ToSql for Select {
    fn to_sql(&self) -> String {
        Renderer::default().select(self)
    }
}

impl ToSql for Expr {
    fn to_sql(&self) -> String {
        Renderer::default().expr(self)
    }
}

impl ToSql for FromSource {
    fn to_sql(&self) -> String {
        Renderer::default().from_source(self)
    }
}

impl ToSql for Literal {
    fn to_sql(&self) -> String {
        match self {
            Literal::Null => "NULL".to_string(),
            Literal::Boolean(true) => "true".to_string(),
            Literal::Boolean(false) => "false".to_string(),
            Literal::Integer(value) => value.to_string(),
            Literal::Float(value) => value.to_string(),
            Literal::String(value) => format!("'{}'", value.replace('\'', "''")),
        }
    }
}

/// Renders nested selects with the FROM list they have in their scope, so a
/// correlated table is not repeated inside the subquery's FROM clause.
#[derive(Debug, Default, Clone)]
pub(crate) struct Renderer {
    enclosing: HashSet<SourceId>,
}

impl Renderer {
    pub(crate) fn with_enclosing(enclosing: HashSet<SourceId>) -> Self {
        Renderer { enclosing }
    }

    pub(crate) fn select(&self, select: &Select) -> String {
        let froms = select.froms_in(&self.enclosing);

        let mut inner_scope = self.enclosing.clone();
        inner_scope.extend(froms.iter().flat_map(|f| f.leaves()).map(|s| s.id()));
        let inner = Renderer::with_enclosing(inner_scope);

        let items: Vec<String> = select
            .items()
            .iter()
            .map(|item| match item {
                SelectItem::Expr { expr, label: None } => inner.expr(expr),
                SelectItem::Expr {
                    expr,
                    label: Some(label),
                } => format!("{} AS {}", inner.expr(expr), label),
                SelectItem::AllColumns(source) => format!("{}.*", source.name()),
            })
            .collect();

        let mut sql = format!("SELECT {}", items.join(", "));
        if !froms.is_empty() {
            let rendered: Vec<String> = froms.iter().map(|f| inner.from_source(f)).collect();
            sql.push_str(&format!(" FROM {}", rendered.join(", ")));
        }
        if let Some(where_clause) = select.where_clause() {
            sql.push_str(&format!(" WHERE {}", inner.expr(where_clause)));
        }
        sql
    }

    pub(crate) fn from_source(&self, from: &FromSource) -> String {
        match from {
            FromSource::Table(table) => render_table(table),
            FromSource::Subquery(subquery) => {
                // Only lateral subqueries see the sources around them.
                let body = if subquery.is_lateral() {
                    self.select(subquery.select())
                } else {
                    Renderer::default().select(subquery.select())
                };
                let lateral = if subquery.is_lateral() { "LATERAL " } else { "" };
                format!("{}({}) AS {}", lateral, body, subquery.name())
            }
            FromSource::Join(join) => {
                let mut sql = format!(
                    "{} {} {}",
                    self.from_source(join.left()),
                    join.kind().keyword(),
                    self.from_source(join.right())
                );
                if let Some(on) = join.on() {
                    sql.push_str(&format!(" ON {}", self.expr(on)));
                }
                sql
            }
        }
    }

    pub(crate) fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Column(column) => format!("{}.{}", column.owner().name(), column.name()),
            Expr::Literal(literal) => literal.to_sql(),
            Expr::Parameter(name) => format!(":{}", name),
            Expr::Binary { op, left, right } => format!(
                "{} {} {}",
                self.operand(left),
                op.symbol(),
                self.operand(right)
            ),
            Expr::And(terms) => self.junction(terms, " AND "),
            Expr::Or(terms) => self.junction(terms, " OR "),
            Expr::Not(inner) => format!("NOT ({})", self.expr(inner)),
            Expr::IsNull { expr, negated } => format!(
                "{} IS {}NULL",
                self.operand(expr),
                if *negated { "NOT " } else { "" }
            ),
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let items: Vec<String> = list.iter().map(|item| self.expr(item)).collect();
                format!(
                    "{} {}IN ({})",
                    self.operand(expr),
                    if *negated { "NOT " } else { "" },
                    items.join(", ")
                )
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => format!(
                "{} {}BETWEEN {} AND {}",
                self.operand(expr),
                if *negated { "NOT " } else { "" },
                self.operand(low),
                self.operand(high)
            ),
            Expr::Function { name, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.expr(arg)).collect();
                format!("{}({})", name, args.join(", "))
            }
            Expr::Case {
                operand,
                when_then,
                else_expr,
            } => {
                let mut sql = "CASE".to_string();
                if let Some(operand) = operand {
                    sql.push_str(&format!(" {}", self.expr(operand)));
                }
                for (when, then) in when_then {
                    sql.push_str(&format!(" WHEN {} THEN {}", self.expr(when), self.expr(then)));
                }
                if let Some(else_expr) = else_expr {
                    sql.push_str(&format!(" ELSE {}", self.expr(else_expr)));
                }
                sql.push_str(" END");
                sql
            }
            Expr::Cast { expr, data_type } => {
                format!("CAST({} AS {})", self.expr(expr), data_type)
            }
            Expr::Exists(select) => format!("EXISTS ({})", self.select(select)),
            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => format!(
                "{} {}IN ({})",
                self.operand(expr),
                if *negated { "NOT " } else { "" },
                self.select(subquery)
            ),
            Expr::ScalarSubquery(select) => format!("({})", self.select(select)),
        }
    }

    fn operand(&self, expr: &Expr) -> String {
        match expr {
            Expr::And(_) | Expr::Or(_) | Expr::Binary { .. } => format!("({})", self.expr(expr)),
            _ => self.expr(expr),
        }
    }

    fn junction(&self, terms: &[Expr], separator: &str) -> String {
        let rendered: Vec<String> = terms
            .iter()
            .map(|term| match term {
                Expr::And(_) | Expr::Or(_) => format!("({})", self.expr(term)),
                _ => self.expr(term),
            })
            .collect();
        rendered.join(separator)
    }
}

fn render_table(table: &Table) -> String {
    if table.is_alias() {
        format!("{} AS {}", table.base_name(), table.name())
    } else {
        table.name().to_string()
    }
}
