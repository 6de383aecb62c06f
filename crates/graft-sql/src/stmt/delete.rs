use super::Expr;

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,
    pub filter: Expr,
}
