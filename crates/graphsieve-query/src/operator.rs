//! Operator table
//!
//! Maps every filter operator to its Cypher fragment template and the value
//! shape it expects. Templates reference the property through `{property}`
//! and the bound value through `{param}`; caller values never reach the text.

use graphsieve_core::{Error, OperatorKind, Result};

/// Shape of the value an operator binds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A single scalar
    Scalar,
    /// A list of scalars, bound as one parameter
    Sequence,
}

/// One row of the operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSpec {
    pub operator: OperatorKind,
    pub template: &'static str,
    pub arity: Arity,
}

const OPERATOR_TABLE: [OperatorSpec; 12] = [
    OperatorSpec { operator: OperatorKind::Equal, template: "{property} = {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::NotEqual, template: "{property} <> {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::GreaterThan, template: "{property} > {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::GreaterOrEqual, template: "{property} >= {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::LessThan, template: "{property} < {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::LessOrEqual, template: "{property} <= {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::Contains, template: "{property} CONTAINS {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::StartsWith, template: "{property} STARTS WITH {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::EndsWith, template: "{property} ENDS WITH {param}", arity: Arity::Scalar },
    OperatorSpec { operator: OperatorKind::In, template: "{property} IN {param}", arity: Arity::Sequence },
    OperatorSpec { operator: OperatorKind::NotIn, template: "NOT {property} IN {param}", arity: Arity::Sequence },
    // No implicit anchoring: Cypher `=~` already matches the whole string,
    // and the pattern is bound exactly as sent.
    OperatorSpec { operator: OperatorKind::RegexMatch, template: "{property} =~ {param}", arity: Arity::Scalar },
];

/// Find the table row for `operator`
pub fn lookup(operator: OperatorKind) -> Result<&'static OperatorSpec> {
    OPERATOR_TABLE
        .iter()
        .find(|spec| spec.operator == operator)
        .ok_or_else(|| Error::UnsupportedOperator(operator.symbol().to_string()))
}

impl OperatorSpec {
    /// Fill the template in a single pass.
    ///
    /// `accessor` is inserted verbatim and never rescanned, so a property
    /// name that happens to contain `{param}` cannot move the parameter slot.
    pub fn render(&self, accessor: &str, param: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + accessor.len() + param.len());
        let mut rest = self.template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let slot = &rest[start..];
            if let Some(tail) = slot.strip_prefix("{property}") {
                out.push_str(accessor);
                rest = tail;
            } else if let Some(tail) = slot.strip_prefix("{param}") {
                out.push('$');
                out.push_str(param);
                rest = tail;
            } else {
                out.push('{');
                rest = &slot[1..];
            }
        }
        out.push_str(rest);
        out
    }
}
