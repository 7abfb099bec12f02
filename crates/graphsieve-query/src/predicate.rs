//! Predicate compiler
//!
//! Turns one `PropertyPredicate` into a Cypher boolean fragment plus the
//! single parameter it binds.

use crate::operator::{self, Arity};
use crate::summary::render_value;
use graphsieve_core::{Error, PropertyPredicate, PropertyValue, Result};
use std::collections::BTreeMap;

/// Parameter bindings of a compiled query, keyed by parameter name
pub type Parameters = BTreeMap<String, PropertyValue>;

/// Hands out parameter names for one compile pass
#[derive(Debug, Default)]
pub struct ParamNamer {
    next: usize,
}

impl ParamNamer {
    /// Create a namer starting at `p0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused parameter name
    pub fn next_name(&mut self) -> String {
        let name = format!("p{}", self.next);
        self.next += 1;
        name
    }
}

/// Output of compiling one predicate
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    /// Boolean fragment, e.g. ``n.`age` > $p0``
    pub clause: String,

    /// Name of the bound parameter
    pub param_name: String,

    /// Value bound to `param_name`
    pub value: PropertyValue,

    /// Summary line, e.g. `age > 25`
    pub summary: String,
}

/// Backtick-quote an identifier, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// ``variable.`property` `` accessor
pub fn property_accessor(variable: &str, property: &str) -> String {
    format!("{}.{}", variable, quote_identifier(property))
}

/// Compile `predicate` against the entity bound to `variable`
pub fn compile(
    predicate: &PropertyPredicate,
    variable: &str,
    namer: &mut ParamNamer,
) -> Result<CompiledPredicate> {
    let spec = operator::lookup(predicate.operator)?;
    check_arity(predicate, spec.arity)?;

    let value = if predicate.operator.is_range() {
        coerce_numeric(&predicate.value)
    } else {
        predicate.value.clone()
    };

    let param_name = namer.next_name();
    let accessor = property_accessor(variable, &predicate.property_name);
    let clause = spec.render(&accessor, &param_name);
    let summary = format!(
        "{} {} {}",
        predicate.property_name,
        predicate.operator.symbol(),
        render_value(&value)
    );

    Ok(CompiledPredicate {
        clause,
        param_name,
        value,
        summary,
    })
}

fn check_arity(predicate: &PropertyPredicate, arity: Arity) -> Result<()> {
    let reason = match (arity, &predicate.value) {
        (Arity::Sequence, PropertyValue::List(items)) => {
            if items.iter().all(PropertyValue::is_scalar) {
                return Ok(());
            }
            "list elements must be scalars".to_string()
        }
        (Arity::Sequence, other) => {
            format!("operator {} expects a list, got {}", predicate.operator, other.type_name())
        }
        (Arity::Scalar, PropertyValue::List(_)) => {
            format!("operator {} expects a single value, got a list", predicate.operator)
        }
        (Arity::Scalar, _) => return Ok(()),
    };

    Err(Error::InvalidPredicate {
        property: predicate.property_name.clone(),
        reason,
    })
}

/// Range comparisons against numeric text compare as numbers
fn coerce_numeric(value: &PropertyValue) -> PropertyValue {
    if let PropertyValue::String(s) = value {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return PropertyValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return PropertyValue::Float(f);
            }
        }
    }
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsieve_core::OperatorKind;

    #[test]
    fn test_compile_comparison() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("age", OperatorKind::GreaterThan, 25i64);
        let compiled = compile(&predicate, "n", &mut namer).unwrap();

        assert_eq!(compiled.clause, "n.`age` > $p0");
        assert_eq!(compiled.param_name, "p0");
        assert_eq!(compiled.value, PropertyValue::Integer(25));
        assert_eq!(compiled.summary, "age > 25");
    }

    #[test]
    fn test_compile_membership_binds_whole_list() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("country", OperatorKind::In, vec!["USA", "Canada"]);
        let compiled = compile(&predicate, "n", &mut namer).unwrap();

        assert_eq!(compiled.clause, "n.`country` IN $p0");
        assert_eq!(compiled.value, PropertyValue::from(vec!["USA", "Canada"]));
        assert_eq!(namer.next_name(), "p1");
    }

    #[test]
    fn test_same_property_twice_gets_distinct_names() {
        let mut namer = ParamNamer::new();
        let low = PropertyPredicate::new("age", OperatorKind::GreaterOrEqual, 18i64);
        let high = PropertyPredicate::new("age", OperatorKind::LessThan, 65i64);

        let a = compile(&low, "n", &mut namer).unwrap();
        let b = compile(&high, "n", &mut namer).unwrap();
        assert_ne!(a.param_name, b.param_name);
    }

    #[test]
    fn test_scalar_to_membership_rejected() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("country", OperatorKind::In, "USA");
        let err = compile(&predicate, "n", &mut namer).unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate { ref property, .. } if property == "country"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_list_to_scalar_operator_rejected() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("name", OperatorKind::Equal, vec!["a"]);
        assert!(compile(&predicate, "n", &mut namer).is_err());
    }

    #[test]
    fn test_nested_list_rejected() {
        let mut namer = ParamNamer::new();
        let nested = PropertyValue::List(vec![PropertyValue::from(vec![1i64])]);
        let predicate = PropertyPredicate::new("ids", OperatorKind::NotIn, nested);
        assert!(compile(&predicate, "n", &mut namer).is_err());
    }

    #[test]
    fn test_range_coerces_numeric_text() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("age", OperatorKind::LessOrEqual, "40");
        let compiled = compile(&predicate, "n", &mut namer).unwrap();
        assert_eq!(compiled.value, PropertyValue::Integer(40));

        let predicate = PropertyPredicate::new("score", OperatorKind::GreaterThan, "2.5");
        let compiled = compile(&predicate, "n", &mut namer).unwrap();
        assert_eq!(compiled.value, PropertyValue::Float(2.5));

        let predicate = PropertyPredicate::new("name", OperatorKind::GreaterThan, "M");
        let compiled = compile(&predicate, "n", &mut namer).unwrap();
        assert_eq!(compiled.value, PropertyValue::from("M"));
    }

    #[test]
    fn test_equality_keeps_text() {
        let mut namer = ParamNamer::new();
        let predicate = PropertyPredicate::new("code", OperatorKind::Equal, "007");
        let compiled = compile(&predicate, "n", &mut namer).unwrap();
        assert_eq!(compiled.value, PropertyValue::from("007"));
    }

    #[test]
    fn test_quote_identifier_escapes_backticks() {
        assert_eq!(quote_identifier("weird`name"), "`weird``name`");
        assert_eq!(property_accessor("r", "since"), "r.`since`");
    }

    #[test]
    fn test_escaped_name_rejected_before_quoting() {
        let predicate = PropertyPredicate::new(r"x\u0060 = 1 OR n.\u0060y", OperatorKind::Equal, 1i64);
        let request = graphsieve_core::FilterRequest {
            node_filter: Some(graphsieve_core::NodeFilter {
                property_filters: vec![predicate],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(&graphsieve_core::RequestLimits::default()),
            Err(Error::Validation(_))
        ));
    }
}
