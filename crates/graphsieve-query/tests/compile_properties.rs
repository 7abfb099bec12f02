use graphsieve_core::{
    Direction, Error, FilterRequest, LogicalOperator, NodeFilter, OperatorKind, PropertyPredicate,
    PropertyValue, RelationshipFilter,
};
use graphsieve_query::{QueryAssembler, QueryTarget};
use proptest::prelude::*;

// Marker that never occurs in generated Cypher
const MARKER: char = '\u{1F9EA}';

fn operator() -> impl Strategy<Value = OperatorKind> {
    prop::sample::select(OperatorKind::ALL.to_vec())
}

fn hostile_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 '\"`;(){}$\\\\-]{0,24}".prop_map(|s| format!("{}{}", MARKER, s))
}

fn scalar() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        hostile_text().prop_map(PropertyValue::String),
        any::<i64>().prop_map(PropertyValue::Integer),
        any::<bool>().prop_map(PropertyValue::Boolean),
    ]
}

fn predicate() -> impl Strategy<Value = PropertyPredicate> {
    (
        "[a-zA-Z_`][a-zA-Z0-9_` ]{0,12}",
        operator(),
        scalar(),
        prop::collection::vec(scalar(), 0..4),
    )
        .prop_map(|(name, op, value, items)| {
            let value = match op {
                OperatorKind::In | OperatorKind::NotIn => PropertyValue::List(items),
                _ => value,
            };
            PropertyPredicate::new(name, op, value)
        })
}

fn logical() -> impl Strategy<Value = LogicalOperator> {
    prop_oneof![Just(LogicalOperator::And), Just(LogicalOperator::Or)]
}

fn node_filter() -> impl Strategy<Value = NodeFilter> {
    (
        prop::collection::vec("[A-Z][a-zA-Z`]{0,8}", 0..3),
        prop::collection::vec(predicate(), 0..4),
        logical(),
    )
        .prop_map(|(node_types, property_filters, logical_operator)| NodeFilter {
            node_types,
            property_filters,
            logical_operator,
        })
}

fn relationship_filter() -> impl Strategy<Value = RelationshipFilter> {
    (
        prop::collection::vec("[A-Z_]{1,10}", 0..3),
        prop_oneof![
            Just(Direction::Outgoing),
            Just(Direction::Incoming),
            Just(Direction::Both)
        ],
        0u32..3,
        1u32..4,
        prop::collection::vec(predicate(), 0..3),
        logical(),
    )
        .prop_map(|(types, direction, min, extra, property_filters, logical_operator)| {
            RelationshipFilter {
                relationship_types: types,
                direction,
                min_depth: min,
                max_depth: min.max(1) + extra - 1,
                property_filters,
                logical_operator,
            }
        })
}

fn request() -> impl Strategy<Value = FilterRequest> {
    (
        prop::option::of(node_filter()),
        prop::option::of(relationship_filter()),
        prop::option::of(node_filter()),
        prop::option::of(hostile_text()),
        1i64..=1000,
        0i64..10_000,
    )
        .prop_map(|(node_filter, relationship_filter, target_node_filter, search_query, limit, skip)| {
            FilterRequest {
                node_filter,
                relationship_filter,
                target_node_filter,
                search_query,
                limit,
                skip,
            }
        })
}

fn target() -> impl Strategy<Value = QueryTarget> {
    prop_oneof![Just(QueryTarget::Nodes), Just(QueryTarget::Relationships)]
}

fn expected_summary_lines(request: &FilterRequest, target: QueryTarget) -> usize {
    let node_lines = |f: &NodeFilter| usize::from(!f.node_types.is_empty()) + f.property_filters.len();

    let mut lines = request.node_filter.as_ref().map_or(0, node_lines);
    if target == QueryTarget::Relationships {
        if let Some(rel) = &request.relationship_filter {
            lines += usize::from(!rel.relationship_types.is_empty());
            lines += usize::from(rel.direction != Direction::Both);
            lines += usize::from(!rel.is_single_hop());
            lines += rel.property_filters.len();
        }
        lines += request.target_node_filter.as_ref().map_or(0, node_lines);
    }
    lines + usize::from(request.search_term().is_some())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn values_never_reach_query_text(request in request(), target in target()) {
        let compiled = QueryAssembler::default().assemble(&request, target).unwrap();
        prop_assert!(!compiled.query_text().contains(MARKER));
        prop_assert!(!compiled.count_text().contains(MARKER));
    }

    #[test]
    fn compilation_is_deterministic(request in request(), target in target()) {
        let assembler = QueryAssembler::default();
        let first = assembler.assemble(&request, target).unwrap();
        let second = assembler.assemble(&request, target).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn one_summary_line_per_constraint(request in request(), target in target()) {
        let compiled = QueryAssembler::default().assemble(&request, target).unwrap();
        prop_assert_eq!(compiled.active_filters().len(), expected_summary_lines(&request, target));
    }

    #[test]
    fn every_parameter_is_referenced(request in request(), target in target()) {
        let compiled = QueryAssembler::default().assemble(&request, target).unwrap();
        for name in compiled.parameters().keys() {
            let reference = format!("${}", name);
            let found = compiled
                .query_text()
                .match_indices(&reference)
                .any(|(at, _)| {
                    !compiled.query_text()[at + reference.len()..]
                        .starts_with(|c: char| c.is_ascii_digit())
                });
            prop_assert!(found, "parameter {} not referenced", name);
        }
    }

    #[test]
    fn single_hop_has_no_range(
        mut rel in relationship_filter(),
        direction in prop_oneof![Just(Direction::Outgoing), Just(Direction::Incoming), Just(Direction::Both)],
    ) {
        rel.min_depth = 1;
        rel.max_depth = 1;
        rel.direction = direction;
        let request = FilterRequest {
            relationship_filter: Some(rel),
            ..Default::default()
        };
        let compiled = QueryAssembler::default()
            .assemble(&request, QueryTarget::Relationships)
            .unwrap();
        let pattern = compiled.query_text().lines().next().unwrap_or_default().to_string();
        prop_assert!(pattern.starts_with("MATCH (n)"));
        prop_assert!(!pattern.contains('*'));
        prop_assert!(!compiled.query_text().contains("WITH n, m"));
    }

    #[test]
    fn empty_filters_add_no_where(limit in 1i64..=1000, skip in 0i64..100, target in target()) {
        let request = FilterRequest {
            node_filter: Some(NodeFilter::default()),
            target_node_filter: Some(NodeFilter::default()),
            limit,
            skip,
            ..Default::default()
        };
        let compiled = QueryAssembler::default().assemble(&request, target).unwrap();
        prop_assert!(!compiled.query_text().contains("WHERE"));
        prop_assert!(compiled.active_filters().is_empty());
    }

    #[test]
    fn names_with_escapes_never_reach_query_text(
        name in "[a-zA-Z_`\\\\u0-9 ]{1,16}",
        rel_type in "[A-Z_\\\\u0-9]{1,10}",
        target in target(),
    ) {
        let request = FilterRequest {
            node_filter: Some(NodeFilter {
                property_filters: vec![PropertyPredicate::new(name.clone(), OperatorKind::Equal, "a")],
                ..Default::default()
            }),
            relationship_filter: Some(RelationshipFilter {
                relationship_types: vec![rel_type.clone()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let rejected = name.trim().is_empty()
            || name.contains('\\')
            || (target == QueryTarget::Relationships && rel_type.contains('\\'));

        match QueryAssembler::default().assemble(&request, target) {
            Ok(compiled) => {
                prop_assert!(!rejected);
                prop_assert!(!compiled.query_text().contains('\\'));
            }
            Err(err) => {
                prop_assert!(rejected);
                prop_assert!(matches!(err, Error::Validation(_)));
            }
        }
    }
}
