use super::*;
use crate::join::AliasMap;
use chrono::NaiveDate;
use relq_core::{entity, MetadataCache, SqlServerDialect, TableName};

entity! {
    pub struct Order in "Order" key id {
        pub id: i32 => "ID",
        pub order_date: NaiveDate => "OrderDate",
        pub note: Option<String> => "Note",
    }
}

entity! {
    pub struct Customer in "Customer" key id {
        pub id: i32 => "ID",
        pub name: String => "Name",
    }
}

fn aliases() -> AliasMap {
    let mut aliases = AliasMap::new(vec![TableName::try_new("Customer").unwrap()]);
    aliases.assign(&TableName::try_new("Order").unwrap(), "a".to_string());
    aliases.assign(&TableName::try_new("Customer").unwrap(), "b".to_string());
    aliases
}

fn comparison(column: ColumnRef, op: ComparisonOp, value: impl Into<SqlValue>) -> Comparison {
    Comparison {
        column,
        op,
        value: value.into(),
    }
}

/// Customer.Name = 'Tim' OR (Customer.Name = 'Julia' AND Order.ID = 5)
fn tim_or_julia() -> FilterTree {
    let mut tree = FilterTree::new();
    tree.push_comparison(comparison(
        ColumnRef::of(&Customer::name),
        ComparisonOp::Equal,
        "Tim",
    ));
    tree.push_connective(Connective::Or);
    tree.begin_group();
    tree.push_comparison(comparison(
        ColumnRef::of(&Customer::name),
        ComparisonOp::Equal,
        "Julia",
    ));
    tree.push_connective(Connective::And);
    tree.push_comparison(comparison(ColumnRef::of(&Order::id), ComparisonOp::Equal, 5));
    tree.end_group();
    tree
}

#[test]
fn test_operator_text() {
    let expected = [
        (ComparisonOp::Equal, "="),
        (ComparisonOp::NotEqual, "<>"),
        (ComparisonOp::LessThan, "<"),
        (ComparisonOp::LessThanOrEqual, "<="),
        (ComparisonOp::GreaterThan, ">"),
        (ComparisonOp::GreaterThanOrEqual, ">="),
        (ComparisonOp::Like, "LIKE"),
        (ComparisonOp::IsNull, "IS NULL"),
        (ComparisonOp::IsNotNull, "IS NOT NULL"),
    ];
    for (op, text) in expected {
        assert_eq!(op.sql(), text);
    }
    assert!(!ComparisonOp::IsNull.takes_operand());
    assert!(ComparisonOp::Like.takes_operand());
}

#[test]
fn test_render_parameterized_with_nested_group() {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let tree = tim_or_julia();
    let mut params = ParameterList::new();
    let sql = tree.closed().render(&scope, Some(&mut params)).unwrap();

    assert_eq!(
        sql,
        "b.[Name] = @0 OR (b.[Name] = @1 AND a.[ID] = @2)"
    );
    assert_eq!(
        params.into_vec(),
        vec![
            SqlValue::Text("Tim".into()),
            SqlValue::Text("Julia".into()),
            SqlValue::Int(5)
        ]
    );
}

#[test]
fn test_render_inline() {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let mut tree = tim_or_julia();
    tree.push_connective(Connective::And);
    tree.push_comparison(comparison(
        ColumnRef::of(&Order::order_date),
        ComparisonOp::GreaterThanOrEqual,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ));

    let sql = tree.closed().render(&scope, None).unwrap();
    assert_eq!(
        sql,
        "b.[Name] = 'Tim' OR (b.[Name] = 'Julia' AND a.[ID] = 5) AND a.[OrderDate] >= '2024-01-01'"
    );
}

#[test]
fn test_null_checks_consume_no_parameters() {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let mut tree = FilterTree::new();
    tree.push_comparison(comparison(
        ColumnRef::of(&Order::note),
        ComparisonOp::IsNull,
        SqlValue::Null,
    ));
    tree.push_connective(Connective::Or);
    tree.push_comparison(comparison(
        ColumnRef::of(&Order::note),
        ComparisonOp::Like,
        "%rush%",
    ));
    tree.push_connective(Connective::And);
    tree.push_comparison(comparison(
        ColumnRef::of(&Customer::name),
        ComparisonOp::IsNotNull,
        SqlValue::Null,
    ));

    let mut params = ParameterList::new();
    let sql = tree.closed().render(&scope, Some(&mut params)).unwrap();
    assert_eq!(
        sql,
        "a.[Note] IS NULL OR a.[Note] LIKE @0 AND b.[Name] IS NOT NULL"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn test_nesting_depth_is_preserved() {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let mut tree = FilterTree::new();
    assert_eq!(tree.begin_group().depth(), 1);
    assert_eq!(tree.begin_group().depth(), 2);
    tree.push_comparison(comparison(ColumnRef::of(&Order::id), ComparisonOp::LessThan, 3));
    tree.end_group();
    tree.end_group();

    let sql = tree.closed().render(&scope, None).unwrap();
    assert_eq!(sql, "((a.[ID] < 3))");
}

#[test]
fn test_open_groups_are_closed_for_rendering() {
    let mut tree = FilterTree::new();
    tree.push_comparison(comparison(ColumnRef::of(&Order::id), ComparisonOp::Equal, 1));
    tree.push_connective(Connective::Or);
    tree.begin_group();
    tree.push_comparison(comparison(ColumnRef::of(&Order::id), ComparisonOp::Equal, 2));
    assert_eq!(tree.open_depth(), 1);

    let closed = tree.closed();
    assert_eq!(closed.items.len(), 3);
    assert!(matches!(closed.items[2], FilterNode::Group(ref g) if g.items.len() == 1));
    // The tree itself is untouched
    assert_eq!(tree.open_depth(), 1);
}

#[test]
fn test_empty_nested_group_is_skipped() {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let mut tree = FilterTree::new();
    tree.begin_group();
    tree.end_group();
    assert!(!tree.is_empty());
    assert_eq!(tree.closed().render(&scope, None).unwrap(), "");
}

#[test]
fn test_unmatched_end_group() {
    let mut tree = FilterTree::new();
    assert!(tree.is_empty());
    tree.end_group();
    assert!(tree.is_unbalanced());
}

#[test]
fn test_unresolved_table_in_filter() {
    entity! {
        pub struct Product in "Product" key id {
            pub id: i32 => "ID",
        }
    }

    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };

    let mut tree = FilterTree::new();
    tree.push_comparison(comparison(ColumnRef::of(&Product::id), ComparisonOp::Equal, 1));
    let err = tree.closed().render(&scope, None).unwrap_err();
    assert!(matches!(err, crate::QueryError::UnresolvedTable { .. }));
}

fn render_inline(tree: &FilterTree) -> QueryResult<String> {
    let cache = MetadataCache::new();
    let aliases = aliases();
    let scope = Scope {
        provider: &cache,
        dialect: &SqlServerDialect,
        aliases: &aliases,
    };
    tree.closed().render(&scope, None)
}

fn id_equals(tree: &mut FilterTree, id: i32) {
    tree.push_comparison(comparison(ColumnRef::of(&Order::id), ComparisonOp::Equal, id));
}

#[test]
fn test_connective_before_empty_group_is_rejected() {
    let mut tree = FilterTree::new();
    id_equals(&mut tree, 1);
    tree.push_connective(Connective::And);
    tree.begin_group();
    tree.end_group();

    assert_eq!(
        render_inline(&tree).unwrap_err(),
        QueryError::DanglingConnective {
            connective: "AND".to_string()
        }
    );
}

#[test]
fn test_trailing_connective_is_rejected() {
    let mut tree = FilterTree::new();
    id_equals(&mut tree, 1);
    tree.push_connective(Connective::Or);

    let err = render_inline(&tree).unwrap_err();
    assert_eq!(
        err,
        QueryError::DanglingConnective {
            connective: "OR".to_string()
        }
    );
    assert!(err.to_string().starts_with("[Q006]"));
}

#[test]
fn test_leading_and_doubled_connectives_are_rejected() {
    let mut leading = FilterTree::new();
    leading.push_connective(Connective::And);
    id_equals(&mut leading, 1);
    assert!(matches!(
        render_inline(&leading),
        Err(QueryError::DanglingConnective { .. })
    ));

    let mut doubled = FilterTree::new();
    id_equals(&mut doubled, 1);
    doubled.push_connective(Connective::And);
    doubled.push_connective(Connective::Or);
    id_equals(&mut doubled, 2);
    assert_eq!(
        render_inline(&doubled).unwrap_err(),
        QueryError::DanglingConnective {
            connective: "OR".to_string()
        }
    );
}

#[test]
fn test_dangling_connective_inside_nested_group() {
    let mut tree = FilterTree::new();
    id_equals(&mut tree, 1);
    tree.push_connective(Connective::Or);
    tree.begin_group();
    id_equals(&mut tree, 2);
    tree.push_connective(Connective::And);
    tree.end_group();

    assert!(matches!(
        render_inline(&tree),
        Err(QueryError::DanglingConnective { .. })
    ));
}

#[test]
fn test_adjacent_predicates_are_rejected() {
    let mut tree = FilterTree::new();
    id_equals(&mut tree, 1);
    tree.begin_group();
    id_equals(&mut tree, 2);
    tree.end_group();

    assert_eq!(
        render_inline(&tree).unwrap_err(),
        QueryError::MissingConnective
    );
}

#[test]
fn test_empty_group_between_connected_predicates() {
    let mut tree = FilterTree::new();
    tree.begin_group();
    tree.end_group();
    id_equals(&mut tree, 1);
    tree.push_connective(Connective::And);
    id_equals(&mut tree, 2);

    assert_eq!(
        render_inline(&tree).unwrap(),
        "a.[ID] = 1 AND a.[ID] = 2"
    );
}
