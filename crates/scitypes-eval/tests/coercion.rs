//! Coercion Tests
//!
//! Covers table and array coercion:
//! - Rule-targeted coercion and rule ordering
//! - Named columns taking precedence over rules
//! - In-place coercion, including a container that rejects a swap
//! - Categorical targets and level pools
//! - Conversion failures

use pretty_assertions::assert_eq;
use rstest::rstest;
use scitypes_eval::{
    ClassificationContext, CoercionOptions, CoercionSpec, ScitypeError, coerce_array,
    coerce_table, coerce_table_in_place, element_scitype, schema_of,
};
use scitypes_types::{
    ArrayValue, ColumnTable, Columns, Level, ScientificType, Tabular, TypeError, TypeResult, Value,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn ctx() -> ClassificationContext {
    ClassificationContext::default()
}

fn column<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> ArrayValue {
    values.into_iter().collect()
}

fn mixed_table() -> ColumnTable {
    ColumnTable::from_columns([
        ("id", column([1, 2, 3])),
        ("score", column([Some(4), None, Some(6)])),
        ("weight", column([1.5, 2.5, 3.5])),
        ("label", column(["b", "a", "b"])),
    ])
    .unwrap()
}

fn column_scitypes(table: &dyn Tabular) -> Vec<String> {
    schema_of(&ctx(), table)
        .unwrap()
        .scitypes()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Table that accepts one column swap and then refuses
#[derive(Debug, Clone)]
struct Brittle {
    inner: ColumnTable,
    swaps_left: usize,
}

impl Tabular for Brittle {
    fn container_name(&self) -> &str {
        "Brittle"
    }

    fn column_names(&self) -> Vec<String> {
        self.inner.column_names()
    }

    fn column(&self, name: &str) -> Option<&ArrayValue> {
        self.inner.column(name)
    }

    fn rebuild(&self, columns: Columns) -> TypeResult<Box<dyn Tabular>> {
        self.inner.rebuild(columns)
    }

    fn supports_in_place(&self) -> bool {
        true
    }

    fn set_column(&mut self, name: &str, column: ArrayValue) -> TypeResult<()> {
        if self.swaps_left == 0 {
            return Err(TypeError::UnsupportedOperation {
                container: "Brittle".to_string(),
                operation: format!("replacing `{}`", name),
            });
        }
        self.swaps_left -= 1;
        self.inner.set_column(name, column)
    }
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn test_rule_rewrites_matching_columns() {
    let table = mixed_table();
    let spec = CoercionSpec::new().rule(ScientificType::Count, ScientificType::Continuous);
    let out = coerce_table(&ctx(), &table, &spec, CoercionOptions::new()).unwrap();

    assert_eq!(
        column_scitypes(out.value.as_ref()),
        vec![
            "Continuous",
            "Union{Missing, Continuous}",
            "Continuous",
            "Textual"
        ]
    );
    // only the column holding missing values is lifted
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(
        out.diagnostics[0].location.as_ref().and_then(|l| l.column.as_deref()),
        Some("score")
    );
}

#[test]
fn test_first_rule_wins() {
    let table = mixed_table();
    let spec = CoercionSpec::new()
        .rule(ScientificType::Infinite, ScientificType::Textual)
        .rule(ScientificType::Count, ScientificType::Continuous);
    let out = coerce_table(&ctx(), &table, &spec, CoercionOptions::quiet()).unwrap();

    assert_eq!(
        column_scitypes(out.value.as_ref()),
        vec![
            "Textual",
            "Union{Missing, Textual}",
            "Textual",
            "Textual"
        ]
    );
}

#[test]
fn test_named_column_beats_rules() {
    let table = mixed_table();
    let spec = CoercionSpec::new()
        .column("id", ScientificType::Multiclass(None))
        .rule(ScientificType::Count, ScientificType::Continuous);
    let out = coerce_table(&ctx(), &table, &spec, CoercionOptions::quiet()).unwrap();

    let scitypes = column_scitypes(out.value.as_ref());
    assert_eq!(scitypes[0], "Multiclass{3}");
    assert_eq!(scitypes[1], "Union{Missing, Continuous}");
}

#[test]
fn test_empty_spec_is_identity() {
    let table = mixed_table();
    let out = coerce_table(&ctx(), &table, &CoercionSpec::new(), CoercionOptions::new()).unwrap();
    for name in table.column_names() {
        assert_eq!(out.value.column(&name), table.column(&name));
    }
    assert!(out.diagnostics.is_empty());
}

// ============================================================================
// In-place
// ============================================================================

#[test]
fn test_in_place_replaces_columns() {
    let mut table = mixed_table();
    let spec = CoercionSpec::new()
        .column("label", ScientificType::OrderedFactor(None))
        .column("score", ScientificType::Continuous);
    let out = coerce_table_in_place(&ctx(), &mut table, &spec, CoercionOptions::new()).unwrap();

    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(
        column_scitypes(&table),
        vec![
            "Count",
            "Union{Missing, Continuous}",
            "Continuous",
            "OrderedFactor{2}"
        ]
    );
}

#[test]
fn test_in_place_swap_failure_is_not_rolled_back() {
    let mut table = Brittle {
        inner: mixed_table(),
        swaps_left: 1,
    };
    let spec = CoercionSpec::new()
        .column("id", ScientificType::Continuous)
        .column("weight", ScientificType::Textual);

    let err = coerce_table_in_place(&ctx(), &mut table, &spec, CoercionOptions::new())
        .unwrap_err();
    assert!(err.is_unsupported());

    // the first swap already happened
    let scitypes = column_scitypes(&table);
    assert_eq!(scitypes[0], "Continuous");
    assert_eq!(scitypes[2], "Continuous");
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_three_distinct_strings_are_multiclass_three() {
    let array = column(["red", "green", "blue", "green"]);
    let out = coerce_array(
        &ctx(),
        &array,
        &ScientificType::Multiclass(None),
        CoercionOptions::new(),
    )
    .unwrap();
    assert_eq!(
        element_scitype(&ctx(), &out.value),
        ScientificType::multiclass(3)
    );
}

#[test]
fn test_integer_levels_sort_numerically() {
    let array = column([10, 2, 33]);
    let out = coerce_array(
        &ctx(),
        &array,
        &ScientificType::OrderedFactor(None),
        CoercionOptions::new(),
    )
    .unwrap();
    let Some(Value::Categorical(first)) = out.value.get(0) else {
        panic!("expected categorical values");
    };
    assert_eq!(
        first.pool().levels(),
        &[Level::Integer(2), Level::Integer(10), Level::Integer(33)]
    );
}

#[test]
fn test_categorical_back_to_count() {
    let ctx = ctx();
    let factor = coerce_array(
        &ctx,
        &column([3, 1, 3]),
        &ScientificType::Multiclass(None),
        CoercionOptions::new(),
    )
    .unwrap()
    .into_value();
    let counts = coerce_array(&ctx, &factor, &ScientificType::Count, CoercionOptions::new())
        .unwrap()
        .into_value();
    assert_eq!(counts, column([3, 1, 3]));
}

#[rstest]
#[case(column(["1.5", "x"]), ScientificType::Continuous)]
#[case(column([1.5]), ScientificType::Count)]
#[case(column([1]), ScientificType::ScientificDate)]
#[case(column(["a"]), ScientificType::Count)]
fn test_conversion_failures(#[case] array: ArrayValue, #[case] target: ScientificType) {
    let err = coerce_array(&ctx(), &array, &target, CoercionOptions::new()).unwrap_err();
    assert!(
        matches!(err, ScitypeError::CannotCoerce { .. }),
        "unexpected error {}",
        err
    );
}

#[test]
fn test_textual_uses_display_form() {
    let out = coerce_array(
        &ctx(),
        &column([Some(1.5), None]),
        &ScientificType::Textual,
        CoercionOptions::quiet(),
    )
    .unwrap();
    assert_eq!(out.value.values(), &[Value::from("1.5"), Value::Missing]);
}
