//! Scitype classification
//!
//! `scitype` dispatches on the resolved kind of a value:
//! - `table`: `Table{K}` where `K` is the union of the column scitypes
//! - a kind with a registered classifier: that classifier
//! - `other`: tuples positionally, arrays by element union and rank, scalars
//!   through the active convention

use crate::context::ClassificationContext;
use crate::error::{ScitypeError, ScitypeResult};
use crate::registry::Kind;
use scitypes_types::{ArrayValue, ScientificType, Tabular, Value};

/// Scientific type of a value
pub fn scitype(ctx: &ClassificationContext, value: &Value) -> ScientificType {
    if value.is_missing() {
        return ScientificType::Missing;
    }

    let kind = ctx.resolve_kind(value);
    if kind == Kind::TABLE {
        if let Some(table) = value.as_tabular() {
            return table_scitype(ctx, table);
        }
    }
    if let Some(classifier) = ctx.kind_classifier(&kind) {
        return classifier(value, ctx);
    }

    match value {
        Value::Tuple(items) => {
            ScientificType::tuple(items.iter().map(|item| scitype(ctx, item)).collect())
        }
        Value::Array(array) => ScientificType::array(element_scitype(ctx, array), array.rank()),
        scalar => ctx.convention().scitype(scalar),
    }
}

/// Union of the scitypes of every value
///
/// Fails with `EmptySequence` on an empty sequence.
pub fn scitype_union<'a>(
    ctx: &ClassificationContext,
    values: impl IntoIterator<Item = &'a Value>,
) -> ScitypeResult<ScientificType> {
    let mut values = values.into_iter();
    let first = values.next().ok_or(ScitypeError::EmptySequence)?;
    Ok(values.fold(scitype(ctx, first), |acc, value| {
        acc.union(&scitype(ctx, value))
    }))
}

/// Scitype of the elements of an array
///
/// `Missing` is included when the element type is nullable, even if no
/// element is absent. An empty array has element scitype `Unknown`. When
/// every element is absent, the declared storage type supplies the rest.
pub fn element_scitype(ctx: &ClassificationContext, array: &ArrayValue) -> ScientificType {
    let element = match scitype_union(ctx, array.iter()) {
        Ok(union) if union.without_missing().is_bottom() => {
            match ctx.convention().storage_scitype(array.eltype().base) {
                ScientificType::Unknown => union,
                declared => union.union(&declared),
            }
        }
        Ok(union) => union,
        Err(_) => ScientificType::Unknown,
    };
    if array.eltype().nullable {
        element.with_missing()
    } else {
        element
    }
}

/// `Table{K}` for a tabular container
pub fn table_scitype(ctx: &ClassificationContext, table: &dyn Tabular) -> ScientificType {
    let columns = table
        .column_names()
        .iter()
        .filter_map(|name| table.column(name))
        .map(|column| element_scitype(ctx, column))
        .collect::<Vec<_>>();
    ScientificType::table(ScientificType::union_of(columns))
}
