//! Scitype conventions
//!
//! A convention decides which scitype a scalar value has and how an array is
//! re-represented so that its elements take a requested scitype. Exactly one
//! convention is active in a `ClassificationContext`.

use crate::error::{ScitypeError, ScitypeResult};
use scitypes_types::{
    CategoricalPool, CategoricalValue, Level, ScientificType, StorageType, Value,
};
use std::fmt;
use std::sync::Arc;

/// Converted array contents
///
/// Absent values keep their positions; `base` is the storage type of every
/// present element.
#[derive(Debug, Clone, PartialEq)]
pub struct Realised {
    pub base: StorageType,
    pub data: Vec<Value>,
}

/// Scalar classification and array realisation rules
pub trait Convention: fmt::Debug + Send + Sync {
    /// Name of the convention
    fn name(&self) -> &str;

    /// Scitype of a scalar value; `Unknown` when no rule applies
    fn scitype(&self, value: &Value) -> ScientificType;

    /// Scitype implied by a declared storage type
    ///
    /// Used for arrays with no present element to classify.
    fn storage_scitype(&self, _base: StorageType) -> ScientificType {
        ScientificType::Unknown
    }

    /// Re-represent `values` so every present element has scitype `target`
    ///
    /// `target` never contains `Missing`; absent elements are passed through.
    fn realise(&self, values: &[Value], target: &ScientificType) -> ScitypeResult<Realised>;
}

/// The built-in convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultConvention;

impl DefaultConvention {
    pub const NAME: &'static str = "default";
}

impl Convention for DefaultConvention {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn scitype(&self, value: &Value) -> ScientificType {
        match value {
            Value::Missing => ScientificType::Missing,
            Value::Float(_) | Value::Decimal(_) => ScientificType::Continuous,
            Value::Integer(_) | Value::Boolean(_) => ScientificType::Count,
            Value::Text(_) => ScientificType::Textual,
            Value::Date(_) => ScientificType::ScientificDate,
            Value::Time(_) => ScientificType::ScientificTime,
            Value::DateTime(_) => ScientificType::ScientificDateTime,
            Value::Categorical(c) if c.is_ordered() => {
                ScientificType::ordered_factor(c.cardinality())
            }
            Value::Categorical(c) => ScientificType::multiclass(c.cardinality()),
            Value::Image(image) if image.is_gray() => {
                ScientificType::gray_image(image.width(), image.height())
            }
            Value::Image(image) => ScientificType::color_image(image.width(), image.height()),
            _ => ScientificType::Unknown,
        }
    }

    fn storage_scitype(&self, base: StorageType) -> ScientificType {
        match base {
            StorageType::Float64 | StorageType::Decimal => ScientificType::Continuous,
            StorageType::Int64 | StorageType::Bool => ScientificType::Count,
            StorageType::Text => ScientificType::Textual,
            StorageType::Date => ScientificType::ScientificDate,
            StorageType::Time => ScientificType::ScientificTime,
            StorageType::DateTime => ScientificType::ScientificDateTime,
            StorageType::Categorical { ordered: true } => ScientificType::OrderedFactor(None),
            StorageType::Categorical { ordered: false } => ScientificType::Multiclass(None),
            StorageType::GrayImage => ScientificType::GrayImage(None),
            StorageType::ColorImage => ScientificType::ColorImage(None),
            _ => ScientificType::Unknown,
        }
    }

    fn realise(&self, values: &[Value], target: &ScientificType) -> ScitypeResult<Realised> {
        match target {
            ScientificType::Continuous => Ok(Realised {
                base: StorageType::Float64,
                data: map_present(values, |v| to_float(v, target))?,
            }),
            ScientificType::Count => Ok(Realised {
                base: StorageType::Int64,
                data: map_present(values, |v| to_integer(v, target))?,
            }),
            ScientificType::Textual => Ok(Realised {
                base: StorageType::Text,
                data: map_present(values, |v| Ok(to_text(v)))?,
            }),
            ScientificType::Multiclass(n) => to_categorical(values, target, *n, false),
            ScientificType::OrderedFactor(n) => to_categorical(values, target, *n, true),
            _ => {
                let first = values.iter().find(|v| !v.is_missing());
                Err(ScitypeError::cannot_coerce(
                    first.map_or_else(|| "array".to_string(), ToString::to_string),
                    target,
                    "no conversion to this scientific type",
                ))
            }
        }
    }
}

fn map_present(
    values: &[Value],
    convert: impl Fn(&Value) -> ScitypeResult<Value>,
) -> ScitypeResult<Vec<Value>> {
    values
        .iter()
        .map(|v| if v.is_missing() { Ok(Value::Missing) } else { convert(v) })
        .collect()
}

/// Strip a categorical wrapper down to its level's plain value
fn plain(value: &Value) -> Value {
    match value {
        Value::Categorical(c) => c.level().to_value(),
        other => other.clone(),
    }
}

fn to_float(value: &Value, target: &ScientificType) -> ScitypeResult<Value> {
    let plain = plain(value);
    let converted = match &plain {
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    };
    converted
        .map(Value::Float)
        .ok_or_else(|| ScitypeError::cannot_coerce(value, target, "not a number"))
}

fn to_integer(value: &Value, target: &ScientificType) -> ScitypeResult<Value> {
    let plain = plain(value);
    let converted = match &plain {
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        other => other.as_i64(),
    };
    converted.map(Value::Integer).ok_or_else(|| {
        let reason = if plain.as_f64().is_some() {
            "not an integral value"
        } else {
            "not a number"
        };
        ScitypeError::cannot_coerce(value, target, reason)
    })
}

fn to_text(value: &Value) -> Value {
    match value {
        Value::Text(_) => value.clone(),
        other => Value::Text(other.to_string()),
    }
}

fn to_categorical(
    values: &[Value],
    target: &ScientificType,
    expected: Option<usize>,
    ordered: bool,
) -> ScitypeResult<Realised> {
    let pool = Arc::new(level_pool(values, target)?.with_ordered(ordered));

    if let Some(n) = expected {
        if n != pool.len() {
            return Err(ScitypeError::CardinalityMismatch {
                target: target.to_string(),
                found: pool.len(),
            });
        }
    }

    let data = map_present(values, |v| {
        Level::from_value(v)
            .and_then(|level| CategoricalValue::new(pool.clone(), &level))
            .map(Value::Categorical)
            .ok_or_else(|| ScitypeError::cannot_coerce(v, target, "not a categorical level"))
    })?;

    Ok(Realised {
        base: StorageType::Categorical { ordered },
        data,
    })
}

/// Level pool for a categorical target
///
/// Categorical sources drawing from a single pool keep it, including levels
/// that are not present. Anything else gets the sorted distinct values.
fn level_pool(values: &[Value], target: &ScientificType) -> ScitypeResult<CategoricalPool> {
    let mut present = values.iter().filter(|v| !v.is_missing()).peekable();

    if let Some(Value::Categorical(first)) = present.peek() {
        let shared = first.pool().clone();
        if values.iter().all(|v| match v {
            Value::Missing => true,
            Value::Categorical(c) => Arc::ptr_eq(c.pool(), &shared) || c.pool() == &shared,
            _ => false,
        }) {
            return Ok((*shared).clone());
        }
    }

    let levels = present
        .map(|v| {
            Level::from_value(v)
                .ok_or_else(|| ScitypeError::cannot_coerce(v, target, "not a categorical level"))
        })
        .collect::<ScitypeResult<Vec<Level>>>()?;
    Ok(CategoricalPool::new(levels, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use scitypes_types::{ColorSpace, ImageValue};

    #[rstest]
    #[case(Value::from(1.5), ScientificType::Continuous)]
    #[case(Value::from(Decimal::new(15, 1)), ScientificType::Continuous)]
    #[case(Value::from(3), ScientificType::Count)]
    #[case(Value::from(true), ScientificType::Count)]
    #[case(Value::from("x"), ScientificType::Textual)]
    #[case(Value::Missing, ScientificType::Missing)]
    #[case(Value::Tuple(vec![]), ScientificType::Unknown)]
    fn test_scalar_rules(#[case] value: Value, #[case] expected: ScientificType) {
        assert_eq!(DefaultConvention.scitype(&value), expected);
    }

    #[rstest]
    #[case(StorageType::Float64, ScientificType::Continuous)]
    #[case(StorageType::Bool, ScientificType::Count)]
    #[case(StorageType::Categorical { ordered: false }, ScientificType::Multiclass(None))]
    #[case(StorageType::Categorical { ordered: true }, ScientificType::OrderedFactor(None))]
    #[case(StorageType::Missing, ScientificType::Unknown)]
    #[case(StorageType::Any, ScientificType::Unknown)]
    fn test_storage_rules(#[case] base: StorageType, #[case] expected: ScientificType) {
        assert_eq!(DefaultConvention.storage_scitype(base), expected);
    }

    #[test]
    fn test_realise_all_missing() {
        let values = vec![Value::Missing, Value::Missing];
        let realised = DefaultConvention
            .realise(&values, &ScientificType::Multiclass(None))
            .unwrap();
        assert_eq!(realised.base, StorageType::Categorical { ordered: false });
        assert_eq!(realised.data, values);
    }

    #[test]
    fn test_image_and_categorical_rules() {
        let gray = ImageValue::blank(4, 3, ColorSpace::Gray).unwrap();
        assert_eq!(
            DefaultConvention.scitype(&gray.into()),
            ScientificType::gray_image(4, 3)
        );

        let pool = Arc::new(CategoricalPool::new(
            [Level::Text("lo".into()), Level::Text("hi".into())],
            true,
        ));
        let value = CategoricalValue::new(pool, &Level::Text("lo".into())).unwrap();
        assert_eq!(
            DefaultConvention.scitype(&value.into()),
            ScientificType::ordered_factor(2)
        );
    }

    #[test]
    fn test_realise_continuous() {
        let values = vec![Value::from(1), Value::Missing, Value::from(" 2.5 ")];
        let realised = DefaultConvention
            .realise(&values, &ScientificType::Continuous)
            .unwrap();
        assert_eq!(realised.base, StorageType::Float64);
        assert_eq!(
            realised.data,
            vec![Value::from(1.0), Value::Missing, Value::from(2.5)]
        );
    }

    #[test]
    fn test_realise_count_rejects_fractions() {
        let ok = DefaultConvention
            .realise(&[Value::from(2.0), Value::from("7")], &ScientificType::Count)
            .unwrap();
        assert_eq!(ok.data, vec![Value::from(2), Value::from(7)]);

        let err = DefaultConvention
            .realise(&[Value::from(2.5)], &ScientificType::Count)
            .unwrap_err();
        assert!(matches!(err, ScitypeError::CannotCoerce { reason, .. } if reason == "not an integral value"));
    }

    #[test]
    fn test_realise_count_rejects_out_of_range() {
        let err = DefaultConvention
            .realise(&[Value::from(9.223372036854775807e18)], &ScientificType::Count)
            .unwrap_err();
        assert!(matches!(err, ScitypeError::CannotCoerce { .. }));
    }

    #[test]
    fn test_realise_categorical_levels_sorted() {
        let values: Vec<Value> = ["b", "a", "c", "a"].into_iter().map(Value::from).collect();
        let realised = DefaultConvention
            .realise(&values, &ScientificType::Multiclass(None))
            .unwrap();
        assert_eq!(realised.base, StorageType::Categorical { ordered: false });

        let Value::Categorical(first) = &realised.data[0] else {
            panic!("expected a categorical value");
        };
        assert_eq!(first.cardinality(), 3);
        assert_eq!(
            first.pool().levels(),
            &[
                Level::Text("a".into()),
                Level::Text("b".into()),
                Level::Text("c".into())
            ]
        );
    }

    #[test]
    fn test_realise_cardinality_mismatch() {
        let values: Vec<Value> = ["b", "a"].into_iter().map(Value::from).collect();
        let err = DefaultConvention
            .realise(&values, &ScientificType::multiclass(3))
            .unwrap_err();
        assert_eq!(
            err,
            ScitypeError::CardinalityMismatch {
                target: "Multiclass{3}".into(),
                found: 2,
            }
        );
    }

    #[test]
    fn test_categorical_source_keeps_pool() {
        let pool = Arc::new(CategoricalPool::new(
            [Level::Integer(1), Level::Integer(2), Level::Integer(3)],
            false,
        ));
        let values = vec![
            Value::from(CategoricalValue::new(pool.clone(), &Level::Integer(1)).unwrap()),
            Value::Missing,
        ];
        let realised = DefaultConvention
            .realise(&values, &ScientificType::ordered_factor(3))
            .unwrap();
        let Value::Categorical(first) = &realised.data[0] else {
            panic!("expected a categorical value");
        };
        assert!(first.is_ordered());
        assert_eq!(first.cardinality(), 3);
        assert_eq!(realised.data[1], Value::Missing);
    }

    #[test]
    fn test_realise_unsupported_target() {
        let err = DefaultConvention
            .realise(&[Value::from(1)], &ScientificType::ScientificDate)
            .unwrap_err();
        assert!(matches!(err, ScitypeError::CannotCoerce { .. }));
    }
}
