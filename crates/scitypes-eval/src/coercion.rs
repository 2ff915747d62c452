//! Scitype coercion
//!
//! Re-represents arrays and table columns so that their elements take a
//! requested scitype. Targets come from a `CoercionSpec`:
//! - column-targeted entries name a column and its target
//! - rules rewrite every other column whose scitype falls under `from`
//!
//! A column that may hold absent values keeps a missing-aware
//! representation even when the target does not mention `Missing`. This is
//! the missing lift; at verbosity 1 or above it is reported as an advisory.

use crate::classifier::element_scitype;
use crate::context::ClassificationContext;
use crate::error::{ScitypeError, ScitypeResult};
use indexmap::IndexMap;
use scitypes_diagnostics::{DataLocation, Diagnostic, SCI0300};
use scitypes_types::{ArrayValue, Columns, ElementType, ScientificType, Tabular, TableRef, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Configuration
// ============================================================================

/// Caller-supplied coercion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionOptions {
    /// 0 suppresses advisories, 1 and above emits them
    pub verbosity: u8,
    /// Request the narrowed representation; absent values become an error
    pub tight: bool,
}

impl Default for CoercionOptions {
    fn default() -> Self {
        Self {
            verbosity: 1,
            tight: false,
        }
    }
}

impl CoercionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with advisories suppressed
    pub fn quiet() -> Self {
        Self::default().with_verbosity(0)
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_tight(mut self, tight: bool) -> Self {
        self.tight = tight;
        self
    }

    fn emits_advisories(&self) -> bool {
        self.verbosity >= 1
    }
}

/// Coercion targets for a table
///
/// Named columns take precedence over rules. Rules are tried in order and
/// the first whose `Union{Missing, from}` contains the column scitype wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionSpec {
    /// Column name → target
    pub columns: IndexMap<String, ScientificType>,
    /// `(from, to)` rewrite rules
    pub rules: Vec<(ScientificType, ScientificType)>,
}

impl CoercionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column target
    pub fn column(mut self, name: impl Into<String>, target: ScientificType) -> Self {
        self.columns.insert(name.into(), target);
        self
    }

    /// Add a rewrite rule
    pub fn rule(mut self, from: ScientificType, to: ScientificType) -> Self {
        self.rules.push((from, to));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rules.is_empty()
    }

    /// Target for a column, if any
    pub fn target_for(&self, name: &str, current: &ScientificType) -> Option<&ScientificType> {
        if let Some(target) = self.columns.get(name) {
            return Some(target);
        }
        self.rules.iter().find_map(|(from, to)| {
            let matched = from.with_missing().is_supertype_of(current);
            log::trace!(
                "rule {} => {} {} column `{}` ({})",
                from,
                to,
                if matched { "matches" } else { "skips" },
                name,
                current
            );
            matched.then_some(to)
        })
    }
}

/// Result of a coercion together with its advisories
#[derive(Debug, Clone)]
pub struct CoercionOutcome<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> CoercionOutcome<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn has_advisories(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// Coerce an array so its elements take scitype `target`
///
/// Without `tight`, a nullable or partially absent array keeps a
/// missing-aware representation. With `tight`, the result is narrowed and any
/// absent value fails with `TightViolation`.
pub fn coerce_array(
    ctx: &ClassificationContext,
    array: &ArrayValue,
    target: &ScientificType,
    options: CoercionOptions,
) -> ScitypeResult<CoercionOutcome<ArrayValue>> {
    let mut diagnostics = Vec::new();
    let current = element_scitype(ctx, array);
    let value = coerce_column(ctx, None, array, &current, target, options, &mut diagnostics)?;
    Ok(CoercionOutcome { value, diagnostics })
}

fn check_target(target: &ScientificType) -> ScitypeResult<ScientificType> {
    let structural = target.members().iter().find(|member| {
        matches!(
            member,
            ScientificType::Array { .. }
                | ScientificType::Tuple(_)
                | ScientificType::Table(_)
                | ScientificType::Unknown
        )
    });
    if let Some(member) = structural {
        return Err(ScitypeError::invalid_scitype(
            target,
            format!("`{}` is not a coercion target", member.name()),
        ));
    }

    let narrow = target.without_missing();
    if narrow.is_bottom() {
        return Err(ScitypeError::invalid_scitype(
            target,
            "coercion target has no non-missing part",
        ));
    }
    Ok(narrow)
}

fn coerce_column(
    ctx: &ClassificationContext,
    name: Option<&str>,
    array: &ArrayValue,
    current: &ScientificType,
    target: &ScientificType,
    options: CoercionOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> ScitypeResult<ArrayValue> {
    let narrow = check_target(target)?;

    let nullable = if options.tight {
        if let Some(index) = array.first_missing() {
            return Err(ScitypeError::TightViolation {
                target: target.to_string(),
                index,
            });
        }
        false
    } else {
        if current.has_missing() && !target.has_missing() {
            let lifted = narrow.with_missing();
            let message = match name {
                Some(name) => format!(
                    "column `{}` may contain missing values; coercing to {} instead of {}",
                    name, lifted, target
                ),
                None => format!(
                    "array may contain missing values; coercing to {} instead of {}",
                    lifted, target
                ),
            };
            if options.emits_advisories() {
                log::warn!("{}", message);
                let mut diagnostic = Diagnostic::warning(SCI0300, message);
                if let Some(name) = name {
                    diagnostic = diagnostic.with_location(DataLocation::column(name));
                }
                diagnostics.push(diagnostic);
            }
        }
        current.has_missing() || target.has_missing()
    };

    // an all-missing column still needs the target's storage
    let present = current.without_missing();
    let (base, data) = if !present.is_bottom() && present.is_subtype_of(&narrow) {
        log::debug!(
            "{} already has scitype {}, keeping representation",
            name.unwrap_or("array"),
            present
        );
        (array.eltype().base, array.values().to_vec())
    } else {
        log::debug!(
            "coercing {} from {} to {} using the `{}` convention",
            name.unwrap_or("array"),
            current,
            narrow,
            ctx.convention().name()
        );
        let realised = ctx
            .convention()
            .realise(array.values(), &narrow)
            .map_err(|e| with_column(e, name))?;
        (realised.base, realised.data)
    };

    ArrayValue::from_parts(ElementType { base, nullable }, array.shape(), data)
        .map_err(ScitypeError::from)
}

/// Prefix a conversion failure with the column it happened in
fn with_column(error: ScitypeError, name: Option<&str>) -> ScitypeError {
    match (error, name) {
        (ScitypeError::CannotCoerce { value, target, reason }, Some(name)) => {
            ScitypeError::CannotCoerce {
                value,
                target,
                reason: format!("{} (column `{}`)", reason, name),
            }
        }
        (error, _) => error,
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Compute replacement columns in table order
fn stage_columns<T: Tabular + ?Sized>(
    ctx: &ClassificationContext,
    table: &T,
    spec: &CoercionSpec,
    options: CoercionOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> ScitypeResult<Vec<(String, ArrayValue)>> {
    let names = table.column_names();
    if let Some(missing) = spec.columns.keys().find(|name| !names.contains(name)) {
        return Err(ScitypeError::UnknownColumn {
            name: missing.clone(),
        });
    }

    let mut staged = Vec::new();
    for name in names {
        let Some(column) = table.column(&name) else {
            return Err(ScitypeError::UnknownColumn { name });
        };
        let current = element_scitype(ctx, column);
        let Some(target) = spec.target_for(&name, &current) else {
            continue;
        };
        let coerced = coerce_column(
            ctx,
            Some(&name),
            column,
            &current,
            target,
            options,
            diagnostics,
        )?;
        staged.push((name, coerced));
    }
    Ok(staged)
}

/// Coerce table columns, returning a new table
///
/// Columns without a target pass through unchanged; the input is not
/// modified. Naming a column that does not exist fails with `UnknownColumn`.
pub fn coerce_table<T: Tabular + ?Sized>(
    ctx: &ClassificationContext,
    table: &T,
    spec: &CoercionSpec,
    options: CoercionOptions,
) -> ScitypeResult<CoercionOutcome<Box<dyn Tabular>>> {
    let mut diagnostics = Vec::new();
    let mut staged: IndexMap<String, ArrayValue> =
        stage_columns(ctx, table, spec, options, &mut diagnostics)?
            .into_iter()
            .collect();

    let mut columns = Columns::new();
    for name in table.column_names() {
        let column = match staged.swap_remove(&name) {
            Some(coerced) => coerced,
            None => table
                .column(&name)
                .cloned()
                .ok_or_else(|| ScitypeError::UnknownColumn { name: name.clone() })?,
        };
        columns.insert(name, column);
    }

    let value = table.rebuild(columns)?;
    Ok(CoercionOutcome { value, diagnostics })
}

/// Coerce a table value, returning a new table value
///
/// Fails with `NotTabular` for values without the tabular capability.
pub fn coerce(
    ctx: &ClassificationContext,
    value: &Value,
    spec: &CoercionSpec,
    options: CoercionOptions,
) -> ScitypeResult<CoercionOutcome<Value>> {
    let table = value.as_tabular().ok_or_else(|| ScitypeError::NotTabular {
        found: value.storage_type().to_string(),
    })?;
    let CoercionOutcome { value, diagnostics } = coerce_table(ctx, table, spec, options)?;
    let table: TableRef = Arc::from(value);
    Ok(CoercionOutcome {
        value: Value::Table(table),
        diagnostics,
    })
}

/// Coerce table columns in place
///
/// Fails with `UnsupportedOperation`, leaving the table untouched, when the
/// container cannot replace columns. Every replacement column is computed
/// before the first swap, so conversion errors leave the table as it was.
/// Columns are then swapped one at a time; if the container rejects a swap,
/// columns swapped before it stay replaced.
pub fn coerce_table_in_place<T: Tabular + ?Sized>(
    ctx: &ClassificationContext,
    table: &mut T,
    spec: &CoercionSpec,
    options: CoercionOptions,
) -> ScitypeResult<CoercionOutcome<()>> {
    if !table.supports_in_place() {
        return Err(ScitypeError::unsupported(
            table.container_name(),
            "in-place coercion",
        ));
    }

    let mut diagnostics = Vec::new();
    let staged = stage_columns(ctx, &*table, spec, options, &mut diagnostics)?;
    for (name, column) in staged {
        log::debug!("replacing column `{}` in place", name);
        table.set_column(&name, column)?;
    }
    Ok(CoercionOutcome {
        value: (),
        diagnostics,
    })
}
