//! `Table(T1, ..., Tn)` predicates
//!
//! A `TableType` holds a set of column-level scitypes. A table scitype
//! `Table{K}` matches when every scitype in the column union `K` is a subtype
//! of `Union{T1, ..., Tn}`. Column order and count play no part.

use crate::{ScientificType, TypeError, TypeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set of admissible column scitypes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableType {
    members: Vec<ScientificType>,
}

impl TableType {
    /// Create a table type
    ///
    /// Fails with `InvalidScitype` for members that cannot describe a table
    /// column (arrays and tuples).
    pub fn new(members: impl IntoIterator<Item = ScientificType>) -> TypeResult<Self> {
        let members: Vec<ScientificType> = members.into_iter().collect();
        if let Some(bad) = members.iter().find(|t| !t.is_column_scitype()) {
            return Err(TypeError::InvalidScitype {
                scitype: bad.to_string(),
                reason: "not a column scientific type".to_string(),
            });
        }
        Ok(Self { members })
    }

    /// Parse members from their textual form
    pub fn parse<'a>(members: impl IntoIterator<Item = &'a str>) -> TypeResult<Self> {
        let members = members
            .into_iter()
            .map(|member| member.parse::<ScientificType>())
            .collect::<TypeResult<Vec<ScientificType>>>()?;
        Self::new(members)
    }

    pub fn members(&self) -> &[ScientificType] {
        &self.members
    }

    /// `Union{T1, ..., Tn}`
    pub fn as_union(&self) -> ScientificType {
        ScientificType::union_of(self.members.iter().cloned())
    }

    /// Check whether a single column scitype is admitted
    pub fn admits(&self, column: &ScientificType) -> bool {
        column.is_subtype_of(&self.as_union())
    }

    /// Check a table scitype against this table type
    ///
    /// Non-table scitypes never match.
    pub fn matches(&self, scitype: &ScientificType) -> bool {
        scitype
            .table_columns()
            .is_some_and(|columns| self.admits(columns))
    }

    /// Check column scitypes one by one
    pub fn matches_columns<'a>(
        &self,
        columns: impl IntoIterator<Item = &'a ScientificType>,
    ) -> bool {
        let union = self.as_union();
        columns.into_iter().all(|column| column.is_subtype_of(&union))
    }

    /// The table scitype with column union `Union{T1, ..., Tn}`
    pub fn scitype(&self) -> ScientificType {
        ScientificType::table(self.as_union())
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table(")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", member)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScientificType::*;

    #[test]
    fn test_rejects_structural_members() {
        let err = TableType::new([Continuous, ScientificType::vector(Count)]).unwrap_err();
        assert!(matches!(err, TypeError::InvalidScitype { .. }));
        assert!(TableType::new([ScientificType::tuple(vec![Count])]).is_err());
    }

    #[test]
    fn test_existential_per_column() {
        let table = ScientificType::table(ScientificType::union_of([Continuous, Count]));

        // order and count do not matter
        assert!(TableType::new([Count, Continuous]).unwrap().matches(&table));
        assert!(TableType::new([Continuous, Count, Textual]).unwrap().matches(&table));
        assert!(TableType::new([Infinite]).unwrap().matches(&table));

        assert!(!TableType::new([Continuous]).unwrap().matches(&table));
        assert!(!TableType::new([Continuous, Count]).unwrap().matches(&Count));
    }

    #[test]
    fn test_missing_must_be_admitted() {
        let table = ScientificType::table(Continuous.with_missing());
        assert!(!TableType::new([Continuous]).unwrap().matches(&table));
        assert!(TableType::new([Continuous, Missing]).unwrap().matches(&table));
        assert!(
            TableType::new([Continuous.with_missing()])
                .unwrap()
                .matches(&table)
        );
    }

    #[test]
    fn test_empty_table_matches_anything() {
        let empty = ScientificType::table(ScientificType::bottom());
        assert!(TableType::new([Textual]).unwrap().matches(&empty));
        assert!(TableType::new([]).unwrap().matches(&empty));
    }

    #[test]
    fn test_parse_and_display() {
        let table_type = TableType::parse(["Multiclass{4}", "Union{Missing, Continuous}"]).unwrap();
        assert_eq!(
            table_type.to_string(),
            "Table(Multiclass{4}, Union{Missing, Continuous})"
        );
        assert!(TableType::parse(["Nope"]).is_err());
    }
}
