//! Scitype hierarchy tests
//!
//! Covers the subtype relation between the built-in scitypes, parameterised
//! finite and image scitypes, unions and the structural formers.

use pretty_assertions::assert_eq;
use rstest::rstest;
use scitypes_types::ScientificType::{self, *};

#[rstest]
#[case(Continuous, Infinite)]
#[case(Count, Infinite)]
#[case(Infinite, Known)]
#[case(Known, Found)]
#[case(Unknown, Found)]
#[case(Textual, Known)]
#[case(ScientificDate, ScientificTimeType)]
#[case(ScientificDateTime, ScientificTimeType)]
#[case(ScientificType::multiclass(3), Finite(None))]
#[case(ScientificType::multiclass(3), ScientificType::finite(3))]
#[case(ScientificType::ordered_factor(2), ScientificType::binary())]
#[case(ScientificType::multiclass(3), Multiclass(None))]
#[case(ScientificType::gray_image(4, 4), Image(None))]
#[case(ScientificType::color_image(4, 4), ScientificType::Image(ScientificType::color_image(4, 4).image_size()))]
#[case(Continuous, Continuous.with_missing())]
#[case(Missing, Continuous.with_missing())]
#[case(ScientificType::vector(Count), ScientificType::vector(Infinite))]
#[case(ScientificType::table(Count), ScientificType::table(Known))]
fn test_is_subtype(#[case] sub: ScientificType, #[case] sup: ScientificType) {
    assert!(sub.is_subtype_of(&sup), "{} <: {}", sub, sup);
    assert!(sup.is_supertype_of(&sub));
}

#[rstest]
#[case(Missing, Known)]
#[case(Missing, Found)]
#[case(Unknown, Known)]
#[case(Infinite, Continuous)]
#[case(Count, Continuous)]
#[case(ScientificType::multiclass(3), ScientificType::finite(4))]
#[case(ScientificType::multiclass(3), OrderedFactor(None))]
#[case(ScientificType::gray_image(4, 4), ScientificType::gray_image(4, 5))]
#[case(Continuous.with_missing(), Continuous)]
#[case(ScientificType::vector(Count), ScientificType::array(Count, 2))]
#[case(ScientificType::vector(Count), Known)]
fn test_is_not_subtype(#[case] sub: ScientificType, #[case] sup: ScientificType) {
    assert!(!sub.is_subtype_of(&sup), "{} </: {}", sub, sup);
}

#[test]
fn test_union_normalisation() {
    let union = ScientificType::union_of([Count, Continuous, Count, Missing]);
    assert_eq!(union, ScientificType::Union(vec![Missing, Continuous, Count]));

    // absorbed by a wider member
    assert_eq!(ScientificType::union_of([Count, Infinite]), Infinite);
    assert_eq!(
        ScientificType::union_of([ScientificType::multiclass(2), Finite(None)]),
        Finite(None)
    );

    // nested unions flatten
    let nested = ScientificType::union_of([Textual.with_missing(), Count]);
    assert_eq!(nested.members(), &[Missing, Count, Textual]);
}

#[test]
fn test_single_member_union_collapses() {
    assert_eq!(ScientificType::union_of([Textual]), Textual);
    assert!(ScientificType::union_of([]).is_bottom());
}

#[test]
fn test_missing_helpers() {
    let lifted = ScientificType::multiclass(4).with_missing();
    assert!(lifted.has_missing());
    assert_eq!(lifted.to_string(), "Union{Missing, Multiclass{4}}");
    assert_eq!(lifted.without_missing(), ScientificType::multiclass(4));
    assert!(Missing.without_missing().is_bottom());
    assert_eq!(lifted.with_missing(), lifted);
}

#[test]
fn test_cardinality_and_image_size() {
    assert_eq!(ScientificType::binary().cardinality(), Some(2));
    assert_eq!(Multiclass(None).cardinality(), None);
    assert_eq!(
        ScientificType::color_image(8, 6).image_size().map(|s| (s.width, s.height)),
        Some((8, 6))
    );
}

#[test]
fn test_column_scitypes() {
    assert!(Continuous.is_column_scitype());
    assert!(Continuous.with_missing().is_column_scitype());
    assert!(!ScientificType::vector(Count).is_column_scitype());
    assert!(!ScientificType::union_of([Count, ScientificType::tuple(vec![Count])]).is_column_scitype());
}
