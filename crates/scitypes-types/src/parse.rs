//! Textual scitype expressions
//!
//! Parses the canonical form produced by `Display`, e.g. `Multiclass{3}`,
//! `Union{Missing, Continuous}`, `AbstractVector{Count}`, `Binary`.
//! The grammar is parsed into a small syntax tree first, which is then
//! checked against the hierarchy.

use crate::{ImageSize, ScientificType, TypeError};
use std::str::FromStr;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, opt, separated};
use winnow::prelude::*;
use winnow::token::take_while;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(usize),
    Type { name: String, args: Option<Vec<Node>> },
}

fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<Node> {
    digit1.parse_to::<usize>().map(Node::Number).parse_next(input)
}

fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

fn arguments(input: &mut &str) -> ModalResult<Vec<Node>> {
    delimited(
        ('{', ws),
        separated(0.., node, (ws, ',', ws)),
        (ws, '}'),
    )
    .parse_next(input)
}

fn type_node(input: &mut &str) -> ModalResult<Node> {
    let name = identifier(input)?;
    ws(input)?;
    let args = opt(arguments).parse_next(input)?;
    Ok(Node::Type {
        name: name.to_string(),
        args,
    })
}

fn node(input: &mut &str) -> ModalResult<Node> {
    alt((number, type_node)).parse_next(input)
}

fn expression(input: &mut &str) -> ModalResult<Node> {
    delimited(ws, type_node, ws).parse_next(input)
}

/// Parse a scitype expression
pub fn parse_scitype(source: &str) -> Result<ScientificType, TypeError> {
    let tree = expression
        .parse(source)
        .map_err(|e| TypeError::MalformedScitype {
            input: source.to_string(),
            message: e.to_string(),
        })?;
    build(&tree, source)
}

fn build(node: &Node, source: &str) -> Result<ScientificType, TypeError> {
    let invalid = |reason: String| TypeError::InvalidScitype {
        scitype: source.to_string(),
        reason,
    };

    let (name, args) = match node {
        Node::Number(n) => return Err(invalid(format!("expected a scitype, found `{}`", n))),
        Node::Type { name, args } => (name.as_str(), args.as_deref()),
    };

    let types = |args: &[Node]| -> Result<Vec<ScientificType>, TypeError> {
        args.iter().map(|a| build(a, source)).collect()
    };

    let scitype = match (name, args) {
        ("Missing", None) => ScientificType::Missing,
        ("Unknown", None) => ScientificType::Unknown,
        ("Found", None) => ScientificType::Found,
        ("Known", None) => ScientificType::Known,
        ("Infinite", None) => ScientificType::Infinite,
        ("Continuous", None) => ScientificType::Continuous,
        ("Count", None) => ScientificType::Count,
        ("Textual", None) => ScientificType::Textual,
        ("ScientificTimeType", None) => ScientificType::ScientificTimeType,
        ("ScientificDate", None) => ScientificType::ScientificDate,
        ("ScientificTime", None) => ScientificType::ScientificTime,
        ("ScientificDateTime", None) => ScientificType::ScientificDateTime,
        ("Binary", None) => ScientificType::binary(),

        ("Finite" | "Multiclass" | "OrderedFactor", args) => {
            let n = match args {
                None => None,
                Some([Node::Number(n)]) => Some(*n),
                Some(_) => {
                    return Err(invalid(format!("`{}` takes a single class count", name)));
                }
            };
            match name {
                "Finite" => ScientificType::Finite(n),
                "Multiclass" => ScientificType::Multiclass(n),
                _ => ScientificType::OrderedFactor(n),
            }
        }

        ("Image" | "GrayImage" | "ColorImage", args) => {
            let size = match args {
                None => None,
                Some([Node::Number(w), Node::Number(h)]) => Some(ImageSize::new(*w, *h)),
                Some(_) => {
                    return Err(invalid(format!("`{}` takes a width and a height", name)));
                }
            };
            match name {
                "Image" => ScientificType::Image(size),
                "GrayImage" => ScientificType::GrayImage(size),
                _ => ScientificType::ColorImage(size),
            }
        }

        ("Table", Some(args)) if !args.is_empty() => {
            ScientificType::table(ScientificType::union_of(types(args)?))
        }
        ("Tuple", Some(args)) => ScientificType::Tuple(types(args)?),
        ("Tuple", None) => ScientificType::Tuple(Vec::new()),
        ("Union", Some(args)) => ScientificType::union_of(types(args)?),

        ("AbstractVector", Some([element])) => ScientificType::vector(build(element, source)?),
        ("AbstractMatrix", Some([element])) => ScientificType::array(build(element, source)?, 2),
        ("AbstractArray", Some([element, Node::Number(rank)])) => {
            ScientificType::array(build(element, source)?, *rank)
        }

        (name, _) => {
            return Err(invalid(format!("unrecognized scientific type `{}`", name)));
        }
    };

    Ok(scitype)
}

impl FromStr for ScientificType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scitype(s)
    }
}

impl TryFrom<String> for ScientificType {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_scitype(&value)
    }
}
