//! A `nom`-based parser for selector expressions.
use crate::ast::PathSegment;
use crate::error::SelectorError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char, u64 as nom_u64},
    combinator::{map, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

// --- Main Entry Point ---

pub(crate) fn parse_segments(input: &str) -> Result<Vec<PathSegment>, SelectorError> {
    match selector(input.trim()) {
        Ok(("", segments)) => Ok(segments),
        Ok((remainder, _)) => Err(SelectorError::Parse {
            expr: input.to_string(),
            message: format!("unexpected trailing input: '{remainder}'"),
        }),
        Err(e) => Err(SelectorError::Parse {
            expr: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators ---

fn selector(input: &str) -> IResult<&str, Vec<PathSegment>> {
    map(
        pair(identifier, many0(path_segment)),
        |(first, mut rest)| {
            let mut segments = vec![PathSegment::Key(first.to_string())];
            segments.append(&mut rest);
            segments
        },
    )
    .parse(input)
}

fn path_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((key_segment, bracket_segment)).parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn bracket_segment(input: &str) -> IResult<&str, PathSegment> {
    delimited(
        char('['),
        alt((
            map(nom_u64, |i| PathSegment::Index(i as usize)),
            map(char('*'), |_| PathSegment::Wildcard),
        )),
        char(']'),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}
