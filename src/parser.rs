//! Query-string parsing using nom.
//!
//! Decodes raw `application/x-www-form-urlencoded` query strings into
//! [`QueryParams`] and recognizes the bracketed filter keys.
//!
//! ```text
//! filters[group_id:gt]=77&sort=-name&page[size]=10
//! ────────┬─────────── ───┬───── ──────┬───────
//!         │               │            └── pagination
//!         │               └── sort list (leading '-' = DESC)
//!         └── filter: field ':' operator
//! ```

use nom::{
    IResult,
    bytes::complete::{tag, take_till, take_until, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map, map_res, opt},
    sequence::{delimited, preceded, separated_pair},
};

use crate::ast::FilterKey;
use crate::error::{RqlError, RqlResult};
use crate::params::QueryParams;

/// What a query-string key turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind<'a> {
    /// A well-formed `filters[<field>:<op>]` key.
    Filter(FilterKey<'a>),
    /// `filters[...]` whose payload has no `field:op` shape.
    Malformed,
    /// Any other key.
    Other,
}

/// Decode a raw query string (with or without the leading `?`).
///
/// Fails only when the input cannot be decoded at all: a broken `%` escape
/// or a component that does not decode to UTF-8.
pub fn parse_query_string(input: &str) -> RqlResult<QueryParams> {
    let body = input.strip_prefix('?').unwrap_or(input);
    let base = input.len() - body.len();
    let mut params = QueryParams::new();

    let mut offset = base;
    for segment in body.split('&') {
        let seg_offset = offset;
        offset += segment.len() + 1;
        if segment.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = match parse_pair(segment) {
            Ok((_, pair)) => pair,
            Err(e) => {
                return Err(RqlError::parse(
                    seg_offset,
                    format!("Malformed query pair '{}': {:?}", segment, e),
                ));
            }
        };

        let key = percent_decode(raw_key, seg_offset)?;
        let value = match raw_value {
            Some(v) => percent_decode(v, seg_offset + raw_key.len() + 1)?,
            None => String::new(),
        };
        params.append(key, value);
    }

    Ok(params)
}

/// Split one `key[=value]` segment.
fn parse_pair(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, key) = take_till(|c: char| c == '=')(input)?;
    let (input, value) = opt(preceded(char('='), take_till(|_: char| false)))(input)?;
    Ok((input, (key, value)))
}

/// Parse a `%XX` escape into its byte.
fn parse_escape(input: &str) -> IResult<&str, u8> {
    map_res(
        preceded(
            char('%'),
            take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        ),
        |hex: &str| u8::from_str_radix(hex, 16),
    )(input)
}

/// Percent-decode a component, treating `+` as a space.
fn percent_decode(input: &str, offset: usize) -> RqlResult<String> {
    let mut bytes = Vec::with_capacity(input.len());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            '%' => match parse_escape(rest) {
                Ok((tail, byte)) => {
                    bytes.push(byte);
                    rest = tail;
                }
                Err(_) => {
                    let snippet: String = rest.chars().take(3).collect();
                    return Err(RqlError::parse(
                        offset + input.len() - rest.len(),
                        format!("Invalid percent escape '{}'", snippet),
                    ));
                }
            },
            '+' => {
                bytes.push(b' ');
                rest = &rest[1..];
            }
            _ => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    String::from_utf8(bytes).map_err(|_| {
        RqlError::parse(
            offset,
            format!("Component '{}' does not decode to UTF-8", input),
        )
    })
}

/// Parse the bracket payload of a `filters[...]` key.
fn parse_filter_payload(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(tag("filters["), take_until("]"), char(']')))(input)
}

/// Split a payload on `:` into field and operator.
///
/// Parts after the second are ignored.
fn parse_field_op(input: &str) -> IResult<&str, FilterKey<'_>> {
    map(
        separated_pair(
            take_till(|c: char| c == ':'),
            char(':'),
            take_till(|c: char| c == ':'),
        ),
        |(field, op)| FilterKey { field, op },
    )(input)
}

/// Classify a decoded query-string key.
pub fn classify_key(key: &str) -> KeyKind<'_> {
    match parse_filter_payload(key) {
        Ok((_, payload)) => match parse_field_op(payload) {
            Ok((_, filter)) => KeyKind::Filter(filter),
            Err(_) => KeyKind::Malformed,
        },
        Err(_) => KeyKind::Other,
    }
}
