//! Type expression grammar.
//!
//! ABI documents spell types as text (`u64`, `List<BigUint>`,
//! `variadic<multi<TokenIdentifier,u64>>`). Parsing classifies the outermost
//! form only and hands back the unsplit inner text; the resolver recurses.

use crate::types::PrimitiveKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("unrecognized type expression '{0}'")]
    UnrecognizedTypeExpression(String),
}

/// Outermost form of a type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExpr<'a> {
    Primitive(PrimitiveKind),
    /// `List<T>`, carries `T`.
    List(&'a str),
    /// `variadic<T>` where `T` is not a `multi<...>`, carries `T`.
    SimpleVariadic(&'a str),
    /// `variadic<multi<T1,...,Tn>>`, carries `T1,...,Tn`.
    MultiVariadic(&'a str),
    /// Bare `multi<T1,...,Tn>`, carries `T1,...,Tn`.
    Multi(&'a str),
    /// `tuple<T1,...,Tn>`, carries `T1,...,Tn`.
    Tuple(&'a str),
    /// Anything else that looks like a type name; looked up in the document.
    NamedRef(&'a str),
}

const OPTIONAL_WRAPPERS: &[&str] = &["Option", "optional"];

/// Strips any number of `Option<...>` / `optional<...>` wrappers.
///
/// Absence is not modelled: the wrapped type is resolved directly.
pub fn strip_optional(expr: &str) -> &str {
    let mut current = expr.trim();
    loop {
        match split_generic(current) {
            Ok(Some((head, inner))) if OPTIONAL_WRAPPERS.contains(&head) => {
                current = inner.trim();
            }
            _ => return current,
        }
    }
}

pub fn parse_type_expr(expr: &str) -> Result<TypeExpr<'_>, ExprError> {
    let expr = strip_optional(expr);
    if expr.is_empty() {
        return Err(unrecognized(expr));
    }

    if let Some(kind) = PrimitiveKind::from_keyword(expr) {
        return Ok(TypeExpr::Primitive(kind));
    }

    match split_generic(expr)? {
        Some((head, inner)) => match head {
            "List" => Ok(TypeExpr::List(inner)),
            "variadic" => match split_generic(inner.trim())? {
                Some(("multi", members)) => Ok(TypeExpr::MultiVariadic(members)),
                _ => Ok(TypeExpr::SimpleVariadic(inner)),
            },
            "multi" => Ok(TypeExpr::Multi(inner)),
            "tuple" => Ok(TypeExpr::Tuple(inner)),
            _ => Err(unrecognized(expr)),
        },
        None if is_type_name(expr) => Ok(TypeExpr::NamedRef(expr)),
        None => Err(unrecognized(expr)),
    }
}

/// Splits a generic argument list on top-level commas only.
///
/// `u32,tuple<u8,u16>,Address` yields three members. Empty members and
/// unbalanced brackets are rejected.
pub fn split_top_level(inner: &str) -> Result<Vec<&str>, ExprError> {
    let mut members = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(|| unrecognized(inner))?;
            }
            ',' if depth == 0 => {
                members.push(non_empty(&inner[start..idx], inner)?);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(unrecognized(inner));
    }
    members.push(non_empty(&inner[start..], inner)?);
    Ok(members)
}

/// Splits `Head<inner>` into `(Head, inner)`. Returns `Ok(None)` when the
/// expression has no generic arguments at all.
fn split_generic(expr: &str) -> Result<Option<(&str, &str)>, ExprError> {
    let Some(open) = expr.find('<') else {
        return if expr.contains('>') { Err(unrecognized(expr)) } else { Ok(None) };
    };
    if !expr.ends_with('>') {
        return Err(unrecognized(expr));
    }

    let head = expr[..open].trim();
    let inner = &expr[open + 1..expr.len() - 1];

    /* the closing bracket must pair with the first opening one */
    let mut depth: usize = 0;
    for ch in inner.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1).ok_or_else(|| unrecognized(expr))?,
            _ => {}
        }
    }
    if depth != 0 || head.is_empty() {
        return Err(unrecognized(expr));
    }

    Ok(Some((head, inner)))
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn non_empty<'a>(member: &'a str, whole: &str) -> Result<&'a str, ExprError> {
    let member = member.trim();
    if member.is_empty() {
        Err(unrecognized(whole))
    } else {
        Ok(member)
    }
}

fn unrecognized(expr: &str) -> ExprError {
    ExprError::UnrecognizedTypeExpression(expr.to_string())
}
