//! Decode strategy selection.
//!
//! A contract returns an ordered array of byte slots. How an output's value is
//! recovered from that array depends only on the output's resolved shape; the
//! code generator and the runtime reflector both select through this module so
//! the two can never disagree.

use crate::types::ResolvedType;
use serde_derive::Serialize;
use thiserror::Error;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum DecodeStrategy {
    /// One slot, one value. Any failure aborts the call.
    Scalar,
    /// Records packed back to back in one slot with no count. Parsing stops at
    /// the first position that does not hold a complete record.
    SelfTerminating,
    /// One value per remaining slot. Slots that fail to decode are skipped.
    EachSlot,
    /// Strides of `width` remaining slots per element. Failing elements are
    /// skipped; an incomplete trailing stride is dropped.
    Groups { width: usize },
    /// Exactly one stride of `width` slots. Any failure aborts the call.
    Group { width: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported decode shape '{shape}': {reason}")]
pub struct ShapeError {
    pub shape: String,
    pub reason: &'static str,
}

impl ShapeError {
    fn new(ty: &ResolvedType, reason: &'static str) -> Self {
        Self { shape: ty.to_string(), reason }
    }
}

impl DecodeStrategy {
    pub fn select(ty: &ResolvedType) -> Result<Self, ShapeError> {
        match ty {
            ResolvedType::List { inner } if inner.is_record_like() => {
                check_nested(inner)?;
                Ok(DecodeStrategy::SelfTerminating)
            }
            ResolvedType::List { inner } | ResolvedType::SimpleVariadic { inner } => {
                check_top_level(inner)?;
                Ok(DecodeStrategy::EachSlot)
            }
            ResolvedType::MultiVariadic { composite } => {
                for member in &composite.members {
                    check_group_member(member)?;
                }
                Ok(DecodeStrategy::Groups { width: composite.members.len() })
            }
            ResolvedType::Multi { composite } => {
                for member in &composite.members {
                    check_group_member(member)?;
                }
                Ok(DecodeStrategy::Group { width: composite.members.len() })
            }
            other => {
                check_top_level(other)?;
                Ok(DecodeStrategy::Scalar)
            }
        }
    }

    /// Repeating strategies read every slot up to the end of the array.
    pub fn consumes_remaining(self) -> bool {
        matches!(self, DecodeStrategy::EachSlot | DecodeStrategy::Groups { .. })
    }

    /// Number of slots a fixed strategy occupies.
    pub fn slot_span(self) -> Option<usize> {
        match self {
            DecodeStrategy::Scalar | DecodeStrategy::SelfTerminating => Some(1),
            DecodeStrategy::Group { width } => Some(width),
            DecodeStrategy::EachSlot | DecodeStrategy::Groups { .. } => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DecodeStrategy::Scalar => "scalar",
            DecodeStrategy::SelfTerminating => "self-terminating",
            DecodeStrategy::EachSlot => "each-slot",
            DecodeStrategy::Groups { .. } => "groups",
            DecodeStrategy::Group { .. } => "group",
        }
    }
}

/// Where one endpoint output lives in the returned slot array.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPlan {
    pub strategy: DecodeStrategy,
    pub first_slot: usize,
}

/// Assigns slots to outputs left to right. Fixed strategies take their span;
/// a repeating strategy takes the rest of the array, so nothing may follow it.
pub fn plan_outputs(outputs: &[ResolvedType]) -> Result<Vec<OutputPlan>, ShapeError> {
    let mut plans = Vec::with_capacity(outputs.len());
    let mut cursor = 0usize;
    let mut open_ended = false;

    for output in outputs {
        if open_ended {
            return Err(ShapeError::new(output, "output follows a repeating output"));
        }
        let strategy = DecodeStrategy::select(output)?;
        plans.push(OutputPlan { strategy, first_slot: cursor });
        match strategy.slot_span() {
            Some(span) => cursor += span,
            None => open_ended = true,
        }
    }

    Ok(plans)
}

/// A value that fills one whole slot: primitives, enums, records, tuples.
pub fn check_top_level(ty: &ResolvedType) -> Result<(), ShapeError> {
    match ty {
        ResolvedType::Primitive { .. }
        | ResolvedType::NamedEnum { .. }
        | ResolvedType::NamedRecord { .. } => Ok(()),
        ResolvedType::Tuple { composite } => composite.members.iter().try_for_each(check_nested),
        _ => Err(ShapeError::new(ty, "value does not fit a single return slot")),
    }
}

/// A value that can sit inside a record at a byte offset.
pub fn check_nested(ty: &ResolvedType) -> Result<(), ShapeError> {
    match ty {
        ResolvedType::Primitive { .. }
        | ResolvedType::NamedEnum { .. }
        | ResolvedType::NamedRecord { .. } => Ok(()),
        ResolvedType::Tuple { composite } => composite.members.iter().try_for_each(check_nested),
        ResolvedType::List { inner } => match inner.as_ref() {
            ResolvedType::List { .. } => {
                Err(ShapeError::new(ty, "nested lists of lists are not decodable"))
            }
            element => check_nested(element),
        },
        _ => Err(ShapeError::new(ty, "multi-value types cannot appear inside a record")),
    }
}

/// A member of a multi-value group: one slot each.
pub fn check_group_member(ty: &ResolvedType) -> Result<(), ShapeError> {
    match ty {
        ResolvedType::List { inner } if inner.is_record_like() => check_nested(inner),
        ResolvedType::List { .. } => Err(ShapeError::new(
            ty,
            "only lists of records can be decoded from one group slot",
        )),
        other => check_top_level(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompositeRef, PrimitiveKind};

    fn prim(kind: PrimitiveKind) -> ResolvedType {
        ResolvedType::primitive(kind)
    }

    fn record(name: &str) -> ResolvedType {
        ResolvedType::NamedRecord { name: name.to_string() }
    }

    fn composite(members: Vec<ResolvedType>) -> CompositeRef {
        CompositeRef { name: "ComplexType0".to_string(), members }
    }

    #[test]
    fn test_scalar_shapes() {
        assert_eq!(DecodeStrategy::select(&prim(PrimitiveKind::U64)), Ok(DecodeStrategy::Scalar));
        assert_eq!(DecodeStrategy::select(&record("Undelegation")), Ok(DecodeStrategy::Scalar));
        let tuple = ResolvedType::Tuple {
            composite: composite(vec![prim(PrimitiveKind::U32), prim(PrimitiveKind::Address)]),
        };
        assert_eq!(DecodeStrategy::select(&tuple), Ok(DecodeStrategy::Scalar));
    }

    #[test]
    fn test_list_of_primitives_repeats_per_slot() {
        let ty = ResolvedType::list(prim(PrimitiveKind::BigUint));
        assert_eq!(DecodeStrategy::select(&ty), Ok(DecodeStrategy::EachSlot));
    }

    #[test]
    fn test_list_of_records_is_self_terminating() {
        let ty = ResolvedType::list(record("Undelegation"));
        assert_eq!(DecodeStrategy::select(&ty), Ok(DecodeStrategy::SelfTerminating));
    }

    #[test]
    fn test_multi_shapes() {
        let members = composite(vec![prim(PrimitiveKind::TokenIdentifier), prim(PrimitiveKind::U64)]);
        let variadic = ResolvedType::MultiVariadic { composite: members.clone() };
        assert_eq!(DecodeStrategy::select(&variadic), Ok(DecodeStrategy::Groups { width: 2 }));
        let fixed = ResolvedType::Multi { composite: members };
        assert_eq!(DecodeStrategy::select(&fixed), Ok(DecodeStrategy::Group { width: 2 }));
    }

    #[test]
    fn test_group_member_may_be_record_list() {
        let members = composite(vec![prim(PrimitiveKind::Address), ResolvedType::list(record("Undelegation"))]);
        let ty = ResolvedType::MultiVariadic { composite: members };
        assert_eq!(DecodeStrategy::select(&ty), Ok(DecodeStrategy::Groups { width: 2 }));
    }

    #[test]
    fn test_unsupported_shapes() {
        let variadic_in_list = ResolvedType::list(ResolvedType::simple_variadic(prim(PrimitiveKind::U8)));
        assert!(DecodeStrategy::select(&variadic_in_list).is_err());

        let primitive_list_in_group = ResolvedType::Multi {
            composite: composite(vec![prim(PrimitiveKind::U8), ResolvedType::list(prim(PrimitiveKind::U8))]),
        };
        assert!(DecodeStrategy::select(&primitive_list_in_group).is_err());

        let nested_lists = ResolvedType::list(ResolvedType::list(prim(PrimitiveKind::U8)));
        assert!(check_nested(&nested_lists).is_err());
        assert!(check_nested(&ResolvedType::simple_variadic(prim(PrimitiveKind::U8))).is_err());
        assert!(check_nested(&ResolvedType::list(prim(PrimitiveKind::U8))).is_ok());
    }

    #[test]
    fn test_plan_outputs_assigns_slots() {
        let pair = composite(vec![prim(PrimitiveKind::U64), prim(PrimitiveKind::U64)]);
        let outputs = vec![
            prim(PrimitiveKind::BigUint),
            ResolvedType::Multi { composite: pair },
            ResolvedType::list(record("Undelegation")),
            ResolvedType::simple_variadic(prim(PrimitiveKind::Address)),
        ];
        let plans = plan_outputs(&outputs).unwrap();
        let slots: Vec<usize> = plans.iter().map(|p| p.first_slot).collect();
        assert_eq!(slots, vec![0, 1, 3, 4]);
        assert_eq!(plans[3].strategy, DecodeStrategy::EachSlot);
    }

    #[test]
    fn test_plan_rejects_output_after_repetition() {
        let outputs = vec![
            ResolvedType::simple_variadic(prim(PrimitiveKind::Address)),
            prim(PrimitiveKind::U64),
        ];
        let err = plan_outputs(&outputs).unwrap_err();
        assert_eq!(err.shape, "u64");
    }

    #[test]
    fn test_slot_span() {
        assert_eq!(DecodeStrategy::Scalar.slot_span(), Some(1));
        assert_eq!(DecodeStrategy::Group { width: 3 }.slot_span(), Some(3));
        assert_eq!(DecodeStrategy::EachSlot.slot_span(), None);
        assert!(DecodeStrategy::Groups { width: 2 }.consumes_remaining());
        assert!(!DecodeStrategy::SelfTerminating.consumes_remaining());
    }
}
