/* Dynamic decoding of endpoint return data
 *
 * The reflector interprets resolved output types directly instead of going
 * through generated code. It plans slots and picks strategies through the same
 * abi_types functions the code generator uses, and applies the same failure
 * policies via ReturnData, so both paths agree on every input.
 */

use crate::errors::{ReflectError, WireError};
use crate::return_data::ReturnData;
use crate::value::Value;
use crate::wire::{self, NestedDecoder};
use abi_types::{plan_outputs, CompositeRef, DecodeStrategy, PrimitiveKind, ResolvedType, TypeCatalog};
use indexmap::IndexMap;

pub struct Reflector<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> Reflector<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    /* Decode every output of one endpoint call, in declaration order */
    pub fn decode_outputs(
        &self,
        endpoint: &str,
        outputs: &[ResolvedType],
        slots: &[Vec<u8>],
    ) -> Result<Vec<Value>, ReflectError> {
        for output in outputs {
            self.check_declared(endpoint, output)?;
        }
        let plans = plan_outputs(outputs)
            .map_err(|source| ReflectError::Shape { endpoint: endpoint.to_string(), source })?;

        let data = ReturnData::new(endpoint, slots);
        let mut values = Vec::with_capacity(outputs.len());

        for (output, plan) in outputs.iter().zip(plans) {
            let from = plan.first_slot;
            let value = match (plan.strategy, output) {
                (DecodeStrategy::Scalar, _) => data.scalar(from, |slot| self.top_decode(output, slot))?,
                (DecodeStrategy::SelfTerminating, ResolvedType::List { inner }) => Value::List {
                    elements: data.self_terminating(from, |d| self.nested_decode(inner, d)),
                },
                (DecodeStrategy::EachSlot, ResolvedType::List { inner })
                | (DecodeStrategy::EachSlot, ResolvedType::SimpleVariadic { inner }) => Value::List {
                    elements: data.each_slot(from, |slot| self.top_decode(inner, slot)),
                },
                (DecodeStrategy::Groups { width }, ResolvedType::MultiVariadic { composite }) => Value::List {
                    elements: data.groups(from, width, |group| self.decode_group(composite, group)),
                },
                (DecodeStrategy::Group { width }, ResolvedType::Multi { composite }) => {
                    data.group(from, width, |group| self.decode_group(composite, group))?
                }
                (strategy, other) => {
                    return Err(ReflectError::Shape {
                        endpoint: endpoint.to_string(),
                        source: abi_types::ShapeError {
                            shape: other.to_string(),
                            reason: strategy.label(),
                        },
                    })
                }
            };
            values.push(value);
        }

        Ok(values)
    }

    fn check_declared(&self, endpoint: &str, ty: &ResolvedType) -> Result<(), ReflectError> {
        let missing = |name: &str| ReflectError::UnknownType {
            endpoint: endpoint.to_string(),
            type_name: name.to_string(),
        };
        match ty {
            ResolvedType::Primitive { .. } => Ok(()),
            ResolvedType::NamedRecord { name } => {
                self.catalog.record_fields(name).map(|_| ()).ok_or_else(|| missing(name))
            }
            ResolvedType::NamedEnum { name } => {
                self.catalog.enum_variants(name).map(|_| ()).ok_or_else(|| missing(name))
            }
            ResolvedType::List { inner } | ResolvedType::SimpleVariadic { inner } => {
                self.check_declared(endpoint, inner)
            }
            ResolvedType::Tuple { composite } => {
                if self.catalog.composite_fields(&composite.name).is_none() {
                    return Err(missing(&composite.name));
                }
                composite.members.iter().try_for_each(|m| self.check_declared(endpoint, m))
            }
            ResolvedType::MultiVariadic { composite } | ResolvedType::Multi { composite } => {
                composite.members.iter().try_for_each(|m| self.check_declared(endpoint, m))
            }
        }
    }

    /* One value owning a whole slot */
    fn top_decode(&self, ty: &ResolvedType, slot: &[u8]) -> Result<Value, WireError> {
        match ty {
            ResolvedType::Primitive { primitive } => top_decode_primitive(*primitive, slot),
            ResolvedType::NamedEnum { name } => self.enum_value(name, wire::top_decode_u8(slot)?),
            ResolvedType::NamedRecord { .. } | ResolvedType::Tuple { .. } => {
                wire::decode_record(slot, |d| self.nested_decode(ty, d))
            }
            other => Err(WireError::UnsupportedShape { shape: other.to_string() }),
        }
    }

    /* One element of a multi-value group; member i reads slot i */
    fn decode_group(&self, composite: &CompositeRef, group: &[Vec<u8>]) -> Result<Value, WireError> {
        let mut fields = IndexMap::with_capacity(composite.members.len());
        for (index, (member, slot)) in composite.members.iter().zip(group).enumerate() {
            let value = match member {
                ResolvedType::List { inner } if inner.is_record_like() => Value::List {
                    elements: wire::decode_self_terminating(slot, |d| self.nested_decode(inner, d)),
                },
                other => self.top_decode(other, slot)?,
            };
            fields.insert(format!("var{}", index), value);
        }
        Ok(Value::Record { type_name: composite.name.clone(), fields })
    }

    fn nested_decode(&self, ty: &ResolvedType, decoder: &mut NestedDecoder<'_>) -> Result<Value, WireError> {
        match ty {
            ResolvedType::Primitive { primitive } => nested_decode_primitive(*primitive, decoder),
            ResolvedType::NamedEnum { name } => {
                decoder.read_with(|d| {
                    let discriminant = d.read_u8()?;
                    self.enum_value(name, discriminant)
                })
            }
            ResolvedType::NamedRecord { name } => {
                let fields = self.catalog.fields_of(ty).ok_or_else(|| WireError::UndeclaredType {
                    type_name: name.clone(),
                })?;
                decoder.read_with(|d| {
                    let mut values = IndexMap::with_capacity(fields.len());
                    for field in fields {
                        values.insert(field.name.clone(), self.nested_decode(&field.field_type, d)?);
                    }
                    Ok(Value::Record { type_name: name.clone(), fields: values })
                })
            }
            ResolvedType::Tuple { composite } => {
                decoder.read_with(|d| {
                    let mut values = IndexMap::with_capacity(composite.members.len());
                    for (index, member) in composite.members.iter().enumerate() {
                        values.insert(format!("var{}", index), self.nested_decode(member, d)?);
                    }
                    Ok(Value::Record { type_name: composite.name.clone(), fields: values })
                })
            }
            ResolvedType::List { inner } => {
                let elements = decoder.read_list(|d| self.nested_decode(inner, d))?;
                Ok(Value::List { elements })
            }
            other => Err(WireError::UnsupportedShape { shape: other.to_string() }),
        }
    }

    fn enum_value(&self, name: &str, discriminant: u8) -> Result<Value, WireError> {
        let variants = self
            .catalog
            .enum_variants(name)
            .ok_or_else(|| WireError::UndeclaredType { type_name: name.to_string() })?;
        let variant = variants
            .iter()
            .find(|v| v.discriminant == discriminant)
            .ok_or_else(|| WireError::UnknownDiscriminant { type_name: name.to_string(), value: discriminant })?;
        Ok(Value::Enum { type_name: name.to_string(), variant: variant.name.clone(), discriminant })
    }
}

fn top_decode_primitive(kind: PrimitiveKind, slot: &[u8]) -> Result<Value, WireError> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool { value: wire::top_decode_bool(slot)? },
        PrimitiveKind::U8 => Value::Unsigned { value: wire::top_decode_u8(slot)?.into() },
        PrimitiveKind::U16 => Value::Unsigned { value: wire::top_decode_u16(slot)?.into() },
        PrimitiveKind::U32 => Value::Unsigned { value: wire::top_decode_u32(slot)?.into() },
        PrimitiveKind::U64 => Value::Unsigned { value: wire::top_decode_u64(slot)? },
        PrimitiveKind::BigUint => Value::BigInteger { value: wire::top_decode_big_uint(slot)?.to_string() },
        PrimitiveKind::BigInt => Value::BigInteger { value: wire::top_decode_big_int(slot)?.to_string() },
        PrimitiveKind::Bytes => Value::Bytes { hex: hex::encode(slot) },
        PrimitiveKind::Utf8String
        | PrimitiveKind::TokenIdentifier
        | PrimitiveKind::EgldOrEsdtTokenIdentifier => Value::Text { value: wire::top_decode_string(slot)? },
        PrimitiveKind::Address => Value::Address { hex: hex::encode(wire::top_decode_address(slot)?) },
    })
}

fn nested_decode_primitive(kind: PrimitiveKind, d: &mut NestedDecoder<'_>) -> Result<Value, WireError> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool { value: d.read_bool()? },
        PrimitiveKind::U8 => Value::Unsigned { value: d.read_u8()?.into() },
        PrimitiveKind::U16 => Value::Unsigned { value: d.read_u16()?.into() },
        PrimitiveKind::U32 => Value::Unsigned { value: d.read_u32()?.into() },
        PrimitiveKind::U64 => Value::Unsigned { value: d.read_u64()? },
        PrimitiveKind::BigUint => Value::BigInteger { value: d.read_big_uint()?.to_string() },
        PrimitiveKind::BigInt => Value::BigInteger { value: d.read_big_int()?.to_string() },
        PrimitiveKind::Bytes => Value::Bytes { hex: hex::encode(d.read_bytes()?) },
        PrimitiveKind::Utf8String
        | PrimitiveKind::TokenIdentifier
        | PrimitiveKind::EgldOrEsdtTokenIdentifier => Value::Text { value: d.read_string()? },
        PrimitiveKind::Address => Value::Address { hex: hex::encode(d.read_address()?) },
    })
}
