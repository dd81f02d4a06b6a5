use crate::codegen::rust_gen::helpers::{type_ident, zero_value};
use crate::errors::ConvertError;
use abi_types::{
  AbiDocument, CompositeRef, PrimitiveKind, ResolvedField, ResolvedType, ResolvedVariant, TypeCatalog,
  TypeDefinition, TypeExpr, check_nested, parse_type_expr, split_top_level,
};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/* Structurally deduplicated anonymous composites, in registration order */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeRegistry {
  entries: IndexMap<String, Vec<ResolvedField>>,
  /* Identifiers owned by named types; synthetic names step over them */
  reserved: BTreeSet<String>,
}

impl CompositeRegistry {
  pub fn reserving<I: IntoIterator<Item = String>>(names: I) -> Self {
    Self { entries: IndexMap::new(), reserved: names.into_iter().collect() }
  }

  /* Returns the synthetic name of an identical entry, or registers a new one
   * named after the registry size at insertion time, moving to the next free
   * index when that name is taken. */
  pub fn get_or_create(&mut self, members: &[ResolvedType]) -> String {
    let fields: Vec<ResolvedField> = members
      .iter()
      .enumerate()
      .map(|(index, member)| ResolvedField { name: format!("var{}", index), field_type: member.clone() })
      .collect();

    if let Some((name, _)) = self.entries.iter().find(|(_, existing)| **existing == fields) {
      return name.clone();
    }

    let mut index = self.entries.len();
    let mut name = format!("ComplexType{}", index);
    while self.reserved.contains(&name) || self.entries.contains_key(&name) {
      index += 1;
      name = format!("ComplexType{}", index);
    }
    debug!(composite = %name, members = members.len(), "registered composite type");
    self.entries.insert(name.clone(), fields);
    name
  }

  pub fn get(&self, name: &str) -> Option<&[ResolvedField]> {
    self.entries.get(name).map(Vec::as_slice)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ResolvedField>)> {
    self.entries.iter()
  }
}

/* Everything resolution accumulates for the emitter. Owned by one conversion
 * run; cloned to snapshot before an endpoint and restored if it fails. */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
  /* Runtime items the generated file must import */
  pub imports: BTreeSet<&'static str>,
  /* Custom primitive aliases, in first-use order */
  pub custom_types: IndexSet<PrimitiveKind>,
  pub composites: CompositeRegistry,
}

impl ResolutionContext {
  pub fn new() -> Self {
    Self::default()
  }

  /* A context whose composites never take the name of one of the document's types */
  pub fn for_document(document: &AbiDocument) -> Self {
    let reserved = document.types.keys().map(|name| type_ident(name));
    Self { composites: CompositeRegistry::reserving(reserved), ..Self::default() }
  }

  fn note_primitive(&mut self, kind: PrimitiveKind) {
    if kind.is_custom_alias() {
      self.custom_types.insert(kind);
    }
    match kind {
      PrimitiveKind::BigUint => {
        self.imports.insert("BigUint");
      }
      PrimitiveKind::BigInt => {
        self.imports.insert("BigInt");
      }
      _ => {}
    }
  }
}

#[derive(Debug)]
pub struct TypeResolver<'a> {
  document: &'a AbiDocument,
  records: IndexMap<String, Vec<ResolvedField>>,
  enums: IndexMap<String, Vec<ResolvedVariant>>,
}

impl<'a> TypeResolver<'a> {
  pub fn new(document: &'a AbiDocument) -> Self {
    Self { document, records: IndexMap::new(), enums: IndexMap::new() }
  }

  /* Resolve all named types in document order */
  pub fn resolve_named_types(&mut self, ctx: &mut ResolutionContext) -> Result<(), ConvertError> {
    for (name, definition) in &self.document.types {
      match definition {
        TypeDefinition::Struct { fields, .. } => {
          let mut resolved = Vec::with_capacity(fields.len());
          for field in fields {
            let field_type = self.resolve(&field.type_expr, ctx)?;
            check_nested(&field_type).map_err(|source| ConvertError::UnsupportedDecodeShape {
              context: format!("field '{}' of '{}'", field.name, name),
              source,
            })?;
            resolved.push(ResolvedField { name: field.name.clone(), field_type });
          }
          debug!(name = %name, fields = resolved.len(), "resolved record");
          self.records.insert(name.clone(), resolved);
        }
        TypeDefinition::Enum { variants, .. } => {
          let resolved = resolve_variants(name, variants)?;
          debug!(name = %name, variants = resolved.len(), "resolved enum");
          self.enums.insert(name.clone(), resolved);
        }
      }
    }

    /* every record field must have a zero value for the Default impls */
    let catalog = self.catalog(ctx);
    for fields in self.records.values() {
      for field in fields {
        zero_value(&field.field_type, &catalog)?;
      }
    }

    Ok(())
  }

  /* Resolve one type expression, registering aliases and composites in ctx */
  pub fn resolve(&self, expr: &str, ctx: &mut ResolutionContext) -> Result<ResolvedType, ConvertError> {
    let resolved = match parse_type_expr(expr)? {
      TypeExpr::Primitive(kind) => {
        ctx.note_primitive(kind);
        ResolvedType::primitive(kind)
      }
      TypeExpr::NamedRef(name) => match self.document.types.get(name) {
        Some(TypeDefinition::Struct { .. }) => ResolvedType::NamedRecord { name: name.to_string() },
        Some(TypeDefinition::Enum { .. }) => ResolvedType::NamedEnum { name: name.to_string() },
        None => return Err(ConvertError::UnknownAbiFieldType { name: name.to_string() }),
      },
      TypeExpr::List(inner) => ResolvedType::list(self.resolve(inner, ctx)?),
      TypeExpr::SimpleVariadic(inner) => ResolvedType::simple_variadic(self.resolve(inner, ctx)?),
      TypeExpr::MultiVariadic(inner) => {
        let mut members = self.resolve_members(inner, ctx)?;
        if members.len() < 2 {
          ResolvedType::simple_variadic(members.remove(0))
        } else {
          ResolvedType::MultiVariadic { composite: self.register(members, ctx) }
        }
      }
      TypeExpr::Multi(inner) => {
        let mut members = self.resolve_members(inner, ctx)?;
        if members.len() < 2 {
          ResolvedType::list(members.remove(0))
        } else {
          ResolvedType::Multi { composite: self.register(members, ctx) }
        }
      }
      TypeExpr::Tuple(inner) => {
        let members = self.resolve_members(inner, ctx)?;
        ResolvedType::Tuple { composite: self.register(members, ctx) }
      }
    };
    Ok(resolved)
  }

  /* Never empty: split_top_level rejects empty member lists */
  fn resolve_members(&self, inner: &str, ctx: &mut ResolutionContext) -> Result<Vec<ResolvedType>, ConvertError> {
    split_top_level(inner)?.into_iter().map(|member| self.resolve(member, ctx)).collect()
  }

  fn register(&self, members: Vec<ResolvedType>, ctx: &mut ResolutionContext) -> CompositeRef {
    let name = ctx.composites.get_or_create(&members);
    CompositeRef { name, members }
  }

  /* Snapshot of every declaration known so far */
  pub fn catalog(&self, ctx: &ResolutionContext) -> TypeCatalog {
    TypeCatalog {
      records: self.records.clone(),
      enums: self.enums.clone(),
      composites: ctx.composites.iter().map(|(name, fields)| (name.clone(), fields.clone())).collect(),
    }
  }
}

fn resolve_variants(
  name: &str,
  variants: &[abi_types::EnumVariantDef],
) -> Result<Vec<ResolvedVariant>, ConvertError> {
  let invalid = |reason: String| ConvertError::InvalidEnum { name: name.to_string(), reason };

  if variants.is_empty() {
    return Err(invalid("enum has no variants".to_string()));
  }

  let mut seen = HashSet::new();
  let mut resolved = Vec::with_capacity(variants.len());
  for variant in variants {
    let discriminant = u8::try_from(variant.discriminant).map_err(|_| {
      invalid(format!("discriminant {} of '{}' does not fit in one byte", variant.discriminant, variant.name))
    })?;
    if !seen.insert(discriminant) {
      return Err(invalid(format!("discriminant {} is used more than once", discriminant)));
    }
    resolved.push(ResolvedVariant { name: variant.name.clone(), discriminant });
  }
  Ok(resolved)
}
