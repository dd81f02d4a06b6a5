/* End-to-end conversion of the Salsa fixture */

use abi_gen::{AbiConverter, ConvertError, EndpointPolicy, RustCodeGeneratorOptions};
use abi_loader::{AbiFormat, load_contract_abi, parse_abi};
use abi_types::{AbiDocument, DecodeStrategy, PrimitiveKind, ResolvedType};
use std::path::PathBuf;

fn testdata_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../testdata").join(name)
}

fn salsa() -> AbiDocument {
  load_contract_abi(&testdata_path("salsa.abi.json")).expect("fixture should load")
}

fn generate(doc: &AbiDocument) -> String {
  AbiConverter::new(doc)
    .unwrap()
    .convert(EndpointPolicy::Strict, RustCodeGeneratorOptions::default())
    .unwrap()
    .source
}

#[test]
fn conversion_is_deterministic() {
  let doc = salsa();
  assert_eq!(generate(&doc), generate(&doc));
}

#[test]
fn identical_tuples_share_one_composite() {
  let doc = salsa();
  let model = AbiConverter::new(&doc).unwrap().analyze(EndpointPolicy::Strict).unwrap();

  let names: Vec<&str> = model.catalog.composites.keys().map(String::as_str).collect();
  assert_eq!(names, vec!["ComplexType0", "ComplexType1", "ComplexType2"]);

  let slots = model.endpoints.iter().find(|e| e.name == "getDelegationSlots").unwrap();
  let last = model.endpoints.iter().find(|e| e.name == "getLastDelegationSlot").unwrap();
  let ResolvedType::List { inner } = &slots.outputs[0].ty else { panic!("expected list") };
  let ResolvedType::Tuple { composite: listed } = inner.as_ref() else { panic!("expected tuple") };
  let ResolvedType::Tuple { composite: single } = &last.outputs[0].ty else { panic!("expected tuple") };
  assert_eq!(listed.name, single.name);

  assert_eq!(model.custom_types, vec![PrimitiveKind::TokenIdentifier, PrimitiveKind::Address]);
}

#[test]
fn outputs_get_their_strategies() {
  let doc = salsa();
  let model = AbiConverter::new(&doc).unwrap().analyze(EndpointPolicy::Strict).unwrap();
  let strategy = |name: &str| model.endpoints.iter().find(|e| e.name == name).unwrap().plans[0].strategy;

  assert_eq!(strategy("getUnbondPeriod"), DecodeStrategy::Scalar);
  assert_eq!(strategy("getUserUndelegations"), DecodeStrategy::SelfTerminating);
  assert_eq!(strategy("getRewardAmounts"), DecodeStrategy::EachSlot);
  assert_eq!(strategy("getDelegationSlots"), DecodeStrategy::SelfTerminating);
  assert_eq!(strategy("getTokenBalances"), DecodeStrategy::Groups { width: 2 });
  assert_eq!(strategy("getEpochBounds"), DecodeStrategy::Group { width: 2 });
  assert_eq!(strategy("getWhitelist"), DecodeStrategy::EachSlot);
}

#[test]
fn generated_source_has_expected_items() {
  let source = generate(&salsa());

  assert!(source.starts_with("//! Client bindings for the `SalsaContract` contract.\n"));
  assert!(source.contains("use abi_reflect::wire::{self, NestedDecoder, WireArg};\n"));
  assert!(source.contains(
    "use abi_reflect::{BigUint, BindingError, CallOptions, CallRequest, NetworkTransport, ReturnData, TokenPayment, \
     WireError};\n"
  ));
  assert!(source.contains("pub type TokenIdentifier = String;\npub type Address = [u8; 32];\n"));
  assert!(source.contains("pub struct Undelegation {\n  pub amount: BigUint,\n  pub unbond_epoch: u64,\n}"));
  assert!(source.contains("pub struct ComplexType1 {\n  pub var0: u32,\n  pub var1: Address,\n}"));
  assert!(source.contains("pub struct GetReserveInfoOutput {"));
  assert!(source.contains("pub struct SalsaContract<T> {"));
  assert!(source.contains("impl<T: NetworkTransport> SalsaContract<T> {"));

  assert!(source.contains("let out0 = data.self_terminating(0, Undelegation::decode_nested);"));
  assert!(source.contains("let out0 = data.each_slot(0, wire::top_decode_big_uint);"));
  assert!(source.contains("let out0 = data.scalar(0, wire::top_decode_u64)?;"));
  assert!(source.contains(
    "let out0 = data.groups(0, 2, |group| Ok(ComplexType0 { var0: wire::top_decode_string(&group[0])?, \
     var1: wire::top_decode_u64(&group[1])? }));"
  ));

  assert!(source.contains(
    "pub fn get_user_undelegations(&self, user: &Address) -> Result<Vec<Undelegation>, BindingError> {"
  ));
  assert!(source.contains(
    "pub fn register_liquid_token(&self, options: &CallOptions, token_display_name: &[u8], token_ticker: &[u8], \
     num_decimals: u32) -> Result<String, BindingError> {"
  ));
  assert!(source.contains("pub fn un_delegate_now(&self, options: &CallOptions, payment: Option<&TokenPayment>,"));
  assert!(source.contains("pub fn delegate(&self, options: &CallOptions) -> Result<String, BindingError> {"));
  assert!(source.contains("/// Only the contract owner may call this endpoint.\n  pub fn set_state("));
}

#[test]
fn mutable_outputs_are_not_decoded() {
  let source = generate(&salsa());
  let start = source.find("pub fn claim_payments(").unwrap();
  let body = &source[start..];
  let body = &body[..body.find("\n  }\n").unwrap()];
  assert!(body.contains("-> Result<String, BindingError>"));
  assert!(body.contains("for item0 in payments.iter() {"));
  assert!(!body.contains("ReturnData"));
}

fn single_endpoint(endpoint: &str) -> AbiDocument {
  let json = format!(
    r#"{{"buildInfo":{{"framework":{{"name":"multiversx-sc","version":"0.39.4"}}}},"name":"Pairs","endpoints":[{}]}}"#,
    endpoint
  );
  parse_abi(&json, AbiFormat::Json).unwrap()
}

#[test]
fn mixed_outputs_fail_the_endpoint() {
  let doc = single_endpoint(
    r#"{"name":"getPair","mutability":"readonly","outputs":[{"name":"first","type":"u8"},{"type":"u16"}]}"#,
  );
  let err = AbiConverter::new(&doc).unwrap().analyze(EndpointPolicy::Strict).unwrap_err();
  assert!(matches!(err.root(), ConvertError::MixedNamedAndUnnamedOutputs { endpoint } if endpoint == "getPair"));

  let conversion = AbiConverter::new(&doc)
    .unwrap()
    .convert(EndpointPolicy::SkipFailed, RustCodeGeneratorOptions::default())
    .unwrap();
  assert_eq!(conversion.failures().len(), 1);
  assert!(!conversion.source.contains("fn get_pair"));
}

#[test]
fn unnamed_input_fails_before_encoding() {
  let doc = single_endpoint(r#"{"name":"setPair","mutability":"mutable","inputs":[{"type":"tuple<u8,u8>"}]}"#);
  let err = AbiConverter::new(&doc).unwrap().analyze(EndpointPolicy::Strict).unwrap_err();
  assert!(matches!(err.root(), ConvertError::UnnamedInput { index: 0, .. }));
}

#[test]
fn unsupported_framework_is_rejected_up_front() {
  let json = r#"{"buildInfo":{"framework":{"name":"ink","version":"5.0.0"}},"name":"Other",
    "endpoints":[{"name":"get","mutability":"readonly","outputs":[{"type":"NoSuchType"}]}]}"#;
  let doc = parse_abi(json, AbiFormat::Json).unwrap();
  assert!(matches!(AbiConverter::new(&doc), Err(ConvertError::UnsupportedFramework { .. })));
}

#[test]
fn write_to_creates_module_files() {
  let dir = tempfile::tempdir().unwrap();
  let doc = salsa();
  let conversion = AbiConverter::new(&doc)
    .unwrap()
    .convert(EndpointPolicy::Strict, RustCodeGeneratorOptions::default())
    .unwrap();

  let path = conversion.write_to(dir.path()).unwrap();
  assert_eq!(path, dir.path().join("salsaContract").join("salsaContract.rs"));
  assert_eq!(std::fs::read_to_string(&path).unwrap(), conversion.source);

  let module = std::fs::read_to_string(dir.path().join("salsaContract").join("mod.rs")).unwrap();
  assert!(module.contains("pub use salsaContract::*;"));
}

#[test]
fn custom_runtime_crate_is_used_in_imports() {
  let doc = salsa();
  let options = RustCodeGeneratorOptions { runtime_crate: "salsa_runtime".to_string(), ..Default::default() };
  let source = AbiConverter::new(&doc).unwrap().convert(EndpointPolicy::Strict, options).unwrap().source;
  assert!(source.contains("use salsa_runtime::wire::{self, NestedDecoder, WireArg};"));
}

#[test]
fn generated_items_have_unique_names() {
  let json = r#"{"buildInfo":{"framework":{"name":"multiversx-sc","version":"0.39.4"}},"name":"Pairs",
    "endpoints":[
      {"name":"getPair","mutability":"readonly","outputs":[{"type":"tuple<u8,u16>"}]},
      {"name":"get_pair","mutability":"readonly","outputs":[{"type":"u8"}]}
    ],
    "types":{"ComplexType0":{"type":"struct","fields":[{"name":"id","type":"u8"}]}}}"#;
  let doc = parse_abi(json, AbiFormat::Json).unwrap();

  let err = AbiConverter::new(&doc)
    .unwrap()
    .convert(EndpointPolicy::Strict, RustCodeGeneratorOptions::default())
    .unwrap_err();
  assert!(matches!(err.root(), ConvertError::DuplicateItemName { .. }));

  let conversion = AbiConverter::new(&doc)
    .unwrap()
    .convert(EndpointPolicy::SkipFailed, RustCodeGeneratorOptions::default())
    .unwrap();
  let source = &conversion.source;
  assert_eq!(source.matches("pub struct ComplexType0 ").count(), 1);
  assert_eq!(source.matches("pub struct ComplexType1 ").count(), 1);
  assert_eq!(source.matches("pub fn get_pair(").count(), 1);
  assert_eq!(conversion.failures().len(), 1);
}
