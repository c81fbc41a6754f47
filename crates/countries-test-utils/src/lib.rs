//! Test helpers shared by the `countries` integration tests.

pub mod sandbox;

pub use insta::assert_snapshot;

/// Six-country catalog in the REST Countries v3.1 shape.
///
/// Order is FRA, DEU, CHE, ISL, BRA, ATA. ATA has no capital, currencies,
/// languages, or borders; ISL has no borders.
pub const CATALOG_FIXTURE: &str = include_str!("../fixtures/countries.json");
