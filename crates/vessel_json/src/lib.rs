//! Vessel JSON - text codec for Vessel values.
//!
//! - [`to_json`] / [`to_json_with`]: compact serialization, sized exactly
//!   before writing
//! - [`from_json`]: strict recursive-descent parsing that either yields a
//!   complete value or a [`ParseError`]
//!
//! # Round Trips
//!
//! Parsing the output of [`to_json`] yields a value equal to the input, with
//! two exceptions that follow from the wire format:
//!
//! - Floats with an integral value are written without a decimal point and
//!   therefore come back as `Int` (`1.0` becomes `1`).
//! - Maps whose keys are not strings produce text that is not valid JSON.
//!
//! Floats otherwise survive bit-for-bit: they are written with 17
//! significant digits and read back with correct rounding.

mod config;
mod cursor;
mod error;
mod float;
mod parse;
mod write;

pub use config::JsonConfig;
pub use error::{ParseError, ParseErrorKind};
pub use parse::from_json;
pub use write::{to_json, to_json_with};
