//! Runtime value model shared by the expression and observation engines.
//!
//! [`Value`] mirrors the JavaScript value universe the binding language
//! operates on: `undefined`, `null`, booleans, IEEE-754 numbers, strings,
//! arrays, ordered objects and host functions. Arrays are wrapped in
//! [`ObservableArray`] so in-place mutations (`push`, `splice`, ...) can be
//! intercepted and reported to listeners.
//!
//! The `coerce` module implements the JavaScript abstract conversions
//! (`ToNumber`, `ToInt32`, `ToString`, truthiness) that give the expression
//! operators their loose-typing behavior.

mod array;
pub mod coerce;
mod convert;
mod deep_clone;
mod deep_equal;
mod value;

pub use array::{ArrayChange, ArrayMethod, ObservableArray};
pub use convert::{from_json, to_json};
pub use deep_clone::deep_clone;
pub use deep_equal::deep_equal;
pub use value::{NativeFunction, Value};
