#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! On-screen keyboard for the kiosk's data entry screens.
//!
//! Text editing works on char indices so a caret never lands inside a
//! multi-byte code point.

pub mod key;
pub mod keyboard;
pub mod text;

pub use key::Key;
pub use keyboard::{Keyboard, LayoutName};
pub use text::TextField;
