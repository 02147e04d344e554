//! Codecs for the built-in widget kinds

mod button_group;
mod color;
mod counter;
mod dynamic_items;
mod text;

pub use button_group::ButtonGroupCodec;
pub use color::ColorCodec;
pub use counter::{parse_float_prefix, CounterCodec};
pub use dynamic_items::DynamicItemsCodec;
pub use text::TextCodec;
