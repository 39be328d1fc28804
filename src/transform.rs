//! Path-addressed transformations applied to decoded rows before denormalization.

mod key;
mod rule;
mod runner;
mod set;

pub use key::{ARRAY_KEY_IDENTIFIER, KEY_SEPARATOR, TransformerKey};
pub use rule::{ResultTransformer, Transformation};
pub use runner::ResultTransformerRunner;
pub use set::ResultTransformers;
pub(crate) use runner::ensure_single_value_transformer;
