mod compiler;
mod strip;

pub use compiler::compile_to_text;
pub use strip::{decode_entities, strip_tags};
