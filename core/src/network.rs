//! Transport to remote rigs.

pub mod tcp;
