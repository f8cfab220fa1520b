// Generated documents: naming grammar, per-user metadata index, registry, static serving.

pub mod handlers;
pub mod index;
pub mod naming;
pub mod registry;

pub use naming::{DocumentKind, FileExt};
pub use registry::FileRegistry;
