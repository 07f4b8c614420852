// Template rendering: ResumeRecord + Theme -> DocumentTree.
// Pure and deterministic; shared by the live preview and every exporter.

pub mod format;
pub mod renderer;
pub mod theme;
pub mod tree;

pub use renderer::render;
pub use theme::Theme;
pub use tree::{DocumentTree, SectionBody, SectionKind};
