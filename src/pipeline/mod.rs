pub mod converter;
pub mod packager;
pub mod scanner;
pub mod workspace;

pub use converter::Converter;
pub use packager::{PackSummary, ZipPackager};
pub use scanner::{scan_workspace, StagedFile};
pub use workspace::TempWorkspace;
