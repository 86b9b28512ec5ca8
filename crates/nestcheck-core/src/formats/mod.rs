//! Entry readers for supported container formats.

pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ContainerFormat;
pub use detect::detect_container;
pub use detect::reader_for;
pub use tar::TarReader;
pub use traits::ArchiveEntry;
pub use traits::EntryReader;
pub use zip::ZipReader;
