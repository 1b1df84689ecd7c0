//! Read-only source tree access for strategies.
//!
//! - `FsSourceReader`: files under a project root on disk
//! - `MemorySourceReader`: an in-memory file map, for embedding and tests

pub mod fs_reader;
pub mod memory_reader;

pub use fs_reader::FsSourceReader;
pub use memory_reader::MemorySourceReader;

/// Split file content into lines without terminators, tolerating CRLF.
pub(crate) fn split_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
