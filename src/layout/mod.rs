pub mod chunker;

pub use chunker::LayoutChunker;
