//! Query modules, one per concern. All take a borrowed connection so
//! the engine decides whether they run on the writer or a reader.

pub mod chunk_ops;
pub mod graph_ops;
pub mod vector_query;
