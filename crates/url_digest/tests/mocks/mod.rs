pub mod completion;
pub mod text_source;
