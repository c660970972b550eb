pub mod llm;
pub mod manifest;
pub mod observability;
pub mod storage;
