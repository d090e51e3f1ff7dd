// Adapters layer: concrete implementations for external systems (files, workbooks).

pub mod source;
pub mod storage;
