//! Infrastructure layer - persistence implementations

pub mod storage;
