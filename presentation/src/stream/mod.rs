//! Live rendering of streamed rounds

pub mod printer;
