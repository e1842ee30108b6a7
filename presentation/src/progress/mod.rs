//! Progress reporting for synchronous rounds

pub mod reporter;
