//! host capabilities the loader talks to through narrow interfaces

pub mod fetch;
