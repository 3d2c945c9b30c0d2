//! [`Bind`](crate::Bind) implementations for host-language types.

mod pointers;
mod primitives;
mod unsupported;
