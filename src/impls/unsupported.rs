//! Shapes the bridge cannot represent.
//!
//! Raw pointers are opaque memory handles, `()` and `Option::None` carry no
//! value to mirror. Host types wrapping other unrepresentable resources
//! (channel endpoints, file descriptors) should return
//! [`BindShape::Unsupported`] from their own impls.

use crate::bind::{Bind, BindShape};
use crate::bridge::Engine;

impl<E: Engine, T: Bind<E>> Bind<E> for Option<T> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        match self {
            Some(value) => value.shape(),
            None => BindShape::Unsupported,
        }
    }
}

impl<E: Engine> Bind<E> for () {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Unsupported
    }
}

impl<E: Engine, T: ?Sized> Bind<E> for *const T {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Unsupported
    }
}

impl<E: Engine, T: ?Sized> Bind<E> for *mut T {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Unsupported
    }
}
