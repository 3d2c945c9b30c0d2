//! Transparent wrappers: a pointer-like value registers as its pointee.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::bind::{Bind, BindShape};
use crate::bridge::Engine;

impl<'a, E: Engine, T: Bind<E> + ?Sized> Bind<E> for &'a T {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        (**self).shape()
    }
}

impl<'a, E: Engine, T: Bind<E> + ?Sized> Bind<E> for &'a mut T {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        (**self).shape()
    }
}

impl<E: Engine, T: Bind<E> + ?Sized> Bind<E> for Box<T> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        (**self).shape()
    }
}

impl<E: Engine, T: Bind<E> + ?Sized> Bind<E> for Rc<T> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        (**self).shape()
    }
}

impl<E: Engine, T: Bind<E> + ?Sized> Bind<E> for Arc<T> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        (**self).shape()
    }
}
