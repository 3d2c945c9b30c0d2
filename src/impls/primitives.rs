//! The closed primitive set: numbers, booleans, characters and strings.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::bind::{Bind, BindShape};
use crate::bridge::{Engine, Primitive};

macro_rules! impl_bind_primitive {
    ($variant:ident as $as:ty => $($ty:ty),+) => {$(
        impl<E: Engine> Bind<E> for $ty {
            #[inline]
            fn shape(&self) -> BindShape<'_, E> {
                BindShape::Primitive(Primitive::$variant(*self as $as))
            }
        }
    )+};
}

impl_bind_primitive!(Int as i64 => i8, i16, i32, i64, isize);
impl_bind_primitive!(UInt as u64 => u8, u16, u32, u64, usize);
impl_bind_primitive!(Float as f64 => f32, f64);

impl<E: Engine> Bind<E> for bool {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Primitive(Primitive::Bool(*self))
    }
}

impl<E: Engine> Bind<E> for char {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Primitive(Primitive::Char(*self))
    }
}

impl<E: Engine> Bind<E> for str {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Primitive(Primitive::Str(self))
    }
}

impl<E: Engine> Bind<E> for String {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Primitive(Primitive::Str(self))
    }
}

impl<E: Engine> Bind<E> for Cow<'_, str> {
    #[inline]
    fn shape(&self) -> BindShape<'_, E> {
        BindShape::Primitive(Primitive::Str(self))
    }
}
