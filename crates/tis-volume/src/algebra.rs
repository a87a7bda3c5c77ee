//! Set algebra over volumes.
//!
//! Every operator short-circuits on identity and on the `Empty`/`Full`
//! sentinels before building a combination node. The checks run in a fixed
//! order (identity, left empty, right empty, left full, right full) and the
//! returned handle is often one of the operands itself, so callers can rely
//! on `ptr_eq` and `kind` of the result.

use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

use crate::volume::{BoolOp, Volume};

impl<S: ?Sized> Volume<S> {
    /// Snapshots in `self` or in `other`.
    pub fn union(&self, other: &Self) -> Self {
        if self.ptr_eq(other) {
            self.clone()
        } else if self.is_empty() {
            other.clone()
        } else if other.is_empty() || self.is_full() {
            self.clone()
        } else if other.is_full() {
            other.clone()
        } else {
            Volume::combine(self, other, BoolOp::Or)
        }
    }

    /// Snapshots in exactly one of `self` and `other`.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        if self.ptr_eq(other) {
            Volume::empty()
        } else if self.is_empty() {
            other.clone()
        } else if other.is_empty() {
            self.clone()
        } else if self.is_full() {
            other.negate()
        } else if other.is_full() {
            self.negate()
        } else {
            Volume::combine(self, other, BoolOp::Xor)
        }
    }

    /// Snapshots in both `self` and `other`.
    pub fn intersection(&self, other: &Self) -> Self {
        if self.ptr_eq(other) || self.is_empty() {
            self.clone()
        } else if other.is_empty() || self.is_full() {
            other.clone()
        } else if other.is_full() {
            self.clone()
        } else {
            Volume::combine(self, other, BoolOp::And)
        }
    }

    /// Snapshots in `self` but not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        if self.ptr_eq(other) {
            Volume::empty()
        } else if self.is_empty() || other.is_empty() {
            self.clone()
        } else if self.is_full() {
            other.negate()
        } else if other.is_full() {
            Volume::empty()
        } else {
            Volume::combine(self, other, BoolOp::AndNot)
        }
    }

    /// Complement of `self`. `Empty` and `Full` swap instead of being wrapped.
    pub fn negate(&self) -> Self {
        if self.is_empty() {
            Volume::full()
        } else if self.is_full() {
            Volume::empty()
        } else {
            Volume::negated(self)
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $algebra:ident) => {
        impl<S: ?Sized> $trait<&Volume<S>> for &Volume<S> {
            type Output = Volume<S>;

            fn $method(self, rhs: &Volume<S>) -> Volume<S> {
                self.$algebra(rhs)
            }
        }

        impl<S: ?Sized> $trait<Volume<S>> for Volume<S> {
            type Output = Volume<S>;

            fn $method(self, rhs: Volume<S>) -> Volume<S> {
                self.$algebra(&rhs)
            }
        }

        impl<S: ?Sized> $trait<&Volume<S>> for Volume<S> {
            type Output = Volume<S>;

            fn $method(self, rhs: &Volume<S>) -> Volume<S> {
                self.$algebra(rhs)
            }
        }

        impl<S: ?Sized> $trait<Volume<S>> for &Volume<S> {
            type Output = Volume<S>;

            fn $method(self, rhs: Volume<S>) -> Volume<S> {
                self.$algebra(&rhs)
            }
        }
    };
}

binary_operator!(BitOr, bitor, union);
binary_operator!(BitAnd, bitand, intersection);
binary_operator!(BitXor, bitxor, symmetric_difference);
binary_operator!(Sub, sub, difference);

impl<S: ?Sized> Not for &Volume<S> {
    type Output = Volume<S>;

    fn not(self) -> Volume<S> {
        self.negate()
    }
}

impl<S: ?Sized> Not for Volume<S> {
    type Output = Volume<S>;

    fn not(self) -> Volume<S> {
        self.negate()
    }
}
