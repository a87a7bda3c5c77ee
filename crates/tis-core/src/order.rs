//! Order-parameter contracts consumed by volumes.
//!
//! Snapshots are opaque to this workspace: an order parameter is any named
//! function from a snapshot to a scalar (interval volumes) or to a vector of
//! distances (Voronoi volumes).

use std::fmt;
use std::marker::PhantomData;

/// Scalar order parameter evaluated on a snapshot of type `S`.
pub trait OrderParameter<S: ?Sized>: Send + Sync {
    /// Name used when rendering volumes.
    fn name(&self) -> &str;

    /// Computes the order parameter value for `snapshot`.
    fn evaluate(&self, snapshot: &S) -> f64;
}

/// Vector-valued order parameter returning one distance per Voronoi center.
pub trait DistanceParameter<S: ?Sized>: Send + Sync {
    /// Name used when rendering volumes.
    fn name(&self) -> &str;

    /// Computes the distance of `snapshot` to every center.
    fn distances(&self, snapshot: &S) -> Vec<f64>;
}

/// Adapts a named closure `Fn(&S) -> f64` into an [`OrderParameter`].
pub struct FnOrderParameter<S: ?Sized, F> {
    name: String,
    func: F,
    _snapshot: PhantomData<fn(&S)>,
}

impl<S: ?Sized, F> FnOrderParameter<S, F>
where
    F: Fn(&S) -> f64 + Send + Sync,
{
    /// Wraps `func` under the provided name.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _snapshot: PhantomData,
        }
    }
}

impl<S: ?Sized, F> OrderParameter<S> for FnOrderParameter<S, F>
where
    F: Fn(&S) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, snapshot: &S) -> f64 {
        (self.func)(snapshot)
    }
}

impl<S: ?Sized, F> fmt::Debug for FnOrderParameter<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOrderParameter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Adapts a named closure `Fn(&S) -> Vec<f64>` into a [`DistanceParameter`].
pub struct FnDistanceParameter<S: ?Sized, F> {
    name: String,
    func: F,
    _snapshot: PhantomData<fn(&S)>,
}

impl<S: ?Sized, F> FnDistanceParameter<S, F>
where
    F: Fn(&S) -> Vec<f64> + Send + Sync,
{
    /// Wraps `func` under the provided name.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _snapshot: PhantomData,
        }
    }
}

impl<S: ?Sized, F> DistanceParameter<S> for FnDistanceParameter<S, F>
where
    F: Fn(&S) -> Vec<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn distances(&self, snapshot: &S) -> Vec<f64> {
        (self.func)(snapshot)
    }
}

impl<S: ?Sized, F> fmt::Debug for FnDistanceParameter<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDistanceParameter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
