use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tis_core::{DistanceParameter, OrderParameter, TisError};

use crate::lambda::{LambdaVolume, LambdaVolumePeriodic};
use crate::voronoi::VoronoiVolume;

/// Boolean operator stored by a [`Combination`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoolOp {
    /// `left || right`
    Or,
    /// `left && right`
    And,
    /// `left ^ right`
    Xor,
    /// `left && !right`
    AndNot,
}

impl BoolOp {
    /// Applies the operator to two membership results.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            BoolOp::Or => left || right,
            BoolOp::And => left && right,
            BoolOp::Xor => left ^ right,
            BoolOp::AndNot => left && !right,
        }
    }

    /// Display template with `{0}` and `{1}` standing for the operands.
    pub fn template(self) -> &'static str {
        match self {
            BoolOp::Or => "{0} or {1}",
            BoolOp::And => "{0} and {1}",
            BoolOp::Xor => "{0} xor {1}",
            BoolOp::AndNot => "{0} and not {1}",
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BoolOp::Or => "or",
            BoolOp::And => "and",
            BoolOp::Xor => "xor",
            BoolOp::AndNot => "and-not",
        }
    }

    fn render(self, left: &str, right: &str) -> String {
        self.template().replace("{0}", left).replace("{1}", right)
    }
}

/// Discriminant of a [`Volume`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeKind {
    /// Contains no snapshot.
    Empty,
    /// Contains every snapshot.
    Full,
    /// Complement of an inner volume.
    Negated,
    /// Binary combination of two volumes.
    Combination,
    /// Inclusive order-parameter interval.
    Lambda,
    /// Interval on a periodic order parameter.
    LambdaPeriodic,
    /// Voronoi cell membership.
    Voronoi,
}

/// Binary combination of two volumes under a [`BoolOp`].
pub struct Combination<S: ?Sized> {
    left: Volume<S>,
    right: Volume<S>,
    op: BoolOp,
}

impl<S: ?Sized> Combination<S> {
    /// Left operand.
    pub fn left(&self) -> &Volume<S> {
        &self.left
    }

    /// Right operand.
    pub fn right(&self) -> &Volume<S> {
        &self.right
    }

    /// Operator combining both operands.
    pub fn op(&self) -> BoolOp {
        self.op
    }
}

/// Concrete node held by a [`Volume`].
pub enum VolumeNode<S: ?Sized> {
    /// Always false.
    Empty,
    /// Always true.
    Full,
    /// True iff the inner volume is false.
    Negated(Volume<S>),
    /// `op(left, right)`.
    Combination(Combination<S>),
    /// Order parameter inside `[lambda_min, lambda_max]`.
    Lambda(LambdaVolume<S>),
    /// Periodic order parameter inside a possibly wrapped interval.
    LambdaPeriodic(LambdaVolumePeriodic<S>),
    /// Snapshot closest to a given center.
    Voronoi(VoronoiVolume<S>),
}

/// Immutable boolean predicate over snapshots of type `S`.
///
/// Cloning is cheap and preserves identity: a clone is the *same* volume for
/// the purposes of the algebraic short-circuits (`a | a` returns `a`).
pub struct Volume<S: ?Sized> {
    node: Arc<VolumeNode<S>>,
}

impl<S: ?Sized> Clone for Volume<S> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<S: ?Sized> Volume<S> {
    pub(crate) fn from_node(node: VolumeNode<S>) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// The volume containing nothing.
    pub fn empty() -> Self {
        Self::from_node(VolumeNode::Empty)
    }

    /// The volume containing everything.
    pub fn full() -> Self {
        Self::from_node(VolumeNode::Full)
    }

    /// Interval volume `lambda_min <= op(s) <= lambda_max`. Bounds are not validated.
    pub fn lambda(
        orderparameter: Arc<dyn OrderParameter<S>>,
        lambda_min: f64,
        lambda_max: f64,
    ) -> Self {
        LambdaVolume::new(orderparameter, lambda_min, lambda_max).into()
    }

    /// Interval volume on a periodic order parameter, see [`LambdaVolumePeriodic::new`].
    pub fn lambda_periodic(
        orderparameter: Arc<dyn OrderParameter<S>>,
        lambda_min: f64,
        lambda_max: f64,
        period_min: Option<f64>,
        period_max: Option<f64>,
    ) -> Result<Self, TisError> {
        LambdaVolumePeriodic::new(orderparameter, lambda_min, lambda_max, period_min, period_max)
            .map(Into::into)
    }

    /// Voronoi cell `state` of the centers measured by `orderparameter`.
    pub fn voronoi(orderparameter: Arc<dyn DistanceParameter<S>>, state: usize) -> Self {
        VoronoiVolume::new(orderparameter, state).into()
    }

    pub(crate) fn combine(left: &Self, right: &Self, op: BoolOp) -> Self {
        Self::from_node(VolumeNode::Combination(Combination {
            left: left.clone(),
            right: right.clone(),
            op,
        }))
    }

    pub(crate) fn negated(inner: &Self) -> Self {
        Self::from_node(VolumeNode::Negated(inner.clone()))
    }

    /// Returns the node backing this volume.
    pub fn node(&self) -> &VolumeNode<S> {
        &self.node
    }

    /// Returns the discriminant of the backing node.
    pub fn kind(&self) -> VolumeKind {
        match self.node() {
            VolumeNode::Empty => VolumeKind::Empty,
            VolumeNode::Full => VolumeKind::Full,
            VolumeNode::Negated(_) => VolumeKind::Negated,
            VolumeNode::Combination(_) => VolumeKind::Combination,
            VolumeNode::Lambda(_) => VolumeKind::Lambda,
            VolumeNode::LambdaPeriodic(_) => VolumeKind::LambdaPeriodic,
            VolumeNode::Voronoi(_) => VolumeKind::Voronoi,
        }
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Whether this is an [`VolumeNode::Empty`] node.
    pub fn is_empty(&self) -> bool {
        matches!(self.node(), VolumeNode::Empty)
    }

    /// Whether this is a [`VolumeNode::Full`] node.
    pub fn is_full(&self) -> bool {
        matches!(self.node(), VolumeNode::Full)
    }

    /// Returns `true` if `snapshot` lies inside the volume.
    pub fn evaluate(&self, snapshot: &S) -> bool {
        match self.node() {
            VolumeNode::Empty => false,
            VolumeNode::Full => true,
            VolumeNode::Negated(inner) => !inner.evaluate(snapshot),
            VolumeNode::Combination(comb) => comb
                .op
                .apply(comb.left.evaluate(snapshot), comb.right.evaluate(snapshot)),
            VolumeNode::Lambda(volume) => volume.evaluate(snapshot),
            VolumeNode::LambdaPeriodic(volume) => volume.evaluate(snapshot),
            VolumeNode::Voronoi(volume) => volume.evaluate(snapshot),
        }
    }
}

impl<S: ?Sized> From<LambdaVolume<S>> for Volume<S> {
    fn from(volume: LambdaVolume<S>) -> Self {
        Self::from_node(VolumeNode::Lambda(volume))
    }
}

impl<S: ?Sized> From<LambdaVolumePeriodic<S>> for Volume<S> {
    fn from(volume: LambdaVolumePeriodic<S>) -> Self {
        Self::from_node(VolumeNode::LambdaPeriodic(volume))
    }
}

impl<S: ?Sized> From<VoronoiVolume<S>> for Volume<S> {
    fn from(volume: VoronoiVolume<S>) -> Self {
        Self::from_node(VolumeNode::Voronoi(volume))
    }
}

impl<S: ?Sized> fmt::Display for Volume<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            VolumeNode::Empty => f.write_str("empty"),
            VolumeNode::Full => f.write_str("all"),
            VolumeNode::Negated(inner) => write!(f, "(not {inner})"),
            VolumeNode::Combination(comb) => {
                let body = comb
                    .op
                    .render(&comb.left.to_string(), &comb.right.to_string());
                write!(f, "({body})")
            }
            VolumeNode::Lambda(volume) => fmt::Display::fmt(volume, f),
            VolumeNode::LambdaPeriodic(volume) => fmt::Display::fmt(volume, f),
            VolumeNode::Voronoi(volume) => fmt::Display::fmt(volume, f),
        }
    }
}

impl<S: ?Sized> fmt::Debug for Volume<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Volume")
            .field("kind", &self.kind())
            .field("repr", &self.to_string())
            .finish()
    }
}

/// Renders floats with at least one decimal so bounds read `1.0` rather than `1`.
///
/// Exponents carry an explicit sign and at least two digits (`1e-07`, `1e+16`).
pub(crate) fn fmt_float(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}
