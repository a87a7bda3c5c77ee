use serde::{Deserialize, Serialize};
use tis_core::errors::ErrorInfo;
use tis_core::TisError;

use crate::lambda::PeriodicDomain;
use crate::volume::{BoolOp, Volume, VolumeNode};

/// Serializable structure of a volume tree.
///
/// Order parameters are opaque, so only their names are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VolumeDescriptor {
    /// Empty volume.
    Empty,
    /// Full volume.
    Full,
    /// Negated inner volume.
    Negated {
        /// Structure of the negated volume.
        inner: Box<VolumeDescriptor>,
    },
    /// Binary combination.
    Combination {
        /// Operator applied to the operands.
        op: BoolOp,
        /// Left operand.
        left: Box<VolumeDescriptor>,
        /// Right operand.
        right: Box<VolumeDescriptor>,
    },
    /// Order-parameter interval.
    Lambda {
        /// Name of the order parameter.
        orderparameter: String,
        /// Lower inclusive bound.
        lambda_min: f64,
        /// Upper inclusive bound.
        lambda_max: f64,
    },
    /// Periodic order-parameter interval (bounds as stored, after wrapping).
    LambdaPeriodic {
        /// Name of the order parameter.
        orderparameter: String,
        /// Lower bound.
        lambda_min: f64,
        /// Upper bound.
        lambda_max: f64,
        /// Periodic domain, absent when values are not wrapped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period: Option<PeriodicDomain>,
    },
    /// Voronoi cell.
    Voronoi {
        /// Name of the distance parameter.
        orderparameter: String,
        /// Center index of the cell.
        state: usize,
    },
}

impl<S: ?Sized> Volume<S> {
    /// Returns the serializable structure of this volume tree.
    pub fn describe(&self) -> VolumeDescriptor {
        match self.node() {
            VolumeNode::Empty => VolumeDescriptor::Empty,
            VolumeNode::Full => VolumeDescriptor::Full,
            VolumeNode::Negated(inner) => VolumeDescriptor::Negated {
                inner: Box::new(inner.describe()),
            },
            VolumeNode::Combination(comb) => VolumeDescriptor::Combination {
                op: comb.op(),
                left: Box::new(comb.left().describe()),
                right: Box::new(comb.right().describe()),
            },
            VolumeNode::Lambda(volume) => VolumeDescriptor::Lambda {
                orderparameter: volume.orderparameter().name().to_string(),
                lambda_min: volume.lambda_min(),
                lambda_max: volume.lambda_max(),
            },
            VolumeNode::LambdaPeriodic(volume) => VolumeDescriptor::LambdaPeriodic {
                orderparameter: volume.orderparameter().name().to_string(),
                lambda_min: volume.lambda_min(),
                lambda_max: volume.lambda_max(),
                period: volume.period(),
            },
            VolumeNode::Voronoi(volume) => VolumeDescriptor::Voronoi {
                orderparameter: volume.orderparameter().name().to_string(),
                state: volume.state(),
            },
        }
    }
}

/// Serializes the structure of `volume` to pretty JSON.
pub fn descriptor_to_json<S: ?Sized>(volume: &Volume<S>) -> Result<String, TisError> {
    serde_json::to_string_pretty(&volume.describe())
        .map_err(|err| TisError::Config(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Parses a descriptor previously produced by [`descriptor_to_json`].
pub fn descriptor_from_json(json: &str) -> Result<VolumeDescriptor, TisError> {
    serde_json::from_str(json)
        .map_err(|err| TisError::Config(ErrorInfo::new("deserialize-json", err.to_string())))
}
