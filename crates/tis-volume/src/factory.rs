use std::sync::Arc;

use tis_core::errors::ErrorInfo;
use tis_core::{OrderParameter, TisError};
use tracing::debug;

use crate::config::InterfaceSetConfig;
use crate::lambda::{LambdaVolume, LambdaVolumePeriodic};
use crate::volume::Volume;

/// Batch constructors for interface volumes sharing one order parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeFactory;

impl VolumeFactory {
    /// Builds one [`LambdaVolume`] per `(min_values[i], max_values[i])` pair, in order.
    pub fn lambda_set<S: ?Sized>(
        orderparameter: &Arc<dyn OrderParameter<S>>,
        min_values: &[f64],
        max_values: &[f64],
    ) -> Result<Vec<Volume<S>>, TisError> {
        check_lengths(min_values, max_values)?;
        let volumes: Vec<Volume<S>> = min_values
            .iter()
            .zip(max_values)
            .map(|(&lo, &hi)| LambdaVolume::new(Arc::clone(orderparameter), lo, hi).into())
            .collect();
        debug!(
            orderparameter = orderparameter.name(),
            count = volumes.len(),
            "built lambda volume set"
        );
        Ok(volumes)
    }

    /// Builds one [`LambdaVolumePeriodic`] per bound pair, sharing the periodic domain.
    ///
    /// Fails as a whole if any element cannot be constructed.
    pub fn lambda_periodic_set<S: ?Sized>(
        orderparameter: &Arc<dyn OrderParameter<S>>,
        min_values: &[f64],
        max_values: &[f64],
        period_min: Option<f64>,
        period_max: Option<f64>,
    ) -> Result<Vec<Volume<S>>, TisError> {
        check_lengths(min_values, max_values)?;
        let volumes = min_values
            .iter()
            .zip(max_values)
            .enumerate()
            .map(|(index, (&lo, &hi))| {
                let orderparameter = Arc::clone(orderparameter);
                LambdaVolumePeriodic::new(orderparameter, lo, hi, period_min, period_max)
                    .map(Volume::from)
                    .map_err(|err| match err {
                        TisError::Construction(info) => {
                            TisError::Construction(info.with_context("index", index.to_string()))
                        }
                        other => other,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            orderparameter = orderparameter.name(),
            count = volumes.len(),
            "built periodic lambda volume set"
        );
        Ok(volumes)
    }

    /// Builds the interface set described by `config`.
    pub fn from_config<S: ?Sized>(
        orderparameter: &Arc<dyn OrderParameter<S>>,
        config: &InterfaceSetConfig,
    ) -> Result<Vec<Volume<S>>, TisError> {
        if config.is_periodic() {
            Self::lambda_periodic_set(
                orderparameter,
                &config.min_values,
                &config.max_values,
                config.period_min,
                config.period_max,
            )
        } else {
            Self::lambda_set(orderparameter, &config.min_values, &config.max_values)
        }
    }
}

fn check_lengths(min_values: &[f64], max_values: &[f64]) -> Result<(), TisError> {
    if min_values.len() != max_values.len() {
        return Err(TisError::Construction(
            ErrorInfo::new("length-mismatch", "min_values and max_values differ in length")
                .with_context("min_len", min_values.len().to_string())
                .with_context("max_len", max_values.len().to_string()),
        ));
    }
    Ok(())
}
