use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tis_core::errors::ErrorInfo;
use tis_core::{OrderParameter, TisError};
use tracing::trace;

use crate::volume::fmt_float;

/// Volume of all snapshots whose order parameter lies in `[lambda_min, lambda_max]`.
pub struct LambdaVolume<S: ?Sized> {
    orderparameter: Arc<dyn OrderParameter<S>>,
    lambda_min: f64,
    lambda_max: f64,
}

impl<S: ?Sized> LambdaVolume<S> {
    /// Creates the interval volume. `lambda_min <= lambda_max` is the caller's responsibility.
    pub fn new(
        orderparameter: Arc<dyn OrderParameter<S>>,
        lambda_min: f64,
        lambda_max: f64,
    ) -> Self {
        Self {
            orderparameter,
            lambda_min,
            lambda_max,
        }
    }

    /// Order parameter the interval applies to.
    pub fn orderparameter(&self) -> &Arc<dyn OrderParameter<S>> {
        &self.orderparameter
    }

    /// Lower inclusive bound.
    pub fn lambda_min(&self) -> f64 {
        self.lambda_min
    }

    /// Upper inclusive bound.
    pub fn lambda_max(&self) -> f64 {
        self.lambda_max
    }

    /// Returns `true` if the order parameter of `snapshot` lies inside the interval.
    pub fn evaluate(&self, snapshot: &S) -> bool {
        let value = self.orderparameter.evaluate(snapshot);
        value >= self.lambda_min && value <= self.lambda_max
    }
}

impl<S: ?Sized> fmt::Display for LambdaVolume<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x|{}(x) in [{}, {}]}}",
            self.orderparameter.name(),
            fmt_float(self.lambda_min),
            fmt_float(self.lambda_max)
        )
    }
}

/// Periodic domain `[shift, shift + len)` an order parameter wraps into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicDomain {
    /// Lower edge of the domain (`period_min`).
    pub shift: f64,
    /// Width of the domain (`period_max - period_min`).
    pub len: f64,
}

impl PeriodicDomain {
    /// Maps `value` into `[shift, shift + len)`.
    pub fn wrap(&self, value: f64) -> f64 {
        (value - self.shift).rem_euclid(self.len) + self.shift
    }

    /// Upper edge of the domain (`period_max`).
    pub fn upper(&self) -> f64 {
        self.shift + self.len
    }
}

/// Interval volume over an order parameter living on a periodic domain.
///
/// When the wrapped bounds invert (`lambda_min > lambda_max`) the interval
/// crosses the periodic boundary and membership is the union of the two arcs
/// `[lambda_min, period_max)` and `[period_min, lambda_max]`.
pub struct LambdaVolumePeriodic<S: ?Sized> {
    orderparameter: Arc<dyn OrderParameter<S>>,
    lambda_min: f64,
    lambda_max: f64,
    period: Option<PeriodicDomain>,
}

impl<S: ?Sized> LambdaVolumePeriodic<S> {
    /// Creates the periodic interval volume.
    ///
    /// Wrapping is enabled only when both `period_min` and `period_max` are
    /// given. In that case the bounds are wrapped into the domain, or reset to
    /// the whole domain when the interval is exactly one period wide.
    pub fn new(
        orderparameter: Arc<dyn OrderParameter<S>>,
        lambda_min: f64,
        lambda_max: f64,
        period_min: Option<f64>,
        period_max: Option<f64>,
    ) -> Result<Self, TisError> {
        let (period_min, period_max) = match (period_min, period_max) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                return Ok(Self {
                    orderparameter,
                    lambda_min,
                    lambda_max,
                    period: None,
                })
            }
        };

        let period_len = period_max - period_min;
        if period_len.is_nan() || period_len <= 0.0 {
            return Err(TisError::Construction(
                ErrorInfo::new("empty-period", "periodic domain has no width")
                    .with_context("period_min", fmt_float(period_min))
                    .with_context("period_max", fmt_float(period_max)),
            ));
        }
        let width = lambda_max - lambda_min;
        if width > period_len {
            return Err(TisError::Construction(
                ErrorInfo::new(
                    "range-exceeds-period",
                    "range of volume larger than periodic bounds",
                )
                .with_context("lambda_min", fmt_float(lambda_min))
                .with_context("lambda_max", fmt_float(lambda_max))
                .with_context("period_len", fmt_float(period_len)),
            ));
        }

        let domain = PeriodicDomain {
            shift: period_min,
            len: period_len,
        };
        let (lambda_min, lambda_max) = if width == period_len {
            (period_min, period_max)
        } else {
            (domain.wrap(lambda_min), domain.wrap(lambda_max))
        };
        trace!(
            name = orderparameter.name(),
            lambda_min,
            lambda_max,
            "wrapped periodic interval"
        );
        Ok(Self {
            orderparameter,
            lambda_min,
            lambda_max,
            period: Some(domain),
        })
    }

    /// Order parameter the interval applies to.
    pub fn orderparameter(&self) -> &Arc<dyn OrderParameter<S>> {
        &self.orderparameter
    }

    /// Lower bound after wrapping.
    pub fn lambda_min(&self) -> f64 {
        self.lambda_min
    }

    /// Upper bound after wrapping.
    pub fn lambda_max(&self) -> f64 {
        self.lambda_max
    }

    /// Periodic domain, if wrapping is enabled.
    pub fn period(&self) -> Option<PeriodicDomain> {
        self.period
    }

    /// Whether order-parameter values are wrapped before comparison.
    pub fn wraps(&self) -> bool {
        self.period.is_some()
    }

    /// Returns `true` if the (wrapped) order parameter of `snapshot` is inside the interval.
    pub fn evaluate(&self, snapshot: &S) -> bool {
        let mut value = self.orderparameter.evaluate(snapshot);
        if let Some(domain) = &self.period {
            value = domain.wrap(value);
        }
        if self.lambda_min > self.lambda_max {
            value >= self.lambda_min || value <= self.lambda_max
        } else {
            value >= self.lambda_min && value <= self.lambda_max
        }
    }
}

impl<S: ?Sized> fmt::Display for LambdaVolumePeriodic<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.orderparameter.name();
        match &self.period {
            Some(domain) => {
                write!(
                    f,
                    "{{x|({name}(x) - {shift}) % {len} + {shift} in ",
                    shift = fmt_float(domain.shift),
                    len = fmt_float(domain.len)
                )?;
                if self.lambda_min < self.lambda_max {
                    write!(
                        f,
                        "[{}, {}]}}",
                        fmt_float(self.lambda_min),
                        fmt_float(self.lambda_max)
                    )
                } else {
                    write!(
                        f,
                        "[{}, {}] union [{}, {}]}}",
                        fmt_float(domain.shift),
                        fmt_float(self.lambda_max),
                        fmt_float(self.lambda_min),
                        fmt_float(domain.upper())
                    )
                }
            }
            None => write!(
                f,
                "{{x|{name}(x) [periodic] in [{}, {}]}}",
                fmt_float(self.lambda_min),
                fmt_float(self.lambda_max)
            ),
        }
    }
}
