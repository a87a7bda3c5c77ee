use std::fmt;
use std::sync::Arc;

use tis_core::DistanceParameter;

/// Voronoi cell of one center among those measured by a [`DistanceParameter`].
pub struct VoronoiVolume<S: ?Sized> {
    orderparameter: Arc<dyn DistanceParameter<S>>,
    state: usize,
}

impl<S: ?Sized> VoronoiVolume<S> {
    /// Creates the cell volume for center index `state`.
    pub fn new(orderparameter: Arc<dyn DistanceParameter<S>>, state: usize) -> Self {
        Self {
            orderparameter,
            state,
        }
    }

    /// Distance parameter measuring the centers.
    pub fn orderparameter(&self) -> &Arc<dyn DistanceParameter<S>> {
        &self.orderparameter
    }

    /// Center index of this cell.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Index of the closest center, first one on ties.
    ///
    /// NaN distances are skipped; `None` if no distance is comparable.
    pub fn cell(&self, snapshot: &S) -> Option<usize> {
        let distances = self.orderparameter.distances(snapshot);
        let mut best: Option<(usize, f64)> = None;
        for (idx, &distance) in distances.iter().enumerate() {
            if distance.is_nan() {
                continue;
            }
            match best {
                Some((_, min)) if distance >= min => {}
                _ => best = Some((idx, distance)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Returns `true` if `snapshot` lies in this cell.
    pub fn evaluate(&self, snapshot: &S) -> bool {
        self.evaluate_state(snapshot, None)
    }

    /// Returns `true` if `snapshot` lies in cell `state`, defaulting to this volume's cell.
    pub fn evaluate_state(&self, snapshot: &S, state: Option<usize>) -> bool {
        self.cell(snapshot) == Some(state.unwrap_or(self.state))
    }
}

impl<S: ?Sized> fmt::Display for VoronoiVolume<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x|argmin {}(x) == {}}}",
            self.orderparameter.name(),
            self.state
        )
    }
}
