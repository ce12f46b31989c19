use std::ops::Index;

/// An ordered, fixed-length vector of real numbers describing a model's state.
///
/// The dimension is fixed by the model that owns the state and never changes
/// during a run. A state is either fully finite or, once a run has failed,
/// the *undefined* sentinel: every component is `NaN`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StateVector(Vec<f64>);

impl StateVector {
    /// Creates a state vector from its components.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Creates a state vector of the given dimension filled with zeros.
    #[must_use]
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    /// Creates the undefined sentinel of the given dimension.
    #[must_use]
    pub fn undefined(dimension: usize) -> Self {
        Self(vec![f64::NAN; dimension])
    }

    /// Returns the number of components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Returns the components as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns an iterator over the components.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Consumes the state vector and returns its components.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Returns `true` if this is the undefined sentinel.
    ///
    /// A zero-dimensional state is never undefined.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|v| v.is_nan())
    }

    /// Returns the index and value of the first non-finite component, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        self.0
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
    }

    /// Returns the weighted sum `Σ wᵢ·vᵢ` of equally sized vectors.
    ///
    /// Terms are accumulated left to right, so the result is reproducible
    /// bit for bit for the same inputs. An empty term list yields an empty
    /// vector.
    #[must_use]
    pub fn weighted_sum(terms: &[(f64, &StateVector)]) -> Self {
        let dimension = terms.first().map_or(0, |(_, v)| v.dimension());
        let mut sum = vec![0.0; dimension];
        for (w, vector) in terms {
            debug_assert_eq!(vector.dimension(), dimension);
            for (acc, v) in sum.iter_mut().zip(vector.iter()) {
                *acc += w * v;
            }
        }
        Self(sum)
    }

    /// Compares two vectors bit for bit, treating identical `NaN`s as equal.
    #[must_use]
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Index<usize> for StateVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<Vec<f64>> for StateVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for StateVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for StateVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StateVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
