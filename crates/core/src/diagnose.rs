use crate::StateVector;

/// Derives model-specific diagnostics (energies, projections) from a state.
///
/// Callers only invoke [`Diagnose::diagnose`] on finite states; samples marked
/// undefined after a numerical failure never reach it.
pub trait Diagnose {
    /// The per-sample diagnostic record.
    type Diagnostic;

    /// Computes the diagnostic record for a single state.
    fn diagnose(&self, state: &StateVector) -> Self::Diagnostic;
}

impl<T: Diagnose + ?Sized> Diagnose for &T {
    type Diagnostic = T::Diagnostic;

    fn diagnose(&self, state: &StateVector) -> Self::Diagnostic {
        (**self).diagnose(state)
    }
}
