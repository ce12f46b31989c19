/// Receives events emitted by a solver.
///
/// Observers are a side channel: they see every event a solver emits but
/// cannot influence what the solver computes.
pub trait Observer<E> {
    /// Observes a solver event.
    fn observe(&mut self, event: &E);
}

/// Blanket implementation for observer closures.
impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

/// A no-op observer that ignores every event.
impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}
