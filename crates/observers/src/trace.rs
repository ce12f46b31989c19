//! Trace recording for plotting run output.
//!
//! See [`TraceRecorder`] and [`Traceable`] for usage.

use strand_core::Observer;

use crate::traits::HasSample;

/// Extracts trace points from an event.
///
/// Return `None` from [`x`][Traceable::x] to skip the event entirely, or
/// `None` in a trace slot to skip only that trace.
///
/// Every [`HasSample`] event is traceable against time, with one trace per
/// state component chosen by [`TraceRecorder::components`].
pub trait Traceable<const N: usize> {
    /// The x-axis value for this event.
    fn x(&self) -> Option<f64>;

    /// The y-axis values, one per trace.
    fn traces(&self, components: &[usize; N]) -> [Option<f64>; N];
}

impl<E: HasSample, const N: usize> Traceable<N> for E {
    fn x(&self) -> Option<f64> {
        self.sample().map(|(time, _)| time)
    }

    fn traces(&self, components: &[usize; N]) -> [Option<f64>; N] {
        let state = self.sample().map(|(_, state)| state);
        (*components).map(|index| state.and_then(|s| s.as_slice().get(index).copied()))
    }
}

/// Collects named `(x, y)` traces for later plotting.
///
/// Record either by passing the recorder to a runner, which traces the chosen
/// state components against time, or by calling
/// [`record`][TraceRecorder::record] from a closure observer.
///
/// # Example
///
/// ```ignore
/// let mut traces = TraceRecorder::components(["angle", "omega"], [0, 1]);
/// runner::run(&pendulum, initial, &config, &mut traces)?;
///
/// for (name, points) in traces.traces() {
///     println!("{name}: {} points", points.len());
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecorder<const N: usize> {
    names: [String; N],
    components: [usize; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> TraceRecorder<N> {
    /// Creates a recorder whose traces are filled by [`record`][Self::record].
    ///
    /// Trace `i` maps to state component `i` when observing events.
    #[must_use]
    pub fn new(names: [&str; N]) -> Self {
        Self::components(names, std::array::from_fn(|i| i))
    }

    /// Creates a recorder that traces the given state components.
    #[must_use]
    pub fn components(names: [&str; N], components: [usize; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            components,
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records one point across all traces, skipping `None` slots.
    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        for (points, y) in self.data.iter_mut().zip(traces) {
            if let Some(y) = y {
                points.push([x, y]);
            }
        }
    }

    /// Returns each trace name with its points.
    pub fn traces(&self) -> impl Iterator<Item = (&str, &[[f64; 2]])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().map(Vec::as_slice))
    }

    /// Returns the points of the named trace.
    #[must_use]
    pub fn trace(&self, name: &str) -> Option<&[[f64; 2]]> {
        self.traces()
            .find_map(|(trace, points)| (trace == name).then_some(points))
    }
}

impl<const N: usize, E: Traceable<N>> Observer<E> for TraceRecorder<N> {
    fn observe(&mut self, event: &E) {
        if let Some(x) = event.x() {
            let traces = event.traces(&self.components);
            self.record(x, traces);
        }
    }
}

impl<const N: usize, E: Traceable<N>> Observer<E> for &mut TraceRecorder<N> {
    fn observe(&mut self, event: &E) {
        (*self).observe(event);
    }
}
