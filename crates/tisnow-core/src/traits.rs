//! Seam between a single-cell model and the batch runner.

/// Columnar store receiving one flux record per step.
pub trait FluxSink<F> {
    fn with_capacity(n: usize) -> Self;
    fn push(&mut self, record: &F);
}

/// A single-cell model stepped over a forcing series.
pub trait PointModel {
    type Params;
    /// Starting state when the caller gives none is `Default`.
    type State: Clone + Default;
    type Forcing;
    type Fluxes;
    type Output: FluxSink<Self::Fluxes>;
    /// Computed once per run from the parameters.
    type Context;

    fn prepare(params: &Self::Params) -> Self::Context;

    fn step(
        state: Self::State,
        params: &Self::Params,
        forcing: &Self::Forcing,
        context: &Self::Context,
    ) -> (Self::State, Self::Fluxes);

    fn run<I>(params: &Self::Params, forcing: I, initial_state: Option<&Self::State>) -> Self::Output
    where
        I: IntoIterator<Item = Self::Forcing>,
    {
        let forcing = forcing.into_iter();
        let context = Self::prepare(params);
        let mut state = initial_state.cloned().unwrap_or_default();
        let mut output = Self::Output::with_capacity(forcing.size_hint().0);

        for f in forcing {
            let (next, fluxes) = Self::step(state, params, &f, &context);
            output.push(&fluxes);
            state = next;
        }
        output
    }
}
