use tisnow_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
pub struct StepFluxes {
    pub snowfall: f64,
    pub rainfall: f64,
    pub outflow: f64,
}

fn main() {
    let mut ts = StepFluxesTimeseries::with_capacity(4);
    assert!(ts.is_empty());
    assert!(ts.last().is_none());

    ts.push(&StepFluxes { snowfall: 1.0, rainfall: 2.0, outflow: 3.0 });
    ts.push(&StepFluxes { snowfall: 0.0, rainfall: 5.0, outflow: 7.5 });

    assert_eq!(ts.len(), 2);
    assert_eq!(ts.column("outflow"), Some(&[3.0, 7.5][..]));
    assert!(ts.column("swe").is_none());
    assert_eq!(ts.last().map(|f| f.rainfall), Some(5.0));
    assert_eq!(StepFluxes::field_names(), &["snowfall", "rainfall", "outflow"]);
}
