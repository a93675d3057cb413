use tisnow_macros::Fluxes;

#[derive(Debug, Clone, Copy, Fluxes)]
#[fluxes(timeseries_name = "PackSeries")]
pub struct PackFluxes {
    pub melt: f64,
    pub swe: f64,
}

fn main() {
    let mut ts = PackSeries::with_capacity(1);
    ts.push(&PackFluxes { melt: 1.5, swe: 50.0 });
    assert_eq!(ts.len(), 1);
    assert_eq!(ts.swe, vec![50.0]);
    assert_eq!(PackFluxes::field_names(), &["melt", "swe"]);
}
