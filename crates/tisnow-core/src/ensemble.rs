//! Parallel stepping of independent model instances.
//!
//! Instances share nothing, so each runs on its own rayon task.

use rayon::prelude::*;

use crate::error::SnowResult;
use crate::model::SnowModel;

/// Advance every model by one step.
pub fn advance_all(models: &mut [SnowModel]) {
    models.par_iter_mut().for_each(SnowModel::advance_one_step);
}

/// Advance every model to `target`. One result per model, in input order.
pub fn advance_all_until(models: &mut [SnowModel], target: f64) -> Vec<SnowResult<()>> {
    models
        .par_iter_mut()
        .map(|model| model.advance_until(target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::SnowError;

    fn members(swe: &[f64]) -> Vec<SnowModel> {
        swe.iter()
            .map(|&swe_init| {
                let config = Config {
                    swe_init,
                    dayofyear: 81,
                    ..Config::default()
                };
                SnowModel::from_config(&config).unwrap()
            })
            .collect()
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut parallel = members(&[0.0, 1.0, 10.0, 50.0]);
        let mut sequential = parallel.clone();
        for m in parallel.iter_mut().chain(sequential.iter_mut()) {
            m.state_mut().temperature[0] = 5.0;
        }

        advance_all(&mut parallel);
        for m in &mut sequential {
            m.advance_one_step();
        }

        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.state(), s.state());
            assert_eq!(p.time(), s.time());
        }
    }

    #[test]
    fn until_reports_each_member() {
        let mut models = members(&[5.0, 5.0]);
        models[1].advance_until(3.0 * 86_400.0).unwrap();

        let results = advance_all_until(&mut models, 2.0 * 86_400.0);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SnowError::InvalidTarget { .. })));
        assert!((models[0].time() - 172_800.0).abs() < 1e-6);
        assert!((models[1].time() - 259_200.0).abs() < 1e-6);
    }
}
