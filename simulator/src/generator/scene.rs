use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use scancore::Simulation;

/// Validates the scene and seeds a simulation from the workflow config.
pub fn build_simulation(config: &WorkflowConfig) -> anyhow::Result<Simulation<StdRng>> {
    config
        .scene
        .validate()
        .context("validating scene configuration")?;
    Ok(Simulation::new(
        config.scene.clone(),
        StdRng::seed_from_u64(config.seed),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::preset::ScenePreset;

    #[test]
    fn same_seed_spawns_same_pool() {
        let config = WorkflowConfig::from_args(ScenePreset::Cone, 9, 10);
        let a = build_simulation(&config).unwrap();
        let b = build_simulation(&config).unwrap();
        let positions = |sim: &Simulation<StdRng>| {
            sim.pool().iter().map(|ship| ship.position()).collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn invalid_scene_is_rejected() {
        let mut config = WorkflowConfig::from_args(ScenePreset::Line, 0, 10);
        config.scene.tick_rate_hz = -1.0;
        let err = build_simulation(&config).err().unwrap();
        assert!(format!("{:#}", err).contains("tick rate"));
    }
}
