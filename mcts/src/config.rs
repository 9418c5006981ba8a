//! Search configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of simulations to run per decision.
    pub num_simulations: u32,

    /// Exploration constant in the selection score. Higher values favor
    /// exploration, lower values exploitation. Typical range 1.0 - 4.0.
    pub c_puct: f32,

    /// Dirichlet noise alpha mixed into root priors for self-play
    /// exploration. Set to 0.0 to disable.
    pub dirichlet_alpha: f32,

    /// Fraction of the root prior replaced by Dirichlet noise.
    pub dirichlet_epsilon: f32,

    /// Temperature for move selection after search.
    /// 1.0 = sample proportional to visit counts,
    /// 0.0 = always pick the most-visited move.
    pub temperature: f32,

    /// Ply count after which callers switch the temperature to 0 and
    /// play deterministically.
    pub temp_threshold: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 800,
            c_puct: 1.25,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.25,
            temperature: 1.0,
            temp_threshold: 30,
        }
    }
}

impl MctsConfig {
    /// Config for self-play (exploration noise on).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Config for playing out a match: no root noise, visit-proportional
    /// sampling early, deterministic once past the temperature threshold.
    pub fn for_play() -> Self {
        Self {
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
            ..Self::default()
        }
    }

    /// A fast config for tests.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            c_puct: 1.25,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
            temperature: 0.0,
            temp_threshold: 0,
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set the selection temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    /// Builder pattern: set the deterministic-play threshold.
    pub fn with_temp_threshold(mut self, plies: u32) -> Self {
        self.temp_threshold = plies;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 800);
        assert!((config.c_puct - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_temperature(0.5);

        assert_eq!(config.num_simulations, 100);
        assert!((config.temperature - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_play_config_has_no_noise() {
        let config = MctsConfig::for_play();
        assert!((config.dirichlet_alpha).abs() < 1e-6);
        assert!((config.temperature - 1.0).abs() < 1e-6);
    }
}
