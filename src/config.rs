//! Configuration types for the world and its strands.

use crate::float::Float;
use crate::vec::Vec2;

/// Global tunables shared by every strand in a [`World`](crate::World).
///
/// # Builder Pattern
/// ```
/// use tautline::config::SimulationConfig;
/// use tautline::vec::Vec2;
///
/// let config: SimulationConfig<f32> = SimulationConfig::new()
///     .with_iterations(12)
///     .with_gravity(Vec2::new(0.0, -9.81))
///     .with_fixed_dt(1.0 / 60.0)
///     .with_tear_length(None);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// Gravity acceleration vector. Default: (0, -9.81).
    pub gravity: Vec2<F>,
    /// Number of relaxation passes per step. More iterations = stiffer
    /// ropes but slower. Default: 10.
    pub iterations: usize,
    /// Fixed simulation timestep in seconds. Default: 0.02.
    pub fixed_dt: F,
    /// Extension past rest length at which a stick tears. `None` disables
    /// stretch tearing. Default: `Some(5.0)`.
    pub tear_length: Option<F>,
    /// Whether strands advance when the world is stepped. Default: true.
    pub simulating: bool,
    /// Upper bound on fixed steps taken by one `World::update` call. Default: 8.
    pub max_steps_per_frame: usize,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            gravity: Vec2::new(F::zero(), F::from_f32(-9.81)),
            iterations: 10,
            fixed_dt: F::from_f32(0.02),
            tear_length: Some(F::from_f32(5.0)),
            simulating: true,
            max_steps_per_frame: 8,
        }
    }

    /// Set the number of relaxation iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the fixed timestep.
    pub fn with_fixed_dt(mut self, fixed_dt: F) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    /// Set or disable the stretch tear threshold.
    pub fn with_tear_length(mut self, tear_length: Option<F>) -> Self {
        self.tear_length = tear_length;
        self
    }

    /// Start with simulation enabled or paused.
    pub fn with_simulating(mut self, simulating: bool) -> Self {
        self.simulating = simulating;
        self
    }

    /// Set the per-frame step cap.
    pub fn with_max_steps_per_frame(mut self, max_steps: usize) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-strand settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrandConfig<F: Float> {
    /// Collision radius of every point, also the picking radius. Default: 0.1.
    pub point_radius: F,
    /// Target distance between points generated along a path. Default: 0.25.
    pub path_spacing: F,
}

impl<F: Float> StrandConfig<F> {
    pub fn new() -> Self {
        StrandConfig {
            point_radius: F::from_f32(0.1),
            path_spacing: F::from_f32(0.25),
        }
    }

    pub fn with_point_radius(mut self, point_radius: F) -> Self {
        self.point_radius = point_radius;
        self
    }

    pub fn with_path_spacing(mut self, path_spacing: F) -> Self {
        self.path_spacing = path_spacing;
        self
    }
}

impl<F: Float> Default for StrandConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// The slice of [`SimulationConfig`] a strand needs for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams<F: Float> {
    pub gravity: Vec2<F>,
    pub dt: F,
    pub iterations: usize,
    pub tear_length: Option<F>,
}

impl<F: Float> From<&SimulationConfig<F>> for StepParams<F> {
    fn from(config: &SimulationConfig<F>) -> Self {
        StepParams {
            gravity: config.gravity,
            dt: config.fixed_dt,
            iterations: config.iterations,
            tear_length: config.tear_length,
        }
    }
}
