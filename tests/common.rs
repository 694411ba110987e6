//! Shared helpers for integration tests.

use so_hardware::{nominal, sim_telescope_detectors, Hardware};

/// A small but complete model: nominal tables with detectors simulated
/// only for the LF small-aperture telescope (7 wafers, 1036 detectors).
#[allow(dead_code)]
pub fn small_model() -> Hardware {
    let mut hw = nominal();
    sim_telescope_detectors(&mut hw, "SAT3").expect("simulating SAT3 detectors");
    hw
}
