//! Focal-plane packing geometry.
//!
//! Pixel centers on a wafer follow one of two packings: a centered
//! hexagonal layout (sparse LF wafers) or three rhombus grids tiling a
//! hexagon (dense MF/UHF wafers). Detector pointings are expressed as unit
//! quaternions built from tangent-plane offsets.
//!
//! Tangent-plane convention: a detector at angular offsets (xi, eta)
//! radians from boresight with polarization orientation gamma has
//! `q = Rz(phi) * Ry(theta) * Rz(gamma - phi)` where `theta` is the radial
//! offset and `phi = atan2(eta, xi)`. Applying `q` to the +z axis yields
//! the detector direction.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Positions of `npos` points in a centered hexagonal packing.
///
/// Ring 0 is the single center point, ring k holds 6k points walked
/// vertex to vertex. If `npos` does not complete the outer ring, the ring
/// is filled partially. Units of the output match `spacing`.
pub fn hex_layout(npos: usize, spacing: f64) -> Vec<(f64, f64)> {
    let mut positions = Vec::with_capacity(npos);
    if npos == 0 {
        return positions;
    }
    positions.push((0.0, 0.0));

    let mut ring = 1usize;
    while positions.len() < npos {
        'ring: for side in 0..6 {
            let corner_ang = (60.0 * side as f64).to_radians();
            let step_ang = corner_ang + 120.0_f64.to_radians();
            let corner = (
                ring as f64 * spacing * corner_ang.cos(),
                ring as f64 * spacing * corner_ang.sin(),
            );
            for step in 0..ring {
                let x = corner.0 + step as f64 * spacing * step_ang.cos();
                let y = corner.1 + step as f64 * spacing * step_ang.sin();
                positions.push((x, y));
                if positions.len() == npos {
                    break 'ring;
                }
            }
        }
        ring += 1;
    }
    positions
}

/// Positions of `3 * side * side` points in three rhombus grids tiling a
/// hexagon.
///
/// Rhombus r (r = 0, 1, 2) is rotated by r * 120 degrees; cell (i, j) sits
/// at `(i + 0.5) * u + (j + 0.5) * v` where u, v are the rhombus basis
/// vectors separated by 60 degrees. Point index r * side^2 + i * side + j
/// identifies the rhombus as `index / side^2`.
pub fn rhombus_hex_layout(side: usize, spacing: f64) -> Vec<(f64, f64)> {
    let mut positions = Vec::with_capacity(3 * side * side);
    for r in 0..3 {
        let theta = (120.0 * r as f64).to_radians();
        let u = (spacing * theta.cos(), spacing * theta.sin());
        let phi = theta + 60.0_f64.to_radians();
        let v = (spacing * phi.cos(), spacing * phi.sin());
        for i in 0..side {
            for j in 0..side {
                let a = i as f64 + 0.5;
                let b = j as f64 + 0.5;
                positions.push((a * u.0 + b * v.0, a * u.1 + b * v.1));
            }
        }
    }
    positions
}

/// Rotation about the z axis.
fn rot_z(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle)
}

/// Rotation about the y axis.
fn rot_y(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Build a pointing quaternion from tangent-plane offsets.
///
/// `xi`, `eta` are angular offsets in radians; `gamma` is the orientation
/// angle in radians measured from the xi axis.
pub fn xieta_to_quat(xi: f64, eta: f64, gamma: f64) -> UnitQuaternion<f64> {
    let theta = (xi * xi + eta * eta).sqrt();
    let phi = eta.atan2(xi);
    rot_z(phi) * rot_y(theta) * rot_z(gamma - phi)
}

/// Recover tangent-plane offsets (xi, eta, gamma) in radians from a
/// pointing quaternion.
pub fn quat_to_xieta(q: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    let dir = q.transform_vector(&Vector3::z());
    let theta = dir.z.clamp(-1.0, 1.0).acos();
    let phi = dir.y.atan2(dir.x);
    let xi = theta * phi.cos();
    let eta = theta * phi.sin();

    // strip the pointing part to leave the residual orientation rotation
    let residual = (rot_z(phi) * rot_y(theta)).inverse() * q;
    let c = residual.into_inner().coords;
    let psi = 2.0 * c.z.atan2(c.w);
    (xi, eta, psi + phi)
}

/// Pack a unit quaternion into its [x, y, z, w] coefficients.
pub fn quat_to_array(q: &UnitQuaternion<f64>) -> [f64; 4] {
    let c = q.into_inner().coords;
    [c.x, c.y, c.z, c.w]
}

/// Rebuild a unit quaternion from [x, y, z, w] coefficients.
pub fn quat_from_array(a: &[f64; 4]) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(a[3], a[0], a[1], a[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_hex_layout_counts() {
        assert_eq!(hex_layout(1, 1.0).len(), 1);
        assert_eq!(hex_layout(7, 1.0).len(), 7);
        assert_eq!(hex_layout(37, 1.0).len(), 37);
        // partial outer ring
        assert_eq!(hex_layout(10, 1.0).len(), 10);
    }

    #[test]
    fn test_hex_layout_center_and_ring() {
        let pos = hex_layout(7, 2.0);
        assert_eq!(pos[0], (0.0, 0.0));
        for p in &pos[1..] {
            assert!((dist(*p, (0.0, 0.0)) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hex_layout_nearest_neighbor_spacing() {
        let pos = hex_layout(37, 1.0);
        for (i, a) in pos.iter().enumerate() {
            let nearest = pos
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| dist(*a, *b))
                .fold(f64::INFINITY, f64::min);
            assert!((nearest - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rhombus_hex_layout_count_and_symmetry() {
        let pos = rhombus_hex_layout(12, 1.0);
        assert_eq!(pos.len(), 432);
        // three-fold symmetric tiling is centered on the origin
        let (sx, sy) = pos
            .iter()
            .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
        assert!(sx.abs() < 1e-9);
        assert!(sy.abs() < 1e-9);
    }

    #[test]
    fn test_rhombus_hex_layout_no_duplicates() {
        let pos = rhombus_hex_layout(4, 1.0);
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                assert!(dist(pos[i], pos[j]) > 0.1);
            }
        }
    }

    #[test]
    fn test_xieta_roundtrip() {
        let cases = [
            (0.0, 0.0, 0.0),
            (0.01, -0.02, 0.5),
            (-0.03, 0.015, 2.0),
            (0.05, 0.05, -1.2),
        ];
        for (xi, eta, gamma) in cases {
            let q = xieta_to_quat(xi, eta, gamma);
            let (xi2, eta2, gamma2) = quat_to_xieta(&q);
            assert!((xi - xi2).abs() < 1e-9, "xi {} vs {}", xi, xi2);
            assert!((eta - eta2).abs() < 1e-9, "eta {} vs {}", eta, eta2);
            let dg = (gamma - gamma2).rem_euclid(std::f64::consts::TAU);
            assert!(
                dg < 1e-9 || (std::f64::consts::TAU - dg) < 1e-9,
                "gamma {} vs {}",
                gamma,
                gamma2
            );
        }
    }

    #[test]
    fn test_quat_array_roundtrip() {
        let q = xieta_to_quat(0.01, 0.02, 0.3);
        let a = quat_to_array(&q);
        let q2 = quat_from_array(&a);
        assert!((q.angle_to(&q2)).abs() < 1e-12);
        let norm: f64 = a.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }
}
