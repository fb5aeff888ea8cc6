// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end checks of the conversions between rotation representations.

use approx::assert_relative_eq;
use khora_rotation::math::{degrees_to_radians, EPSILON, FRAC_PI_2, PI};
use khora_rotation::{Mat4, MatrixElements, Quaternion, RotationError, Vec3, Vec4};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_axes() -> Vec<Vec3> {
    vec![
        Vec3::X,
        Vec3::Y,
        Vec3::Z,
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 2.5, 0.7),
        Vec3::new(0.2, -0.9, -4.0),
    ]
}

fn sample_angles() -> Vec<f32> {
    [-170.0, -90.0, -12.5, 3.0, 45.0, 90.0, 135.0, 179.0]
        .into_iter()
        .map(degrees_to_radians)
        .collect()
}

/// Same rotation up to double cover.
fn assert_same_rotation(a: Quaternion, b: Quaternion) {
    let cos = a.dot(b).abs();
    assert!(
        (cos - 1.0).abs() < EPSILON * 10.0,
        "{a:?} and {b:?} are different rotations (|dot| = {cos})"
    );
}

#[test]
fn quarter_turn_about_z_regression() {
    let q = Quaternion::from_axis_angle(FRAC_PI_2, Vec3::Z);
    assert_relative_eq!(
        q,
        Quaternion::new(0.0, 0.0, -0.70711, 0.70711),
        epsilon = EPSILON
    );

    let m = Mat4::from_quat(q);
    assert_relative_eq!(
        m.transform_vector3(Vec3::X),
        Vec3::new(0.0, -1.0, 0.0),
        epsilon = EPSILON
    );
}

#[test]
fn identity_matrix_and_identity_quaternion_convert_exactly() {
    assert_eq!(
        Quaternion::from_matrix(&Mat4::IDENTITY),
        Quaternion::IDENTITY
    );
    assert_eq!(Mat4::from_quat(Quaternion::IDENTITY), Mat4::IDENTITY);
}

#[test]
fn axis_angle_extraction_recovers_construction() {
    for axis in sample_axes() {
        let unit_axis = axis.normalize();
        for angle in sample_angles() {
            let q = Quaternion::from_axis_angle(angle, axis);
            assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);

            let (extracted_angle, extracted_axis) = q.to_axis_angle();
            assert_relative_eq!(extracted_axis.length(), 1.0, epsilon = EPSILON);

            // The extracted pair is right-handed: (|angle|, -sign(angle) * axis).
            assert_relative_eq!(extracted_angle, angle.abs(), epsilon = EPSILON * 10.0);
            let parallel = extracted_axis.dot(unit_axis);
            assert_relative_eq!(parallel, -angle.signum(), epsilon = EPSILON * 10.0);

            let rebuilt = Quaternion::from_axis_angle(-extracted_angle, extracted_axis);
            assert_same_rotation(rebuilt, q);
        }
    }
}

#[test]
fn matrix_round_trip_preserves_rotation() {
    for axis in sample_axes() {
        for angle in sample_angles() {
            let q = Quaternion::from_axis_angle(angle, axis);
            let m = Mat4::from_quat(q);
            let back = Quaternion::from_matrix(&m);

            assert_same_rotation(back, q);
            assert_relative_eq!(Mat4::from_quat(back), m, epsilon = EPSILON * 10.0);
        }
    }
}

#[test]
fn matrix_from_quaternion_is_a_pure_rotation() {
    let q = Quaternion::from_axis_angle(1.85, Vec3::new(-1.0, 2.5, 0.7));
    let mut m = Mat4::IDENTITY;
    m.cols[3] = Vec4::new(3.0, 4.0, 5.0, 2.0);
    q.write_to_matrix(&mut m);

    for i in 0..3 {
        assert_eq!(m.element(i, 3), 0.0);
        assert_eq!(m.element(3, i), 0.0);
    }
    assert_eq!(m.element(3, 3), 1.0);

    // Rows of the rotation block are orthonormal.
    for i in 0..4 {
        for j in 0..4 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(
                m.get_row(i).dot(m.get_row(j)),
                expected,
                epsilon = EPSILON * 10.0
            );
        }
    }
}

#[test]
fn rotation_arc_maps_first_direction_onto_second() {
    init_logger();
    let pairs = [
        (Vec3::X, Vec3::Y),
        (Vec3::new(1.0, 2.0, 3.0), Vec3::new(-3.0, 0.5, 2.0)),
        (Vec3::new(0.0, -5.0, 0.1), Vec3::new(4.0, 4.0, -4.0)),
    ];
    for (from, to) in pairs {
        let q = Quaternion::from_rotation_arc(from, to);
        let rotated = Mat4::from_quat(q).transform_vector3(from.normalize());
        assert_relative_eq!(rotated, to.normalize(), epsilon = EPSILON * 10.0);
    }
}

#[test]
fn rotation_arc_of_a_vector_onto_itself_is_identity() {
    init_logger();
    for v in sample_axes() {
        let q = Quaternion::from_rotation_arc(v, v);
        assert_relative_eq!(q, Quaternion::IDENTITY, epsilon = EPSILON);
    }
}

#[test]
fn rotation_arc_onto_opposite_is_a_half_turn() {
    init_logger();
    for v in sample_axes() {
        let q = Quaternion::from_rotation_arc(v, -v);

        let (angle, axis) = q.to_axis_angle();
        assert_relative_eq!(angle, PI, epsilon = EPSILON * 10.0);
        assert_relative_eq!(axis.dot(v.normalize()), 0.0, epsilon = EPSILON);

        let rotated = Mat4::from_quat(q).transform_vector3(v);
        assert_relative_eq!(rotated, -v, epsilon = EPSILON * 10.0);
    }
}

#[test]
fn slerp_boundaries_are_exact() {
    let axes = sample_axes();
    let angles = sample_angles();
    for (i, axis) in axes.iter().enumerate() {
        let a = Quaternion::from_axis_angle(angles[i], *axis);
        let b = Quaternion::from_axis_angle(angles[i + 1], axes[(i + 1) % axes.len()]);
        assert_eq!(Quaternion::slerp(0.0, a, b), a);
        assert_eq!(Quaternion::slerp(1.0, a, b), b);
    }
}

#[test]
fn slerp_between_equal_rotations_is_a_no_op() {
    for axis in sample_axes() {
        let a = Quaternion::from_axis_angle(0.7, axis);
        assert_relative_eq!(Quaternion::slerp(0.5, a, a), a, epsilon = EPSILON);
    }
}

#[test]
fn slerp_moves_at_constant_angular_speed() {
    let from = Quaternion::from_axis_angle(0.2, Vec3::Y);
    let to = Quaternion::from_axis_angle(1.4, Vec3::Y);
    for step in 0..=10 {
        let t = step as f32 / 10.0;
        let q = Quaternion::slerp(t, from, to);
        let expected = Quaternion::from_axis_angle(0.2 + 1.2 * t, Vec3::Y);
        assert_relative_eq!(q, expected, epsilon = EPSILON * 10.0);
    }
}

#[test]
fn checked_operations_report_violated_preconditions() {
    init_logger();
    assert_eq!(
        Quaternion::try_from_axis_angle(1.0, Vec3::ZERO),
        Err(RotationError::DegenerateAxis)
    );
    assert_eq!(
        Quaternion::try_from_rotation_arc(Vec3::ZERO, Vec3::Y),
        Err(RotationError::ZeroLengthVector)
    );
    assert!(matches!(
        Quaternion::IDENTITY.try_to_axis_angle(),
        Err(RotationError::UndefinedAxis { .. })
    ));
    assert!(matches!(
        Quaternion::try_slerp(0.5, Quaternion::new(0.0, 0.0, 0.0, 3.0), Quaternion::IDENTITY),
        Err(RotationError::NotNormalized { .. })
    ));

    let q = Quaternion::try_from_axis_angle(0.3, Vec3::Z).expect("valid axis");
    assert_eq!(q, Quaternion::from_axis_angle(0.3, Vec3::Z));
}

#[test]
fn quaternion_serializes_as_plain_components() {
    let q = Quaternion::from_axis_angle(0.5, Vec3::X);
    let json = serde_json::to_string(&q).expect("serialize");
    assert!(json.contains("\"w\""));
    let back: Quaternion = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, q);

    let bytes: &[u8] = bytemuck::bytes_of(&q);
    assert_eq!(bytes.len(), 16);
}

#[test]
fn rotations_round_trip_through_bincode() {
    let config = bincode::config::standard();

    let q = Quaternion::from_axis_angle(0.5, Vec3::X);
    let bytes = bincode::encode_to_vec(q, config).expect("encode quaternion");
    let (back, read): (Quaternion, usize) =
        bincode::decode_from_slice(&bytes, config).expect("decode quaternion");
    assert_eq!(back, q);
    assert_eq!(read, bytes.len());
    assert_relative_eq!(back.to_axis_angle().0, 0.5, epsilon = EPSILON);

    let axis = Vec3::new(-1.0, 2.5, 0.7);
    let bytes = bincode::encode_to_vec(axis, config).expect("encode axis");
    let (back, _): (Vec3, usize) =
        bincode::decode_from_slice(&bytes, config).expect("decode axis");
    assert_eq!(back, axis);
}
