use approx::assert_abs_diff_eq;
use panostitch_core::camera::{Camera, CameraBasis, Direction, EdgePolicy, Projection};
use panostitch_core::frame::{FieldOfView, Orientation};

#[test]
fn test_basis_orthonormal_over_sphere() {
    for az_step in 0..24 {
        for el_step in 0..=12 {
            let az = az_step as f64 * 15.0;
            let el = -90.0 + el_step as f64 * 15.0;
            let b = CameraBasis::from_orientation(&Orientation::new(az, el));

            for v in [&b.forward, &b.right, &b.up] {
                assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-6);
            }
            assert_abs_diff_eq!(b.forward.dot(&b.right), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(b.forward.dot(&b.up), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(b.right.dot(&b.up), 0.0, epsilon = 1e-6);
            // Same handedness everywhere.
            assert_abs_diff_eq!(b.right.cross(&b.up).dot(&b.forward), 1.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_own_axis_projects_to_center() {
    let fov = FieldOfView::new(60.0, 45.0);
    for (az, el) in [(0.0, 0.0), (90.0, 10.0), (200.0, -45.0), (359.0, 80.0)] {
        let camera = Camera::new(&Orientation::new(az, el), &fov);
        let (u, v) = camera
            .project(&Direction::from_angles(az, el))
            .coords()
            .unwrap();
        assert_abs_diff_eq!(u, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(v, 0.5, epsilon = 1e-12);
    }
}

#[test]
fn test_opposite_direction_is_behind() {
    let camera = Camera::new(&Orientation::new(30.0, 0.0), &FieldOfView::default());
    assert_eq!(
        camera.project(&Direction::from_angles(210.0, 0.0)),
        Projection::Behind
    );
    // Perpendicular directions fall under the grazing guard.
    assert_eq!(
        camera.project(&Direction::from_angles(120.0, 0.0)),
        Projection::Behind
    );
}

#[test]
fn test_outside_fov_is_out_of_frame() {
    let camera = Camera::new(&Orientation::default(), &FieldOfView::new(60.0, 60.0));
    assert_eq!(
        camera.project(&Direction::from_angles(45.0, 0.0)),
        Projection::OutOfFrame
    );
    assert!(camera.project(&Direction::from_angles(25.0, 0.0)).is_visible());
}

#[test]
fn test_image_axes_follow_right_and_up() {
    let camera = Camera::new(&Orientation::default(), &FieldOfView::new(60.0, 60.0));
    // Positive azimuth is to the right, positive elevation is toward the top row.
    let (u, _) = camera
        .project(&Direction::from_angles(10.0, 0.0))
        .coords()
        .unwrap();
    let (_, v) = camera
        .project(&Direction::from_angles(0.0, 10.0))
        .coords()
        .unwrap();
    assert!(u > 0.5);
    assert!(v < 0.5);
}

#[test]
fn test_half_fov_lands_on_frame_edge() {
    let camera = Camera::new(&Orientation::default(), &FieldOfView::new(60.0, 40.0));
    let (u, v) = camera
        .project(&Direction::from_angles(-29.99, 0.0))
        .coords()
        .unwrap();
    assert_abs_diff_eq!(u, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(v, 0.5, epsilon = 1e-9);
}

#[test]
fn test_unproject_inverts_project() {
    let camera = Camera::new(&Orientation::new(140.0, 25.0), &FieldOfView::new(55.0, 75.0));
    for &(u, v) in &[(0.1, 0.2), (0.5, 0.5), (0.9, 0.75), (0.02, 0.98)] {
        let (pu, pv) = camera.project(&camera.unproject(u, v)).coords().unwrap();
        assert_abs_diff_eq!(pu, u, epsilon = 1e-9);
        assert_abs_diff_eq!(pv, v, epsilon = 1e-9);
    }
}

#[test]
fn test_clamp_policy_still_rejects_far_outside() {
    let camera = Camera::new(&Orientation::default(), &FieldOfView::new(60.0, 60.0))
        .with_edge_policy(EdgePolicy::Clamp { margin: 0.02 });
    assert_eq!(
        camera.project(&camera.unproject(1.2, 0.5)),
        Projection::OutOfFrame
    );
}

#[test]
fn test_elevation_beyond_pole_is_clamped() {
    let a = CameraBasis::from_orientation(&Orientation::new(0.0, 120.0));
    let b = CameraBasis::from_orientation(&Orientation::new(0.0, 90.0));
    assert_abs_diff_eq!((a.forward - b.forward).norm(), 0.0, epsilon = 1e-12);
}
