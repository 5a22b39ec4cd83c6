use std::path::PathBuf;

use approx::assert_relative_eq;
use lidarcam::calib::CalibrationFormatError;
use lidarcam::image::{Image, ImageError, ImageSize};
use lidarcam::k3d::{BoundingBox3D, Point3D, ProjectionError, RigGeometry, RigidOffset};
use lidarcam::{Frame, OverlayStyle, Projector};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn gradient(size: ImageSize) -> Result<Image<u8, 3>, ImageError> {
    let mut data = Vec::with_capacity(size.area() * 3);
    for y in 0..size.height {
        for x in 0..size.width {
            data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8]);
        }
    }
    Image::new(size, data)
}

#[test]
fn load_ros_calibration() -> Result<(), CalibrationFormatError> {
    let projector = Projector::from_file(data_path("ost.yaml"))?;

    assert_eq!(
        projector.camera_matrix(),
        &[[1000.0, 0.0, 320.0], [0.0, 1000.0, 240.0], [0.0, 0.0, 1.0]]
    );
    assert_eq!(
        projector.distortion_coefficients().as_slice(),
        &[-0.2, 0.05, 0.001, -0.001, 0.0]
    );
    assert_eq!(projector.projection_matrix()[2], [0.0, 0.0, 1.0, 0.0]);
    assert_eq!(
        projector.calibration().image_size(),
        Some(ImageSize {
            width: 640,
            height: 480
        })
    );
    assert_eq!(projector.calibration().camera_name(), Some("narrow_stereo"));
    Ok(())
}

#[test]
fn load_json_calibration() -> Result<(), CalibrationFormatError> {
    let projector = Projector::from_file(data_path("pinhole.json"))?;
    assert_eq!(projector.camera_matrix()[0], [500.0, 0.0, 16.0]);
    assert!(projector.distortion_coefficients().is_zero());
    Ok(())
}

#[test]
fn reject_mismatched_shape() {
    let res = Projector::from_file(data_path("bad_shape.yaml"));
    assert!(matches!(
        res,
        Err(CalibrationFormatError::DataLengthMismatch {
            field: "camera_matrix",
            rows: 3,
            cols: 3,
            len: 8
        })
    ));
}

#[test]
fn reject_missing_file() {
    let res = Projector::from_file(data_path("missing.yaml"));
    assert!(matches!(res, Err(CalibrationFormatError::Io(_))));
}

#[test]
fn vehicle_rig_projects_through_principal_point() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::from_file(data_path("ost.yaml"))?;
    let [ox, oy, oz] = RigidOffset::VEHICLE.0;

    // five meters straight ahead of the camera, seen from the range sensor
    let point = Point3D::new(5.0 + ox, oy, oz);
    let camera = projector.frame_transform(&point);
    assert_relative_eq!(camera.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(camera.y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(camera.z, 5.0, epsilon = 1e-12);

    let pixel = projector.project_point(&point)?;
    assert_relative_eq!(pixel.u, 320.0, epsilon = 1e-9);
    assert_relative_eq!(pixel.v, 240.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn points_behind_the_camera_are_flagged() -> Result<(), CalibrationFormatError> {
    let projector = Projector::from_file(data_path("ost.yaml"))?;
    let results = projector.project_points(&[
        Point3D::new(-10.0, 0.0, 0.0),
        Point3D::new(12.0, 1.0, 0.5),
        Point3D::new(RigidOffset::VEHICLE.0[0], 0.0, 0.0),
    ]);

    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], Err(ProjectionError::BehindCamera(_))));
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(ProjectionError::BehindCamera(_))));
    Ok(())
}

#[test]
fn bbox_corners_project_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::from_file(data_path("ost.yaml"))?;
    let bbox = BoundingBox3D::new(Point3D::new(15.0, 0.0, -1.7), [4.2, 1.8, 1.5], 0.0);
    let corners = bbox.corners();
    let results = projector.project_points(&corners);

    assert_eq!(results.len(), 8);
    for (corner, result) in corners.iter().zip(&results) {
        assert_eq!(*result, projector.project_point(corner));
    }

    let pixels = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    // left of the vehicle is left in the image, the top face is above the bottom face
    assert!(pixels[0].u < pixels[1].u);
    assert!(pixels[4].v < pixels[0].v);
    Ok(())
}

#[test]
fn undistort_keeps_size_and_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::from_file(data_path("ost.yaml"))?;
    let image = gradient(ImageSize {
        width: 64,
        height: 48,
    })?;

    let a = projector.undistort_image(&image)?;
    let b = projector.undistort_image(&image)?;
    assert_eq!(a.size(), image.size());
    assert_eq!(a, b);

    let map = projector.correction_map(image.size())?;
    assert_eq!(projector.undistort_image_with_map(&image, &map)?, a);
    Ok(())
}

#[test]
fn undistort_without_distortion_is_identity() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::from_file(data_path("pinhole.json"))?;
    let image = gradient(ImageSize {
        width: 32,
        height: 24,
    })?;
    assert_eq!(projector.undistort_image(&image)?, image);
    Ok(())
}

#[test]
fn undistort_rejects_empty_image() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::from_file(data_path("pinhole.json"))?;
    let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
    assert_eq!(
        projector.undistort_image(&image),
        Err(ImageError::EmptyImage(0, 0))
    );
    Ok(())
}

#[test]
fn process_and_draw_frame() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::with_rig(
        lidarcam::calib::load(data_path("pinhole.json"))?,
        RigGeometry::with_offset(RigidOffset::ZERO),
    );
    let image = Image::<u8, 3>::from_size_val([32, 24].into(), 0)?;

    let frame = Frame::new(image)
        .with_center(Point3D::new(100.0, 0.0, 0.0))
        .with_corners(vec![Point3D::new(100.0, 0.0, 0.0), Point3D::new(-5.0, 0.0, 0.0)]);
    let mut projected = projector.process_frame(&frame)?;

    let center = projected.center.ok_or("missing center")??;
    assert_eq!((center.u, center.v), (16.0, 12.0));
    assert_eq!(projected.valid_corners().count(), 1);

    let drawn = projected.draw_overlay(&OverlayStyle::default());
    assert_eq!(drawn, 2);
    // the corner marker is drawn over the center marker
    assert_eq!(projected.image.get_pixel(21, 12, 0)?, 0);
    assert_eq!(projected.image.get_pixel(21, 12, 1)?, 255);
    assert_eq!(projected.image.get_pixel(16, 12, 1)?, 0);
    Ok(())
}

#[test]
fn extreme_projections_are_skipped_when_drawing() -> Result<(), Box<dyn std::error::Error>> {
    let projector = Projector::with_rig(
        lidarcam::calib::load(data_path("ost.yaml"))?,
        RigGeometry::with_offset(RigidOffset::ZERO),
    );
    let image = Image::<u8, 3>::from_size_val([64, 48].into(), 0)?;

    // a hair in front of the camera plane projects to a finite but enormous pixel
    let grazing = Point3D::new(1e-17, 1.0, 0.0);
    let frame = Frame::new(image)
        .with_center(grazing)
        .with_corners(vec![grazing, Point3D::new(-1.0, 0.0, 0.0)]);
    let mut projected = projector.process_frame(&frame)?;

    assert!(matches!(&projected.center, Some(Ok(p)) if p.u.abs() > 1e15));
    assert!(projected.corners[1].is_err());
    assert_eq!(projected.draw_overlay(&OverlayStyle::default()), 0);
    assert!(projected.image.as_slice().iter().all(|&p| p == 0));
    Ok(())
}

#[test]
fn load_column_distortion_layout() -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(data_path("ost.yaml"))?.replace(
        "  rows: 1\n  cols: 5\n  data: [-0.2, 0.05, 0.001, -0.001, 0.0]",
        "  rows: 4\n  cols: 1\n  data: [-0.2, 0.05, 0.001, -0.001]",
    );
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("column.yaml");
    std::fs::write(&path, text)?;

    let projector = Projector::from_file(&path)?;
    assert_eq!(projector.distortion_coefficients().len(), 4);
    assert_eq!(projector.distortion_coefficients().p2(), -0.001);
    Ok(())
}
