use argh::FromArgs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use lidarcam::{
    image::{Image, ImageSize},
    imgproc::undistort::CorrectionMap,
    k3d::{BoundingBox3D, Point3D},
    Frame, OverlayStyle, Projector,
};

#[derive(FromArgs)]
/// Undistort camera frames and draw the projected range-sensor detections on them
struct Args {
    /// path to the calibration file (yaml or json)
    #[argh(option, short = 'c')]
    calibration: PathBuf,

    /// path to a json manifest listing the frames and their detections
    #[argh(option, short = 'm')]
    manifest: PathBuf,

    /// directory where the images are written
    #[argh(option, short = 'o', default = "PathBuf::from(\"output\")")]
    output_dir: PathBuf,

    /// write every n-th frame
    #[argh(option, default = "25")]
    every: usize,

    /// stop after writing this many frames
    #[argh(option)]
    max_outputs: Option<usize>,
}

/// A detected object as a box in the range-sensor frame.
#[derive(Deserialize)]
struct BoxEntry {
    center: [f64; 3],
    size: [f64; 3],
    #[serde(default)]
    yaw: f64,
}

/// One frame of the manifest.
#[derive(Deserialize)]
struct FrameEntry {
    /// image path, relative to the manifest
    image: PathBuf,
    #[serde(default)]
    center: Option<[f64; 3]>,
    #[serde(default)]
    bbox: Option<BoxEntry>,
    #[serde(default)]
    corners: Vec<[f64; 3]>,
}

impl FrameEntry {
    fn into_frame(self, image: Image<u8, 3>) -> Frame<u8, 3> {
        let mut frame = Frame::new(image);
        if let Some(b) = &self.bbox {
            frame = frame.with_bbox(&BoundingBox3D::new(b.center.into(), b.size, b.yaw));
        }
        if !self.corners.is_empty() {
            frame = frame.with_corners(self.corners.into_iter().map(Point3D::from).collect());
        }
        if let Some(center) = self.center {
            frame = frame.with_center(center.into());
        }
        frame
    }
}

fn read_rgb8(path: &Path) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let img = image::open(path)?.into_rgb8();
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_raw())?)
}

fn write_rgb8(path: &Path, img: &Image<u8, 3>) -> Result<(), Box<dyn std::error::Error>> {
    let [width, height]: [u32; 2] = img.size().into();
    image::save_buffer(path, img.as_slice(), width, height, image::ColorType::Rgb8)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    if args.every == 0 {
        return Err("--every must be at least 1".into());
    }

    let projector = Projector::from_file(&args.calibration)?;
    log::info!(
        "loaded calibration from {} ({} distortion coefficients)",
        args.calibration.display(),
        projector.distortion_coefficients().len()
    );

    let entries: Vec<FrameEntry> =
        serde_json::from_str(&std::fs::read_to_string(&args.manifest)?)?;
    let base_dir = args.manifest.parent().unwrap_or(Path::new("."));

    std::fs::create_dir_all(&args.output_dir)?;

    let style = OverlayStyle::default();
    let mut cached_map: Option<CorrectionMap> = None;
    let mut written = 0;

    for (n, entry) in entries.into_iter().enumerate() {
        if n % args.every != 0 {
            continue;
        }
        if args.max_outputs.is_some_and(|max| written >= max) {
            break;
        }

        let image_path = base_dir.join(&entry.image);
        let image = read_rgb8(&image_path)?;

        // the map only depends on the image size
        let map = match cached_map.take() {
            Some(m) if m.size() == image.size() => cached_map.insert(m),
            _ => cached_map.insert(projector.correction_map(image.size())?),
        };

        let frame = entry.into_frame(image);
        let mut projected = projector.process_frame_with_map(&frame, map)?;
        let drawn = projected.draw_overlay(&style);

        write_rgb8(&args.output_dir.join(format!("orig_{n}.png")), &frame.image)?;
        write_rgb8(
            &args.output_dir.join(format!("undist_{n}.png")),
            &projected.image,
        )?;

        log::info!(
            "frame {n}: {} -> {} markers drawn",
            image_path.display(),
            drawn
        );
        written += 1;
    }

    println!(
        "Wrote {} frame pairs to {}",
        written,
        args.output_dir.display()
    );

    Ok(())
}
