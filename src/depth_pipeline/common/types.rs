//! Types shared by every stage of the depth pipeline

/// Which sensor stream a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Color,
    Infrared,
    Depth,
}

impl FrameKind {
    pub const ALL: [FrameKind; 3] = [FrameKind::Color, FrameKind::Infrared, FrameKind::Depth];

    pub fn name(&self) -> &'static str {
        match self {
            FrameKind::Color => "color",
            FrameKind::Infrared => "infrared",
            FrameKind::Depth => "depth",
        }
    }
}

/// Pixel layout of a driver frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit blue, green, red, padding
    Bgrx8,
    /// 8-bit red, green, blue, padding
    Rgbx8,
    /// One native-endian 32-bit float per pixel (infrared and depth)
    Float32,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        4
    }
}

/// Depth camera intrinsics reported by the driver when the device is opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length x (pixel)
    pub fx: f32,
    /// Focal length y (pixel)
    pub fy: f32,
    /// Principal point x (pixel)
    pub cx: f32,
    /// Principal point y (pixel)
    pub cy: f32,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }
}

/// A point in camera-centric coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Points in depth-map row-major order, one per pixel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Width of the depth map the cloud was projected from
    pub width: usize,
    /// Height of the depth map the cloud was projected from
    pub height: usize,
    pub points: Vec<Point3D>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point projected from pixel (x, y)
    pub fn get(&self, x: usize, y: usize) -> Option<&Point3D> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.points.get(y * self.width + x)
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty cloud
    pub fn bounds(&self) -> Option<(Point3D, Point3D)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3D::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3D::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }
}
