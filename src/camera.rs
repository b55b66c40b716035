use glam::{Mat4, Vec2, Vec3};

/// Fixed viewer camera. Models are placed relative to it, so it never moves.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees: 60.0,
        }
    }
}

impl Camera {
    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            resolution.x / resolution.y,
            0.1,
            100.0,
        );
        projection * view
    }

    /// Projects a world-space point to pixel coordinates (origin top-left), or `None` if the
    /// point is behind the camera.
    pub fn project(&self, point: Vec3, resolution: Vec2) -> Option<Vec2> {
        if resolution.x <= 0.0 || resolution.y <= 0.0 {
            return None;
        }

        let clip = self.get_vp_matrix(resolution) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * resolution.x,
            (0.5 - ndc.y * 0.5) * resolution.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ahead_projects_to_screen_centre() {
        let camera = Camera::default();
        let resolution = Vec2::new(800.0, 600.0);

        let centre = camera.project(Vec3::new(0.0, 0.0, -3.0), resolution).unwrap();

        assert!(centre.abs_diff_eq(Vec2::new(400.0, 300.0), 1e-3));
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let camera = Camera::default();

        assert!(camera
            .project(Vec3::new(0.0, 0.0, 3.0), Vec2::new(800.0, 600.0))
            .is_none());
    }

    #[test]
    fn left_of_centre_stays_left() {
        let camera = Camera::default();
        let resolution = Vec2::new(800.0, 600.0);

        let point = camera.project(Vec3::new(-1.0, 1.0, -3.0), resolution).unwrap();

        assert!(point.x < 400.0);
        assert!(point.y < 300.0);
    }
}
