//! The map view: camera state, matrices, coordinate conversion and
//! visible-tile determination.
//!
//! A [`View`]
//! 1. stores a representation of the current view into the map world,
//! 2. determines which tiles are visible in the current view,
//! 3. tracks changes in the view state to determine when new rendering is
//!    needed.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, Rotation3, Vector2, Vector3, Vector4};

use crate::cached::Cached;
use crate::camera::{self, Camera, CameraProjection, CameraType};
use crate::mercator::{self, LngLat, ProjectedBounds};
use crate::rasterize;
use crate::stops::{Stops, ZoomDependent};
use crate::tile_id::TileID;

/// Number of zoom levels a tile may be coarsened by for viewport areas far
/// from the view center.
pub const MAX_LOD: usize = 6;

const MIN_ZOOM_LIMIT: f32 = 0.0;
const MAX_ZOOM_LIMIT: f32 = 20.5;
const TWO_PI: f32 = 2.0 * std::f32::consts::PI;

/// Tile-space radius that maps to the given level of detail.
fn inv_lod_func(d: f64) -> f64 {
    d.exp2() - 1.0
}

/// Result of casting a screen-pixel ray onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundIntersection {
    /// Intersection point relative to the view center, in projected meters.
    pub offset: Vector2<f64>,
    /// Un-normalized distance along the ray into the screen. Negative means
    /// the ray points above the horizon; the offset is then clamped to the
    /// maximum tile distance along the same direction.
    pub distance: f64,
}

impl GroundIntersection {
    /// Whether the ray actually hit the ground plane in front of the camera.
    pub fn is_in_front(&self) -> bool {
        self.distance >= 0.0
    }
}

/// Immutable snapshot of the view, consumed by the tile-building layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Whether any view property changed during the last
    /// [`update`](View::update).
    pub changed_on_last_update: bool,
    /// View center in projected meters.
    pub center: Point2<f64>,
    /// Current zoom.
    pub zoom: f32,
    /// `2^zoom`.
    pub zoom_scale: f64,
    /// Zoom truncated to the integer level used for tile addressing.
    pub integer_zoom: i32,
    /// Fractional zoom above [`integer_zoom`](Self::integer_zoom).
    pub fract_zoom: f32,
    /// Viewport size in physical pixels.
    pub viewport_size: Vector2<f32>,
    /// On-screen size of one tile, in physical pixels.
    pub tile_size: f32,
}

/// Camera parameters the derived matrices are computed from.
#[derive(Debug, Clone)]
struct CameraState {
    position: Point2<f64>,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    roll: f32,
    pitch: f32,
    camera_type: CameraType,
    fov: ZoomDependent,
    max_pitch_degrees: ZoomDependent,
    vanishing_point: Vector2<f32>,
    oblique_axis: Vector2<f32>,
    vp_width: f64,
    vp_height: f64,
    aspect: f32,
    pixel_scale: f32,
}

/// Transforms derived from the camera state, recomputed together.
#[derive(Debug, Clone)]
struct Matrices {
    view: Matrix4<f64>,
    proj: Matrix4<f64>,
    view_proj: Matrix4<f64>,
    inv_view_proj: Matrix4<f64>,
    normal: Matrix3<f64>,
    inv_normal: Matrix3<f64>,
    /// Camera position in view-relative world space.
    eye: Vector3<f64>,
    /// Height of the camera over the reference plane, derived from zoom.
    camera_distance: f64,
    /// World-space extents of the ground footprint at the reference plane.
    width: f64,
    height: f64,
    /// Farthest distance from the view center at which tiles are drawn.
    max_tile_distance: f64,
    camera_type: CameraType,
    vp_width: f64,
    vp_height: f64,
}

impl Matrices {
    fn compute(state: &CameraState) -> Self {
        // World-space size of one tile at the current (fractional) zoom.
        let world_tile_size = mercator::EARTH_CIRCUMFERENCE_M * f64::from(-state.zoom).exp2();

        // The viewport height in world space is chosen so that each tile is
        // TILE_SIZE * pixel_scale physical pixels square on screen.
        let screen_tile_size = mercator::TILE_SIZE * f64::from(state.pixel_scale);
        let height = state.vp_height * world_tile_size / screen_tile_size;
        let width = height * f64::from(state.aspect);

        let mut fovy = f64::from(state.fov.eval(state.zoom));

        // Portrait orientation is assumed by default; in landscape mode
        // scale the vertical field of view so that the wider dimension gets
        // the intended angle.
        if width > height {
            fovy /= f64::from(state.aspect);
        }

        // Camera height that produces the desired viewable area.
        let camera_distance = height * 0.5 / (fovy * 0.5).tan();

        let pitch = f64::from(state.pitch);
        let roll = f64::from(state.roll);
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), pitch);
        let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), roll);
        let eye = spin * (tilt * Vector3::new(0.0, 0.0, camera_distance));
        let up = spin * (tilt * Vector3::new(0.0, 1.0, 0.0));

        let view = Matrix4::look_at_rh(&Point3::from(eye), &Point3::origin(), &up);

        let max_tile_distance = world_tile_size * inv_lod_func((MAX_LOD + 1) as f64);
        let near = camera_distance / 50.0;
        let half_width = width * 0.5;
        let half_height = height * 0.5;

        let mut proj = match state.camera_type {
            CameraType::Perspective => {
                // The far plane reaches the intersection of the top of the
                // view frustum with the ground plane.
                let far = (2.0 * camera_distance / (pitch + 0.5 * fovy).cos().max(0.0))
                    .min(max_tile_distance);
                let mut proj =
                    Matrix4::new_perspective(f64::from(state.aspect), fovy, near, far);
                // Off-axis shift of the projection center onto the
                // vanishing point.
                proj[(0, 2)] -= f64::from(state.vanishing_point.x) / state.vp_width;
                proj[(1, 2)] -= f64::from(state.vanishing_point.y) / state.vp_height;
                proj
            }
            CameraType::Isometric | CameraType::Flat => {
                let far = (2.0 * (camera_distance + half_height * pitch.tan().abs()))
                    .min(max_tile_distance);
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    near,
                    far,
                )
            }
        };

        if state.camera_type == CameraType::Isometric {
            // Build a shear from the view matrix, inject the oblique axis,
            // then remove the plain view component so it is not applied
            // twice when the shear is folded into the projection.
            let mut shear = view;
            shear[(0, 2)] += f64::from(state.oblique_axis.x);
            shear[(1, 2)] += f64::from(state.oblique_axis.y);
            let inv_view = view.try_inverse().unwrap_or_else(Matrix4::identity);
            proj *= shear * inv_view;
        }

        let view_proj = proj * view;
        let inv_view_proj = view_proj.try_inverse().unwrap_or_else(Matrix4::identity);

        // The view matrix is orthonormal, so its top-left 3x3 block already
        // transforms normals from world space to camera space.
        let normal = view.fixed_view::<3, 3>(0, 0).into_owned();
        let inv_normal = normal.try_inverse().unwrap_or_else(Matrix3::identity);

        Matrices {
            view,
            proj,
            view_proj,
            inv_view_proj,
            normal,
            inv_normal,
            eye,
            camera_distance,
            width,
            height,
            max_tile_distance,
            camera_type: state.camera_type,
            vp_width: state.vp_width,
            vp_height: state.vp_height,
        }
    }

    /// Casts a ray from the given screen pixel and intersects it with the
    /// ground plane `z = 0`.
    ///
    /// Following <http://antongerdelan.net/opengl/raycasting.html>.
    fn screen_to_ground_plane(&self, screen_x: f64, screen_y: f64) -> GroundIntersection {
        let target_clip = Vector4::new(
            2.0 * screen_x / self.vp_width - 1.0,
            1.0 - 2.0 * screen_y / self.vp_height,
            -1.0,
            1.0,
        );
        let mut target_world = self.inv_view_proj * target_clip;
        let w = target_world.w;
        target_world /= w;

        let origin_world = match self.camera_type {
            CameraType::Perspective => Vector4::new(self.eye.x, self.eye.y, self.eye.z, 1.0),
            // Orthographic cameras have no eye point; unprojecting the same
            // pixel at the near plane makes the ray parallel to the view
            // direction.
            CameraType::Isometric | CameraType::Flat => {
                self.inv_view_proj * Vector4::new(target_clip.x, target_clip.y, 0.0, 1.0)
            }
        };

        let mut ray = target_world - origin_world;

        // Distance along the ray to the ground plane; a ray parallel to the
        // plane yields 0 rather than a division by zero.
        let t = if ray.z != 0.0 { -origin_world.z / ray.z } else { 0.0 };
        ray *= t.abs();

        // If the intersection is farther than the maximum distance at which
        // tiles are drawn, or above the horizon (t < 0), pin it to that
        // maximum along the same direction. This bounds the footprint of
        // near-horizon rays as pitch approaches 90 degrees.
        let lateral = (ray.x * ray.x + ray.y * ray.y).sqrt();
        if (lateral > self.max_tile_distance || t < 0.0) && lateral > 0.0 {
            ray *= self.max_tile_distance / lateral;
        }

        GroundIntersection {
            offset: Vector2::new(origin_world.x + ray.x, origin_world.y + ray.y),
            distance: t,
        }
    }
}

/// The camera-controlled view into the map world.
///
/// A view is created once per map and mutated by camera-control code; the
/// renderer reads matrices and queries visible tiles from it every frame.
/// All methods are synchronous and run on the caller's thread; a view is not
/// meant to be shared between threads.
#[derive(Debug, Clone)]
pub struct View {
    camera: CameraState,
    matrices: Cached<Matrices>,
    ortho_viewport: Matrix4<f64>,
    dirty_tiles: bool,
    changed: bool,
}

impl Default for View {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl View {
    /// Creates a view with the given viewport size in physical pixels and a
    /// default perspective camera looking at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        let mut view = Self {
            camera: CameraState {
                position: Point2::origin(),
                zoom: 0.0,
                min_zoom: MIN_ZOOM_LIMIT,
                max_zoom: MAX_ZOOM_LIMIT,
                roll: 0.0,
                pitch: 0.0,
                camera_type: CameraType::Perspective,
                fov: ZoomDependent::Fixed(std::f32::consts::FRAC_PI_4),
                max_pitch_degrees: ZoomDependent::Fixed(90.0),
                vanishing_point: Vector2::new(0.0, 0.0),
                oblique_axis: Vector2::new(0.0, 1.0),
                vp_width: 1.0,
                vp_height: 1.0,
                aspect: 1.0,
                pixel_scale: 1.0,
            },
            matrices: Cached::empty(),
            ortho_viewport: Matrix4::identity(),
            dirty_tiles: true,
            changed: false,
        };
        view.set_size(width, height);
        view
    }

    /// Applies a camera descriptor, replacing the projection model and its
    /// parameters.
    pub fn set_camera(&mut self, camera: Camera) {
        log::debug!("Applying camera descriptor: {camera:?}");
        let Camera {
            projection,
            max_pitch,
        } = camera;
        match projection {
            CameraProjection::Perspective {
                field_of_view,
                vanishing_point,
            } => {
                self.set_camera_type(CameraType::Perspective);
                self.camera.fov = field_of_view;
                self.camera.vanishing_point = vanishing_point;
            }
            CameraProjection::Isometric { oblique_axis } => {
                self.set_camera_type(CameraType::Isometric);
                self.camera.oblique_axis = oblique_axis;
            }
            CameraProjection::Flat => self.set_camera_type(CameraType::Flat),
        }
        self.camera.max_pitch_degrees = max_pitch;
        self.set_pitch(self.camera.pitch);
        self.invalidate();
    }

    /// Switches the projection model, keeping all other camera parameters.
    pub fn set_camera_type(&mut self, camera_type: CameraType) {
        self.camera.camera_type = camera_type;
        self.invalidate();
    }

    /// The current projection model.
    pub fn camera_type(&self) -> CameraType {
        self.camera.camera_type
    }

    /// Sets the isometric shear axis.
    pub fn set_oblique_axis(&mut self, x: f32, y: f32) {
        self.camera.oblique_axis = Vector2::new(x, y);
        self.invalidate();
    }

    /// The isometric shear axis.
    pub fn oblique_axis(&self) -> Vector2<f32> {
        self.camera.oblique_axis
    }

    /// Sets the perspective vanishing-point offset from the viewport center,
    /// in pixels.
    pub fn set_vanishing_point(&mut self, x: f32, y: f32) {
        self.camera.vanishing_point = Vector2::new(x, y);
        self.invalidate();
    }

    /// The perspective vanishing-point offset.
    pub fn vanishing_point(&self) -> Vector2<f32> {
        self.camera.vanishing_point
    }

    /// Sets the vertical field of view, in radians.
    pub fn set_field_of_view(&mut self, radians: f32) {
        self.camera.fov = ZoomDependent::Fixed(radians);
        self.invalidate();
    }

    /// Sets the vertical field of view as a stops curve over zoom.
    pub fn set_field_of_view_stops(&mut self, stops: Stops) {
        self.camera.fov = ZoomDependent::Stops(stops);
        self.invalidate();
    }

    /// The vertical field of view at the current zoom, in radians.
    pub fn field_of_view(&self) -> f32 {
        self.camera.fov.eval(self.camera.zoom)
    }

    /// Sets the field of view to the value corresponding to the given focal
    /// length, in multiples of the viewport height.
    pub fn set_focal_length(&mut self, length: f32) {
        self.set_field_of_view(camera::focal_length_to_field_of_view(length));
    }

    /// Sets the field of view from focal-length stops over zoom.
    pub fn set_focal_length_stops(&mut self, stops: Stops) {
        self.set_field_of_view_stops(stops.map_values(camera::focal_length_to_field_of_view));
    }

    /// The focal length corresponding to the current field of view.
    pub fn focal_length(&self) -> f32 {
        camera::field_of_view_to_focal_length(self.field_of_view())
    }

    /// Sets the minimum zoom level, clamped to `>= 0`.
    pub fn set_min_zoom(&mut self, min_zoom: f32) {
        self.camera.min_zoom = min_zoom.max(MIN_ZOOM_LIMIT);
        // Force a zoom update in case the bound moved past it.
        self.set_zoom(self.camera.zoom);
    }

    /// The minimum zoom level.
    pub fn min_zoom(&self) -> f32 {
        self.camera.min_zoom
    }

    /// Sets the maximum zoom level, clamped to `<= 20.5`.
    pub fn set_max_zoom(&mut self, max_zoom: f32) {
        self.camera.max_zoom = max_zoom.clamp(MIN_ZOOM_LIMIT, MAX_ZOOM_LIMIT);
        self.set_zoom(self.camera.zoom);
    }

    /// The maximum zoom level.
    pub fn max_zoom(&self) -> f32 {
        self.camera.max_zoom
    }

    /// Sets the maximum pitch angle, in degrees.
    pub fn set_max_pitch(&mut self, degrees: f32) {
        self.camera.max_pitch_degrees = ZoomDependent::Fixed(degrees);
        self.set_pitch(self.camera.pitch);
    }

    /// Sets the maximum pitch angle in degrees as a stops curve over zoom.
    pub fn set_max_pitch_stops(&mut self, stops: Stops) {
        self.camera.max_pitch_degrees = ZoomDependent::Stops(stops);
        self.set_pitch(self.camera.pitch);
    }

    /// The maximum pitch angle for the current zoom, in degrees.
    pub fn max_pitch(&self) -> f32 {
        self.camera.max_pitch_degrees.eval(self.camera.zoom)
    }

    /// Sets the ratio of physical to logical pixels. Default is 1.0.
    pub fn set_pixel_scale(&mut self, pixels_per_point: f32) {
        self.camera.pixel_scale = pixels_per_point;
        self.invalidate();
    }

    /// The ratio of physical to logical pixels.
    pub fn pixel_scale(&self) -> f32 {
        self.camera.pixel_scale
    }

    /// Sets the viewport size in physical pixels.
    ///
    /// Zero dimensions are clamped to one pixel so that downstream math
    /// stays finite.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Degenerate viewport size {width}x{height}, clamping to 1px");
        }
        self.camera.vp_width = f64::from(width.max(1));
        self.camera.vp_height = f64::from(height.max(1));
        self.camera.aspect = (self.camera.vp_width / self.camera.vp_height) as f32;

        // Screen-space projection with top-left origin and y pointing down.
        self.ortho_viewport = Matrix4::new_orthographic(
            0.0,
            self.camera.vp_width,
            self.camera.vp_height,
            0.0,
            -1.0,
            1.0,
        );
        self.invalidate();
    }

    /// Viewport width in physical pixels.
    pub fn width(&self) -> f64 {
        self.camera.vp_width
    }

    /// Viewport height in physical pixels.
    pub fn height(&self) -> f64 {
        self.camera.vp_height
    }

    /// Sets the view center in projected meters.
    ///
    /// The horizontal coordinate wraps around the antimeridian; the vertical
    /// coordinate is clamped to the projected world bounds.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.camera.position.x =
            x - (x / mercator::EARTH_CIRCUMFERENCE_M).round() * mercator::EARTH_CIRCUMFERENCE_M;
        self.camera.position.y = y.clamp(
            -mercator::EARTH_HALF_CIRCUMFERENCE_M,
            mercator::EARTH_HALF_CIRCUMFERENCE_M,
        );
        self.dirty_tiles = true;
    }

    /// Sets the view center from geographic coordinates.
    pub fn set_center_coordinates(&mut self, center: LngLat) {
        let meters = mercator::lng_lat_to_projected_meters(center);
        self.set_position(meters.x, meters.y);
    }

    /// Geographic coordinates of the view center.
    pub fn center_coordinates(&self) -> LngLat {
        mercator::projected_meters_to_lng_lat(self.camera.position).wrapped()
    }

    /// View position in projected meters; z is the camera height over the
    /// reference plane, derived from zoom.
    pub fn position(&mut self) -> Point3<f64> {
        let camera_distance = self.matrices().camera_distance;
        Point3::new(
            self.camera.position.x,
            self.camera.position.y,
            camera_distance,
        )
    }

    /// Sets the zoom level, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.camera.zoom = zoom.max(self.camera.min_zoom).min(self.camera.max_zoom);
        self.invalidate();
    }

    /// The current zoom.
    pub fn zoom(&self) -> f32 {
        self.camera.zoom
    }

    /// The zoom truncated to the integer level used to address visible
    /// tiles.
    pub fn integer_zoom(&self) -> i32 {
        self.camera.zoom as i32
    }

    /// Sets the roll angle around the vertical axis, in radians, wrapped to
    /// `[0, 2π)`.
    pub fn set_roll(&mut self, radians: f32) {
        self.camera.roll = radians.rem_euclid(TWO_PI);
        self.invalidate();
    }

    /// The current roll angle in radians.
    pub fn roll(&self) -> f32 {
        self.camera.roll
    }

    /// Sets the pitch (tilt) angle in radians, clamped to
    /// `[0, effective max pitch]`.
    pub fn set_pitch(&mut self, radians: f32) {
        let limit = self.pitch_limit();
        self.camera.pitch = radians.max(0.0).min(limit);
        self.invalidate();
    }

    /// The current pitch angle in radians.
    pub fn pitch(&self) -> f32 {
        self.camera.pitch
    }

    /// Moves the view center by the given offset in projected meters.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.set_position(self.camera.position.x + dx, self.camera.position.y + dy);
    }

    /// Changes zoom by the given amount.
    pub fn zoom_by(&mut self, dz: f32) {
        self.set_zoom(self.camera.zoom + dz);
    }

    /// Changes the roll angle by the given amount, in radians.
    pub fn roll_by(&mut self, radians: f32) {
        self.set_roll(self.camera.roll + radians);
    }

    /// Changes the pitch angle by the given amount, in radians.
    pub fn pitch_by(&mut self, radians: f32) {
        self.set_pitch(self.camera.pitch + radians);
    }

    /// Brings the derived matrices up to date and recomputes the change
    /// flag. Must run once per frame before rendering.
    ///
    /// With `constrain_to_world_bounds` the zoom and center are first
    /// adjusted so that the visible area stays inside the projected world.
    /// Returns whether anything changed since the previous update.
    pub fn update(&mut self, constrain_to_world_bounds: bool) -> bool {
        self.changed = false;

        if constrain_to_world_bounds {
            self.apply_world_bounds();
        }

        if self.matrices.is_dirty() {
            self.matrices();

            // The pitch ceiling of orthographic cameras depends on the new
            // footprint; re-validate and recompute once if it moved.
            let limit = self.pitch_limit();
            if self.camera.pitch > limit {
                self.camera.pitch = limit;
                self.matrices.invalidate();
                self.matrices();
            }

            log::trace!(
                "View matrices recomputed (zoom {}, pitch {}, roll {})",
                self.camera.zoom,
                self.camera.pitch,
                self.camera.roll
            );
            self.changed = true;
        }

        if self.dirty_tiles {
            self.dirty_tiles = false;
            self.changed = true;
        }

        self.changed
    }

    /// Whether any view property changed during the last call to
    /// [`update`](Self::update).
    pub fn changed_on_last_update(&self) -> bool {
        self.changed
    }

    /// The transformation from world space into view (camera) space.
    ///
    /// For precision the view matrix does not contain the translation of the
    /// view from the global origin; apply that separately.
    pub fn view_matrix(&mut self) -> Matrix4<f64> {
        self.matrices().view
    }

    /// The transformation from view space into screen space.
    pub fn projection_matrix(&mut self) -> Matrix4<f64> {
        self.matrices().proj
    }

    /// The combined view and projection transformation.
    pub fn view_projection_matrix(&mut self) -> Matrix4<f64> {
        self.matrices().view_proj
    }

    /// Inverse of the combined view and projection transformation.
    pub fn inverse_view_projection_matrix(&mut self) -> Matrix4<f64> {
        self.matrices().inv_view_proj
    }

    /// Transforms surface normals from world space to camera space.
    pub fn normal_matrix(&mut self) -> Matrix3<f64> {
        self.matrices().normal
    }

    /// Inverse of the [`normal_matrix`](Self::normal_matrix).
    pub fn inverse_normal_matrix(&mut self) -> Matrix3<f64> {
        self.matrices().inv_normal
    }

    /// The camera position in view-relative world space.
    pub fn eye(&mut self) -> Vector3<f64> {
        self.matrices().eye
    }

    /// Screen-space orthographic projection with top-left origin.
    pub fn ortho_viewport_matrix(&self) -> Matrix4<f64> {
        self.ortho_viewport
    }

    /// Window coordinates in `[0, 1]`, with the origin at the bottom-left
    /// corner of the window.
    pub fn normalized_window_coordinates(&self, x: f64, y: f64) -> Point2<f64> {
        Point2::new(x / self.camera.vp_width, 1.0 - y / self.camera.vp_height)
    }

    /// Snapshot of the view state for the tile-building layer.
    pub fn state(&self) -> ViewState {
        ViewState {
            changed_on_last_update: self.changed,
            center: self.camera.position,
            zoom: self.camera.zoom,
            zoom_scale: f64::from(self.camera.zoom).exp2(),
            integer_zoom: self.integer_zoom(),
            fract_zoom: self.camera.zoom - self.camera.zoom.floor(),
            viewport_size: Vector2::new(
                self.camera.vp_width as f32,
                self.camera.vp_height as f32,
            ),
            tile_size: (mercator::TILE_SIZE as f32) * self.camera.pixel_scale,
        }
    }

    /// The rectangle of the current view range at the reference plane, in
    /// projected meters.
    pub fn bounds_rect(&mut self) -> ProjectedBounds {
        let (half_width, half_height) = {
            let matrices = self.matrices();
            (matrices.width * 0.5, matrices.height * 0.5)
        };
        let center = self.camera.position;
        ProjectedBounds::new(
            Point2::new(center.x - half_width, center.y - half_height),
            Point2::new(center.x + half_width, center.y + half_height),
        )
    }

    /// Physical pixels per projected meter at the current zoom.
    pub fn pixels_per_meter(&self) -> f64 {
        let meters_per_tile =
            mercator::EARTH_CIRCUMFERENCE_M * f64::from(-self.camera.zoom).exp2();
        mercator::TILE_SIZE * f64::from(self.camera.pixel_scale) / meters_per_tile
    }

    /// Casts a ray from the given screen pixel and intersects it with the
    /// ground plane.
    ///
    /// The returned offset is relative to the view center; add
    /// [`position`](Self::position) for absolute projected meters.
    pub fn screen_to_ground_plane(&mut self, screen_x: f64, screen_y: f64) -> GroundIntersection {
        self.matrices().screen_to_ground_plane(screen_x, screen_y)
    }

    /// Displacement from the view center to the given position, wrapped
    /// across the antimeridian to the smallest magnitude.
    pub fn get_relative_meters(&self, projected: Point2<f64>) -> Vector2<f64> {
        let mut relative = projected - self.camera.position;
        relative.x -= (relative.x / mercator::EARTH_CIRCUMFERENCE_M).round()
            * mercator::EARTH_CIRCUMFERENCE_M;
        relative
    }

    /// Geographic coordinates under the given screen pixel, or `None` when
    /// the pixel is above the horizon.
    pub fn screen_position_to_lng_lat(&mut self, x: f64, y: f64) -> Option<LngLat> {
        let hit = self.screen_to_ground_plane(x, y);
        if !hit.is_in_front() {
            return None;
        }
        let meters = self.camera.position + hit.offset;
        Some(mercator::projected_meters_to_lng_lat(meters).wrapped())
    }

    /// Screen position of the given geographic coordinates.
    ///
    /// The flag reports whether the position falls outside the viewport (or
    /// behind the camera). With `clip_to_viewport` such positions are moved
    /// to the nearest point of the viewport border instead.
    pub fn lng_lat_to_screen_position(
        &mut self,
        lng_lat: LngLat,
        clip_to_viewport: bool,
    ) -> (Point2<f32>, bool) {
        let absolute = mercator::lng_lat_to_projected_meters(lng_lat);
        let relative = self.get_relative_meters(absolute);

        let matrices = self.matrices();
        let clip = matrices.view_proj * Vector4::new(relative.x, relative.y, 0.0, 1.0);
        let behind = clip.w <= 0.0;
        let mut ndc = Vector2::new(clip.x / clip.w, clip.y / clip.w);
        let outside_viewport = behind || ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0;

        if outside_viewport && clip_to_viewport {
            // A point behind the camera projects mirrored; flip it before
            // pushing the direction onto the viewport border.
            if behind {
                ndc = -ndc;
            }
            let scale = ndc.x.abs().max(ndc.y.abs());
            if scale > 0.0 {
                ndc /= scale;
            }
        }

        let screen = Point2::new(
            ((ndc.x + 1.0) * 0.5 * matrices.vp_width) as f32,
            ((1.0 - ndc.y) * 0.5 * matrices.vp_height) as f32,
        );
        (screen, outside_viewport)
    }

    /// Calls `tile_callback` for every tile visible at the current position
    /// and zoom, exactly once per tile.
    ///
    /// Tiles are addressed at the integer zoom; viewport areas far from the
    /// view center of a perspective camera are coarsened by up to
    /// [`MAX_LOD`] zoom levels. The emission order is stable for unchanged
    /// view state.
    pub fn get_visible_tiles<F: FnMut(TileID)>(&mut self, mut tile_callback: F) {
        let position = self.camera.position;
        let max_zoom = self.camera.max_zoom as i32;
        let zoom = self.integer_zoom().clamp(0, max_zoom);
        let camera_type = self.camera.camera_type;

        let matrices = {
            let camera = &self.camera;
            self.matrices.get_or_update(|| Matrices::compute(camera))
        };

        // Ground-plane footprint of the view frustum: the four viewport
        // corners, bottom-left first, counter-clockwise.
        let corners = [
            matrices.screen_to_ground_plane(0.0, matrices.vp_height),
            matrices.screen_to_ground_plane(matrices.vp_width, matrices.vp_height),
            matrices.screen_to_ground_plane(matrices.vp_width, 0.0),
            matrices.screen_to_ground_plane(0.0, 0.0),
        ];

        // All rays above the horizon: there is no area to cover.
        if corners.iter().all(|corner| corner.distance < 0.0) {
            return;
        }

        let max_tile_index = 1i32 << zoom;
        let half_circumference = mercator::EARTH_HALF_CIRCUMFERENCE_M;
        let inv_tile_size = f64::from(max_tile_index) / (half_circumference * 2.0);

        // Transformation from world space into tile space, whose origin is
        // the top-left corner of projection space with y growing south.
        let to_tile_space = |offset: Vector2<f64>| {
            Point2::new(
                (offset.x + position.x + half_circumference) * inv_tile_size,
                (offset.y + position.y - half_circumference) * -inv_tile_size,
            )
        };

        // View trapezoid corners and the point under the camera.
        let a = to_tile_space(corners[0].offset);
        let b = to_tile_space(corners[1].offset);
        let c = to_tile_space(corners[2].offset);
        let d = to_tile_space(corners[3].offset);
        let e = to_tile_space(Vector2::new(matrices.eye.x, matrices.eye.y));

        // Distance thresholds in tile space for the levels of detail:
        // element [n] of each array is the first tile index at which
        // level-of-detail n applies in that direction.
        let mut x_limit_pos = [i32::MAX; MAX_LOD];
        let mut x_limit_neg = [i32::MIN; MAX_LOD];
        let mut y_limit_pos = [i32::MAX; MAX_LOD];
        let mut y_limit_neg = [i32::MIN; MAX_LOD];

        if camera_type == CameraType::Perspective {
            // Tiles within this tile-space radius of the view center keep
            // full resolution; farther rings progressively halve it.
            let tiles_at_full_zoom = matrices.width.max(matrices.height) * inv_tile_size * 0.5;
            let view_center_x = (position.x + half_circumference) * inv_tile_size;
            let view_center_y = (position.y - half_circumference) * -inv_tile_size;

            for i in 0..MAX_LOD {
                // Snapping to the power-of-two grid of the next level keeps
                // neighboring LOD regions aligned to tile boundaries.
                let j = (i + 1) as i32;
                let r = inv_lod_func(i as f64) + tiles_at_full_zoom;
                x_limit_neg[i] = ((((view_center_x - r) as i32) >> j) - 1) << j;
                y_limit_pos[i] = ((((view_center_y + r) as i32) >> j) + 1) << j;
                y_limit_neg[i] = ((((view_center_y - r) as i32) >> j) - 1) << j;
                x_limit_pos[i] = ((((view_center_x + r) as i32) >> j) + 1) << j;
            }
        }

        let mut seen: ahash::HashSet<TileID> = ahash::HashSet::default();
        let mut last_tile: Option<TileID> = None;
        let mut scan = |x: i32, y: i32| {
            let mut lod = 0;
            while lod < MAX_LOD && x >= x_limit_pos[lod] {
                lod += 1;
            }
            while lod < MAX_LOD && x < x_limit_neg[lod] {
                lod += 1;
            }
            while lod < MAX_LOD && y >= y_limit_pos[lod] {
                lod += 1;
            }
            while lod < MAX_LOD && y < y_limit_neg[lod] {
                lod += 1;
            }

            let x = x >> lod;
            let y = y >> lod;
            let z = (zoom - lod as i32).clamp(0, max_zoom);

            // Wrap x around the antimeridian into [0, 2^z).
            let wrapped_x = x & ((1i32 << z) - 1);

            let tile = TileID::new(wrapped_x, y, z as i8);

            // Adjacent cells of a scanline usually coarsen to the same
            // tile; comparing against the previous emission skips the set
            // lookup for most cells.
            if last_tile == Some(tile) {
                return;
            }
            last_tile = Some(tile);
            if seen.insert(tile) {
                tile_callback(tile);
            }
        };

        // Rasterize the view trapezoid into tiles.
        rasterize::scan_triangle(a, b, c, 0, max_tile_index, &mut scan);
        rasterize::scan_triangle(c, d, a, 0, max_tile_index, &mut scan);

        // Also rasterize the area bounded by the point under the camera and
        // the two nearest corners of the trapezoid, so that geometry with
        // height in those tiles is not culled even though the tile bases
        // are off screen.
        rasterize::scan_triangle(a, b, e, 0, max_tile_index, &mut scan);
    }

    fn matrices(&mut self) -> &Matrices {
        let camera = &self.camera;
        self.matrices.get_or_update(|| Matrices::compute(camera))
    }

    fn invalidate(&mut self) {
        self.matrices.invalidate();
        self.dirty_tiles = true;
    }

    /// Effective pitch ceiling in radians for the current camera.
    fn pitch_limit(&self) -> f32 {
        let mut limit = self.max_pitch().to_radians();
        if self.camera.camera_type != CameraType::Perspective {
            // Keep the projection plane from intersecting the ground plane.
            // Uses the footprint of the last matrix update; update()
            // re-validates after every refresh.
            if let Some(matrices) = self.matrices.last() {
                limit = limit.min(matrices.camera_distance.atan2(matrices.height * 0.5) as f32);
            }
        }
        limit
    }

    /// Constrains zoom and center so the visible area stays within the
    /// projected world bounds.
    fn apply_world_bounds(&mut self) {
        // Approximate the view span in logical pixels by the larger
        // viewport dimension.
        let view_diameter_px = self.camera.vp_width.max(self.camera.vp_height)
            / f64::from(self.camera.pixel_scale);

        // Minimum zoom that keeps the span within the drawable projection
        // range.
        let world_bounds_min_zoom = (view_diameter_px / mercator::TILE_SIZE + 2.0).log2() as f32;
        if self.camera.zoom < world_bounds_min_zoom {
            self.set_zoom(world_bounds_min_zoom);
        }

        // Clamp the center vertically so the visible area stays inside the
        // projection bounds; horizontally the world wraps instead.
        let meters_per_pixel = mercator::EARTH_CIRCUMFERENCE_M
            * f64::from(-self.camera.zoom).exp2()
            / (mercator::TILE_SIZE * f64::from(self.camera.pixel_scale));
        let half_span = 0.5 * self.camera.vp_width.max(self.camera.vp_height) * meters_per_pixel;
        let limit = (mercator::EARTH_HALF_CIRCUMFERENCE_M - half_span).max(0.0);
        let clamped_y = self.camera.position.y.clamp(-limit, limit);
        if clamped_y != self.camera.position.y {
            self.camera.position.y = clamped_y;
            self.dirty_tiles = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::mercator::{EARTH_CIRCUMFERENCE_M, EARTH_HALF_CIRCUMFERENCE_M};

    fn collect_tiles(view: &mut View) -> Vec<TileID> {
        let mut tiles = Vec::new();
        view.get_visible_tiles(|tile| tiles.push(tile));
        tiles
    }

    fn flat_view(width: u32, height: u32) -> View {
        let mut view = View::new(width, height);
        view.set_camera_type(CameraType::Flat);
        view
    }

    #[test]
    fn zoom_is_clamped_to_the_configured_range() {
        let mut view = View::new(800, 600);
        view.set_max_zoom(16.0);
        view.set_min_zoom(2.0);

        view.set_zoom(25.0);
        assert_eq!(view.zoom(), 16.0);
        view.set_zoom(-3.0);
        assert_eq!(view.zoom(), 2.0);
        view.set_zoom(7.25);
        assert_eq!(view.zoom(), 7.25);
    }

    #[test]
    fn zoom_bounds_are_themselves_bounded() {
        let mut view = View::new(800, 600);
        view.set_max_zoom(30.0);
        assert_eq!(view.max_zoom(), 20.5);
        view.set_min_zoom(-4.0);
        assert_eq!(view.min_zoom(), 0.0);
    }

    #[test]
    fn pitch_is_clamped_to_the_maximum_pitch() {
        let mut view = View::new(800, 600);
        view.set_pitch(2.0);
        assert_relative_eq!(view.pitch(), std::f32::consts::FRAC_PI_2, epsilon = 1e-5);

        // Lowering the limit re-clamps the current pitch.
        view.set_max_pitch(45.0);
        assert_relative_eq!(view.pitch(), 45.0f32.to_radians(), epsilon = 1e-5);

        view.set_pitch(-1.0);
        assert_eq!(view.pitch(), 0.0);
    }

    #[test]
    fn orthographic_pitch_stays_above_the_ground_plane() {
        let mut view = flat_view(800, 600);
        view.update(false);
        view.set_pitch(1.5);
        view.update(false);
        assert!(view.pitch() > 0.0);
        assert!(view.pitch() < 1.4);
    }

    #[test]
    fn roll_wraps_to_one_turn() {
        let mut view = View::new(800, 600);
        view.set_roll(-0.5);
        assert_relative_eq!(view.roll(), TWO_PI - 0.5, epsilon = 1e-5);
        view.set_roll(TWO_PI + 0.25);
        assert_relative_eq!(view.roll(), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn position_wraps_across_the_antimeridian() {
        let mut view = View::new(800, 600);
        view.set_position(1.5 * EARTH_HALF_CIRCUMFERENCE_M, 0.0);
        assert_relative_eq!(
            view.position().x,
            -0.5 * EARTH_HALF_CIRCUMFERENCE_M,
            epsilon = 1e-6
        );
    }

    #[test]
    fn position_is_clamped_vertically() {
        let mut view = View::new(800, 600);
        view.set_position(0.0, 2.0 * EARTH_HALF_CIRCUMFERENCE_M);
        assert_relative_eq!(view.position().y, EARTH_HALF_CIRCUMFERENCE_M);
        view.set_position(0.0, -2.0 * EARTH_HALF_CIRCUMFERENCE_M);
        assert_relative_eq!(view.position().y, -EARTH_HALF_CIRCUMFERENCE_M);
    }

    #[test]
    fn center_longitude_survives_near_the_antimeridian() {
        let mut view = View::new(800, 600);
        view.set_center_coordinates(LngLat::new(179.9, 0.0));
        assert_relative_eq!(view.center_coordinates().longitude, 179.9, epsilon = 1e-9);
    }

    #[test]
    fn screen_and_geo_coordinates_round_trip_looking_straight_down() {
        for camera_type in [CameraType::Flat, CameraType::Perspective] {
            let mut view = View::new(800, 600);
            view.set_camera_type(camera_type);
            view.set_zoom(10.0);
            view.set_center_coordinates(LngLat::new(13.4, 52.5));
            view.update(false);

            let lng_lat = view
                .screen_position_to_lng_lat(250.0, 175.0)
                .expect("the camera looks straight down");
            let (screen, outside_viewport) = view.lng_lat_to_screen_position(lng_lat, false);

            assert!(!outside_viewport);
            assert_abs_diff_eq!(screen.x, 250.0, epsilon = 0.05);
            assert_abs_diff_eq!(screen.y, 175.0, epsilon = 0.05);
        }
    }

    #[test]
    fn pixels_above_the_horizon_resolve_to_none() {
        let mut view = View::new(800, 600);
        view.set_zoom(12.0);
        view.set_pitch(1.55);
        view.update(false);

        assert!(view.screen_position_to_lng_lat(400.0, 5.0).is_none());
        assert!(view.screen_position_to_lng_lat(400.0, 595.0).is_some());
    }

    #[test]
    fn offscreen_positions_can_be_clipped_to_the_viewport_border() {
        let mut view = View::new(800, 600);
        view.set_zoom(14.0);
        view.set_center_coordinates(LngLat::new(0.0, 0.0));
        view.update(false);

        let far_away = LngLat::new(10.0, 0.0);
        let (screen, outside_viewport) = view.lng_lat_to_screen_position(far_away, true);
        assert!(outside_viewport);
        assert!(screen.x >= 0.0 && screen.x <= 800.0);
        assert!(screen.y >= 0.0 && screen.y <= 600.0);
    }

    #[test]
    fn relative_meters_take_the_short_way_around() {
        let mut view = View::new(800, 600);
        view.set_center_coordinates(LngLat::new(179.0, 0.0));
        let target = mercator::lng_lat_to_projected_meters(LngLat::new(-179.0, 0.0));

        let relative = view.get_relative_meters(target);
        assert_relative_eq!(relative.x, 2.0 * EARTH_CIRCUMFERENCE_M / 360.0, epsilon = 1.0);
        assert_relative_eq!(relative.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn field_of_view_follows_stops_over_zoom() {
        let mut view = View::new(800, 600);
        view.set_field_of_view_stops(Stops::new(vec![(0.0, 0.6), (10.0, 1.0)]).expect("frames"));
        view.set_zoom(5.0);
        assert_relative_eq!(view.field_of_view(), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn focal_length_setter_matches_field_of_view() {
        let mut view = View::new(800, 600);
        view.set_focal_length(2.0);
        assert_relative_eq!(view.focal_length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn view_projection_centers_the_view_position() {
        let mut view = flat_view(512, 512);
        view.set_zoom(4.0);
        view.set_position(3_000_000.0, 1_000_000.0);

        let view_proj = view.view_projection_matrix();
        let clip = view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(clip.x / clip.w, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(clip.y / clip.w, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn isometric_oblique_axis_shears_elevated_geometry() {
        let mut view = View::new(600, 600);
        view.set_camera(Camera {
            projection: CameraProjection::Isometric {
                oblique_axis: Vector2::new(1.0, 0.0),
            },
            max_pitch: ZoomDependent::Fixed(90.0),
        });
        view.set_zoom(10.0);

        let view_proj = view.view_projection_matrix();
        let ground = view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let lifted = view_proj * Vector4::new(0.0, 0.0, 100.0, 1.0);

        assert!(lifted.x / lifted.w > ground.x / ground.w);
        assert_abs_diff_eq!(lifted.y / lifted.w, ground.y / ground.w, epsilon = 1e-9);
    }

    #[test]
    fn update_reports_changes_once() {
        let mut view = View::new(800, 600);
        assert!(view.update(false));
        assert!(!view.update(false));
        assert!(!view.changed_on_last_update());

        view.set_zoom(3.0);
        assert!(view.update(false));
        assert!(view.changed_on_last_update());
        assert!(!view.update(false));
    }

    #[test]
    fn world_bounds_constraint_limits_zoom_and_center() {
        let mut view = View::new(800, 600);
        view.set_zoom(0.0);
        view.set_position(0.0, EARTH_HALF_CIRCUMFERENCE_M);
        view.update(true);

        assert!(view.zoom() > 0.0);
        assert!(view.position().y < EARTH_HALF_CIRCUMFERENCE_M);
    }

    #[test]
    fn state_snapshot_reflects_the_current_view() {
        let mut view = View::new(1024, 768);
        view.set_zoom(7.5);
        view.update(false);

        let state = view.state();
        assert!(state.changed_on_last_update);
        assert_eq!(state.integer_zoom, 7);
        assert_relative_eq!(state.fract_zoom, 0.5);
        assert_relative_eq!(state.zoom_scale, 7.5f64.exp2(), epsilon = 1e-9);
        assert_eq!(state.viewport_size, Vector2::new(1024.0, 768.0));
        assert_relative_eq!(state.tile_size, 256.0);
    }

    #[test]
    fn whole_world_viewport_yields_the_root_tile() {
        let mut view = flat_view(800, 600);
        view.set_zoom(0.0);
        view.set_position(0.0, 0.0);

        assert_eq!(collect_tiles(&mut view), vec![TileID::new(0, 0, 0)]);
    }

    #[test]
    fn origin_viewport_at_zoom_two_covers_the_center_block() {
        let mut view = flat_view(800, 600);
        view.set_zoom(2.0);
        view.update(false);

        let tiles = collect_tiles(&mut view);
        assert!(tiles.contains(&TileID::new(2, 2, 2)));
        for tile in &tiles {
            assert_eq!(tile.z, 2);
            assert!((tile.x - 2).abs() <= 2, "stray tile {tile}");
            assert!((tile.y - 2).abs() <= 2, "stray tile {tile}");
        }
    }

    #[test]
    fn flat_camera_coverage_matches_the_rectangular_footprint() {
        let mut view = flat_view(1000, 700);
        view.set_zoom(6.0);
        view.set_position(1_000_000.0, -2_500_000.0);
        view.update(false);

        let tiles = collect_tiles(&mut view);
        let set: HashSet<TileID> = tiles.iter().copied().collect();
        assert_eq!(set.len(), tiles.len());

        // The footprint of a straight-down orthographic camera is exactly
        // the world-space extents of the view.
        let bounds = view.bounds_rect();
        let inv_tile_size = f64::from(1i32 << 6) / EARTH_CIRCUMFERENCE_M;
        let min_x = (bounds.min.x + EARTH_HALF_CIRCUMFERENCE_M) * inv_tile_size;
        let max_x = (bounds.max.x + EARTH_HALF_CIRCUMFERENCE_M) * inv_tile_size;
        let min_y = (EARTH_HALF_CIRCUMFERENCE_M - bounds.max.y) * inv_tile_size;
        let max_y = (EARTH_HALF_CIRCUMFERENCE_M - bounds.min.y) * inv_tile_size;

        // Every tile fully inside the footprint is present.
        for x in (min_x.ceil() as i32)..(max_x.floor() as i32) {
            for y in (min_y.ceil() as i32)..(max_y.floor() as i32) {
                assert!(set.contains(&TileID::new(x, y, 6)), "missing tile {x}/{y}/6");
            }
        }

        // No tile lies outside the footprint by more than edge rounding.
        for tile in &tiles {
            assert_eq!(tile.z, 6);
            assert!(f64::from(tile.x + 1) > min_x - 1.0 && f64::from(tile.x) < max_x + 1.0);
            assert!(f64::from(tile.y + 1) > min_y - 1.0 && f64::from(tile.y) < max_y + 1.0);
        }
    }

    #[test]
    fn lod_never_decreases_with_distance_from_the_view_center() {
        let mut view = View::new(800, 600);
        view.set_max_pitch(85.0);
        view.set_zoom(14.0);
        view.set_pitch(1.2);
        view.update(false);

        let tiles = collect_tiles(&mut view);
        assert!(
            tiles.iter().any(|tile| i32::from(tile.z) < 14),
            "a strongly pitched view should contain reduced-resolution tiles"
        );
        assert!(tiles
            .iter()
            .all(|tile| i32::from(tile.z) >= 14 - MAX_LOD as i32));

        // Tiles covering the view-center column, as (near edge, far edge)
        // distance from the center row in full-resolution tile units, split
        // by side because the thresholds are computed per direction.
        let inv_tile_size = f64::from(1i32 << 14) / EARTH_CIRCUMFERENCE_M;
        let center_x = EARTH_HALF_CIRCUMFERENCE_M * inv_tile_size;
        let center_y = EARTH_HALF_CIRCUMFERENCE_M * inv_tile_size;

        let mut above = Vec::new();
        let mut below = Vec::new();
        for tile in &tiles {
            let lod = 14 - i32::from(tile.z);
            let scale = 1i32 << lod;
            let x0 = f64::from(tile.x * scale);
            let x1 = f64::from((tile.x + 1) * scale);
            if !(x0 <= center_x && center_x < x1) {
                continue;
            }
            let y0 = f64::from(tile.y * scale);
            let y1 = f64::from((tile.y + 1) * scale);
            if y0 >= center_y {
                below.push((y0 - center_y, y1 - center_y, lod));
            } else if y1 <= center_y {
                above.push((center_y - y1, center_y - y0, lod));
            }
        }

        // Whenever one tile lies entirely closer to the center than another,
        // the closer tile must not be coarser.
        for column in [above, below] {
            assert!(!column.is_empty());
            for &(near_a, far_a, lod_a) in &column {
                for &(near_b, _, lod_b) in &column {
                    if far_a <= near_b {
                        assert!(
                            lod_a <= lod_b,
                            "tile at distance {near_a} has LOD {lod_a}, \
                             farther tile at {near_b} has LOD {lod_b}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn visible_tiles_are_deterministic_and_unique() {
        let mut view = View::new(800, 600);
        view.set_zoom(5.3);
        view.set_pitch(0.9);
        view.set_roll(0.7);
        view.update(false);

        let first = collect_tiles(&mut view);
        let second = collect_tiles(&mut view);
        assert!(!first.is_empty());
        assert_eq!(first, second);

        let unique: HashSet<TileID> = first.iter().copied().collect();
        assert_eq!(unique.len(), first.len());
    }
}
