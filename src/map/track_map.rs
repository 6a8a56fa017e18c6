use kurbo::{Circle, Point, Rect, Shape};

use crate::foundation::core::{Canvas, GeoPosition, Rgba8};
use crate::foundation::error::TripReelResult;
use crate::map::MapView;
use crate::render::shapes::{fill_path, fill_rect};
use crate::render::surface::Surface;
use crate::trajectory::waypoint::Waypoint;

const BACKGROUND: Rgba8 = Rgba8::new(226, 232, 240, 255);
const ROUTE: Rgba8 = Rgba8::new(71, 85, 105, 255);
const STOP: Rgba8 = Rgba8::new(148, 163, 184, 255);
const MARKER: Rgba8 = Rgba8::new(239, 68, 68, 255);
const FOCUS: Rgba8 = Rgba8::new(14, 165, 233, 160);

/// Equirectangular fit of a set of positions into a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projection {
    center: GeoPosition,
    px_per_deg: f64,
    lon_scale: f64,
    canvas_center: Point,
}

impl Projection {
    /// Fit `positions` into `canvas` leaving `padding` pixels on each side.
    pub(crate) fn fit(positions: &[GeoPosition], canvas: Canvas, padding: f64) -> Self {
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let canvas_center = Point::new(w / 2.0, h / 2.0);
        let Some(first) = positions.first() else {
            return Self {
                center: GeoPosition::new(0.0, 0.0),
                px_per_deg: 1.0,
                lon_scale: 1.0,
                canvas_center,
            };
        };

        let mut bounds = Rect::from_points(
            Point::new(first.lon, first.lat),
            Point::new(first.lon, first.lat),
        );
        for p in positions {
            bounds = bounds.union_pt(Point::new(p.lon, p.lat));
        }
        let mid = bounds.center();
        let lon_scale = mid.y.to_radians().cos().abs().max(0.05);

        let span_x = (bounds.width() * lon_scale).max(1e-6);
        let span_y = bounds.height().max(1e-6);
        let avail_w = (w - 2.0 * padding).max(1.0);
        let avail_h = (h - 2.0 * padding).max(1.0);
        // Clamp zoom so a single point or tiny cluster does not blow up.
        let px_per_deg = (avail_w / span_x).min(avail_h / span_y).min(avail_h * 10.0);

        Self {
            center: GeoPosition::new(mid.x, mid.y),
            px_per_deg,
            lon_scale,
            canvas_center,
        }
    }

    pub(crate) fn project(&self, p: GeoPosition) -> Point {
        Point::new(
            self.canvas_center.x + (p.lon - self.center.lon) * self.lon_scale * self.px_per_deg,
            self.canvas_center.y - (p.lat - self.center.lat) * self.px_per_deg,
        )
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Flight {
    from: GeoPosition,
    to: GeoPosition,
    duration_ms: f64,
    started_ms: Option<f64>,
}

/// Self-contained [`MapView`]: route polyline, stop dots, the replay marker, and a camera focus
/// ring that glides between waypoints on `fly_to`.
pub struct TrackMap {
    canvas: Canvas,
    surface: Surface,
    projection: Projection,
    route: Vec<GeoPosition>,
    marker: Option<GeoPosition>,
    focus: Option<GeoPosition>,
    flight: Option<Flight>,
    dirty: bool,
}

impl std::fmt::Debug for TrackMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackMap")
            .field("canvas", &self.canvas)
            .field("stops", &self.route.len())
            .field("marker", &self.marker)
            .field("focus", &self.focus)
            .finish()
    }
}

impl TrackMap {
    /// Empty map of the given size.
    pub fn new(canvas: Canvas) -> TripReelResult<Self> {
        Ok(Self {
            canvas,
            surface: Surface::new(canvas)?,
            projection: Projection::fit(&[], canvas, 0.0),
            route: Vec::new(),
            marker: None,
            focus: None,
            flight: None,
            dirty: true,
        })
    }

    /// Replace the displayed route and refit the view.
    pub fn set_route(&mut self, waypoints: &[Waypoint]) {
        self.route = waypoints.iter().map(|w| w.position).collect();
        let padding = 48.0 * self.canvas.ui_scale();
        self.projection = Projection::fit(&self.route, self.canvas, padding);
        self.focus = self.route.first().copied();
        self.flight = None;
        self.dirty = true;
    }

    /// Where the camera is currently centered.
    pub fn focus(&self) -> Option<GeoPosition> {
        self.focus
    }

    /// Current marker position.
    pub fn marker(&self) -> Option<GeoPosition> {
        self.marker
    }

    fn redraw(&mut self) {
        let (w, h) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        let s = self.canvas.ui_scale();
        let mut ctx = self.surface.render_context();
        fill_rect(&mut ctx, Rect::new(0.0, 0.0, w, h), BACKGROUND);

        let points: Vec<Point> = self.route.iter().map(|p| self.projection.project(*p)).collect();
        if points.len() >= 2 {
            let mut line = kurbo::BezPath::new();
            line.move_to(points[0]);
            for p in &points[1..] {
                line.line_to(*p);
            }
            let style = kurbo::Stroke::new(4.0 * s)
                .with_caps(kurbo::Cap::Round)
                .with_join(kurbo::Join::Round);
            let outline = kurbo::stroke(line.iter(), &style, &kurbo::StrokeOpts::default(), 0.25);
            fill_path(&mut ctx, &outline, ROUTE);
        }
        for p in &points {
            fill_path(&mut ctx, &Circle::new(*p, 5.0 * s).to_path(0.1), STOP);
        }
        if let Some(focus) = self.focus {
            let c = self.projection.project(focus);
            fill_path(&mut ctx, &Circle::new(c, 18.0 * s).to_path(0.1), FOCUS);
        }
        if let Some(marker) = self.marker {
            let c = self.projection.project(marker);
            fill_path(&mut ctx, &Circle::new(c, 8.0 * s).to_path(0.1), MARKER);
        }

        self.surface.commit(&mut ctx);
        self.dirty = false;
    }
}

impl MapView for TrackMap {
    fn dimensions(&self) -> Canvas {
        self.canvas
    }

    fn snapshot_surface(&mut self) -> TripReelResult<&Surface> {
        if self.dirty {
            self.redraw();
        }
        Ok(&self.surface)
    }

    fn fly_to(&mut self, target: GeoPosition, duration_ms: f64) {
        let from = self.focus.unwrap_or(target);
        if duration_ms <= 0.0 || !duration_ms.is_finite() {
            self.focus = Some(target);
            self.flight = None;
        } else {
            self.flight = Some(Flight {
                from,
                to: target,
                duration_ms,
                started_ms: None,
            });
        }
        self.dirty = true;
    }

    fn advance_to(&mut self, now_ms: f64) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        let started = *flight.started_ms.get_or_insert(now_ms);
        let t = ((now_ms - started) / flight.duration_ms).clamp(0.0, 1.0);
        self.focus = Some(flight.from.lerp(flight.to, ease_in_out_cubic(t)));
        if t >= 1.0 {
            self.flight = None;
        }
        self.dirty = true;
    }

    fn set_marker(&mut self, position: GeoPosition) {
        if self.marker != Some(position) {
            self.marker = Some(position);
            self.dirty = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/track_map.rs"]
mod tests;
