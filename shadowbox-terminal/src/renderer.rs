/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use shadowbox_core::projection::{clip_near, clip_segment_near, clip_to_screen, to_screen};
use shadowbox_core::{Mesh, Triangle};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const AMBIENT: f32 = 0.15;
const GROUND_CELL: Cell = Cell::new(',', Color::DarkGreen);
const SHADOW_CELL: Cell = Cell::new('~', Color::DarkGrey);
const LIGHT_CELL: Cell = Cell::new('O', Color::Yellow);
/// Pulls the shadow toward the viewer so it wins against the ground it lies on.
const SHADOW_DEPTH_BIAS: f32 = 1e-3;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 0.5;

/// One character cell of the frame buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const fn new(ch: char, color: Color) -> Self {
        Self { ch, color }
    }

    const BLANK: Cell = Cell::new(' ', Color::Reset);
}

/// ASCII renderer that draws the model, its shadow and the ground
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Aspect ratio of the viewport corrected for tall terminal cells.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32 * CELL_ASPECT
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::BLANK);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Draw a square ground patch of half-size `extent` at height `ground_y`.
    ///
    /// The patch is split into unit tiles so that tiles partly outside the
    /// view do not take the whole floor with them.
    pub fn render_ground(&mut self, ground_y: f32, extent: f32, view_projection: &Matrix4<f32>) {
        let tiles = extent.max(0.0).ceil() as i32;
        let corner = |x: i32, z: i32| Point3::new(x as f32, ground_y, z as f32);
        for tx in -tiles..tiles {
            for tz in -tiles..tiles {
                let (a, b, c, d) = (
                    corner(tx, tz),
                    corner(tx + 1, tz),
                    corner(tx + 1, tz + 1),
                    corner(tx, tz + 1),
                );
                for triangle in [[a, d, c], [a, c, b]] {
                    self.fill_world_triangle(&triangle, view_projection, GROUND_CELL, 0.0);
                }
            }
        }
    }

    /// Draw the model flattened by `shadow_model` as a flat silhouette.
    pub fn render_shadow(
        &mut self,
        mesh: &Mesh,
        shadow_model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
    ) {
        let mvp = view_projection * shadow_model;
        for triangle in &mesh.triangles {
            let corners = triangle.vertices.map(|v| v.position);
            self.fill_world_triangle(&corners, &mvp, SHADOW_CELL, SHADOW_DEPTH_BIAS);
        }
    }

    /// Draw the model shaded by a point light at `light` (world space).
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        light: &Point3<f32>,
    ) {
        let mvp = view_projection * model;
        for triangle in &mesh.triangles {
            let cell = shade(triangle, model, light);
            let corners = triangle.vertices.map(|v| v.position);
            self.fill_world_triangle(&corners, &mvp, cell, 0.0);
        }
    }

    /// Draw only the shaded edges of the model.
    pub fn render_wireframe(
        &mut self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        light: &Point3<f32>,
    ) {
        let mvp = view_projection * model;
        for triangle in &mesh.triangles {
            let cell = shade(triangle, model, light);
            let clip = triangle.vertices.map(|v| mvp * v.position.to_homogeneous());
            for i in 0..3 {
                self.draw_clip_segment(&clip[i], &clip[(i + 1) % 3], cell);
            }
        }
    }

    /// Mark the light's position, drawn over everything.
    pub fn render_light(&mut self, light: &Point3<f32>, view_projection: &Matrix4<f32>) {
        let (w, h) = (self.width as u32, self.height as u32);
        if let Some((x, y, _)) = to_screen(view_projection, light, w, h) {
            let (x, y) = (x as usize, y as usize);
            if x < self.width && y < self.height {
                let idx = y * self.width + x;
                self.cells[idx] = LIGHT_CELL;
                self.depth_buffer[idx] = f32::NEG_INFINITY;
            }
        }
    }

    fn fill_world_triangle(
        &mut self,
        corners: &[Point3<f32>; 3],
        mvp: &Matrix4<f32>,
        cell: Cell,
        bias: f32,
    ) {
        let (w, h) = (self.width as u32, self.height as u32);
        let clip = corners.map(|corner| mvp * corner.to_homogeneous());

        // Corners may land off screen; only the part behind the eye is cut.
        let polygon = clip_near(&clip);
        if polygon.len() < 3 {
            return;
        }
        let screen: Vec<_> = polygon.iter().map(|c| clip_to_screen(c, w, h)).collect();
        for i in 1..screen.len() - 1 {
            self.rasterize_triangle(&[screen[0], screen[i], screen[i + 1]], cell, bias);
        }
    }

    fn draw_clip_segment(&mut self, a: &Vector4<f32>, b: &Vector4<f32>, cell: Cell) {
        let Some((a, b)) = clip_segment_near(a, b) else {
            return;
        };
        let (w, h) = (self.width as u32, self.height as u32);
        let (a, b) = (clip_to_screen(&a, w, h), clip_to_screen(&b, w, h));
        let Some((a, b)) = clip_to_viewport(a, b, self.width as f32, self.height as f32) else {
            return;
        };

        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.0 + (b.0 - a.0) * t).floor();
            let y = (a.1 + (b.1 - a.1) * t).floor();
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(x, y, depth, cell);
        }
    }

    fn plot(&mut self, x: f32, y: f32, depth: f32, cell: Cell) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell, bias: f32) {
        let [v0, v1, v2] = *coords;
        let (p0, p1, p2) = ((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1));
        if barycentric(p0, p1, p2, p0).is_none() {
            return; // Degenerate on screen
        }

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric(p0, p1, p2, p) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2 - bias;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Queue the frame buffer row by row, switching colors only when needed.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for (i, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Diffuse shading of one face against a point light.
fn shade(triangle: &Triangle, model: &Matrix4<f32>, light: &Point3<f32>) -> Cell {
    let normal = model
        .transform_vector(&triangle.calculate_normal())
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z);
    let center = model.transform_point(&triangle.centroid());
    let to_light = (light - center).try_normalize(1e-12).unwrap_or_else(Vector3::y);

    let brightness = (AMBIENT + (1.0 - AMBIENT) * normal.dot(&to_light).max(0.0)).min(1.0);
    let index = ((brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize)
        .min(LUMINOSITY_RAMP.len() - 1);

    let color = match index {
        0..=2 => Color::DarkCyan,
        3..=5 => Color::Cyan,
        _ => Color::White,
    };
    Cell::new(LUMINOSITY_RAMP[index], color)
}

/// Liang-Barsky clip of a screen-space segment to `[0, width] x [0, height]`.
fn clip_to_viewport(
    a: (f32, f32, f32),
    b: (f32, f32, f32),
    width: f32,
    height: f32,
) -> Option<((f32, f32, f32), (f32, f32, f32))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    for (p, q) in [(-dx, a.0), (dx, width - a.0), (-dy, a.1), (dy, height - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    let lerp = |t: f32| (a.0 + dx * t, a.1 + dy * t, a.2 + (b.2 - a.2) * t);
    Some((lerp(t0), lerp(t1)))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
