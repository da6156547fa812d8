/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::{self, Write};

use cubes_core::geometry::{self, Vertex};
use cubes_core::{lighting, projection};
use cubes_core::{DrawCall, RenderBackend};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
/// The camera aspect must be `width / (height * CELL_ASPECT)`.
pub const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const EMPTY: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer<W: Write> {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    out: W,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(width: usize, height: usize, out: W) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
            out,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Character currently stored at a cell
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x].character)
        } else {
            None
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.cells = vec![EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    fn render_call(&mut self, call: &DrawCall<'_>) {
        let model_view = call.model_view();
        let normals = lighting::normal_matrix(&model_view);
        let mvp = call.projection * model_view;

        for [a, b, c] in call.mesh.triangles() {
            let Some(screen) = self.project_triangle([a, b, c], &mvp) else {
                continue; // Triangle is clipped
            };

            // Flat shading from the face normal in view space
            let normal = lighting::transform_normal(&normals, &a.normal);
            let shaded = call.light.shade(&a.color, &normal);
            let intensity = call.light.intensity(&normal);
            let brightness = (intensity[0] + intensity[1] + intensity[2]) / 3.0;
            let peak = (call.light.ambient.iter().sum::<f32>()
                + call.light.color.iter().sum::<f32>())
                / 3.0;

            let cell = Cell {
                character: ramp_char(brightness / peak.max(f32::EPSILON)),
                color: terminal_color(&shaded, &a.color),
            };
            self.rasterize_triangle(&screen, cell);
        }
    }

    /// Project three vertices with a full MVP; `None` if any is clipped
    fn project_triangle(
        &self,
        vertices: [&Vertex; 3],
        mvp: &Matrix4<f32>,
    ) -> Option<[(f32, f32, f32); 3]> {
        let mut out = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in out.iter_mut().zip(vertices) {
            *slot = projection::project_point(
                mvp,
                &vertex.position,
                self.width as f32,
                self.height as f32,
            )?;
        }
        Some(out)
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // LEQUAL depth test
                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth <= self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Queue the whole character buffer, one row per line
    pub fn present(&mut self) -> io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            self.out.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    self.out.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                self.out.queue(Print(cell.character))?;
            }
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }
}

impl<W: Write> RenderBackend for AsciiRenderer<W> {
    type Error = io::Error;

    fn begin_frame(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> io::Result<()> {
        self.render_call(call);
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        self.present()
    }
}

fn ramp_char(level: f32) -> char {
    let index = (level.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Nearest named terminal color for a face color
fn terminal_color(shaded: &geometry::Color, base: &geometry::Color) -> Color {
    let dim = shaded[0].max(shaded[1]).max(shaded[2]) < 0.5;
    match (base[0] > 0.5, base[1] > 0.5, base[2] > 0.5, dim) {
        (true, true, true, false) => Color::White,
        (true, true, true, true) => Color::Grey,
        (true, false, false, false) => Color::Red,
        (true, false, false, true) => Color::DarkRed,
        (false, true, false, false) => Color::Green,
        (false, true, false, true) => Color::DarkGreen,
        (false, false, true, false) => Color::Blue,
        (false, false, true, true) => Color::DarkBlue,
        (true, true, false, false) => Color::Yellow,
        (true, true, false, true) => Color::DarkYellow,
        (true, false, true, false) => Color::Magenta,
        (true, false, true, true) => Color::DarkMagenta,
        (false, true, true, false) => Color::Cyan,
        (false, true, true, true) => Color::DarkCyan,
        (false, false, false, _) => Color::DarkGrey,
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use cubes_core::{Camera, DirectionalLight, Mesh, ObjectId};
    use nalgebra::Vector3;

    const W: usize = 80;
    const H: usize = 40;

    fn camera() -> Camera {
        let mut camera = Camera::new(W as u32, H as u32);
        camera.set_aspect(W as f32, H as f32 * CELL_ASPECT);
        camera
    }

    fn draw_cube(
        renderer: &mut AsciiRenderer<Vec<u8>>,
        mesh: &Mesh,
        light: &DirectionalLight,
        offset: Vector3<f32>,
    ) {
        let camera = camera();
        renderer
            .draw(&DrawCall {
                object: ObjectId(0),
                mesh,
                model: Matrix4::new_translation(&offset),
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
                light,
            })
            .expect("drawing into memory does not fail");
    }

    fn filled(renderer: &AsciiRenderer<Vec<u8>>) -> usize {
        (0..H)
            .flat_map(|y| (0..W).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != Some(' '))
            .count()
    }

    #[test]
    fn test_cube_in_front_covers_center() {
        let mut renderer = AsciiRenderer::new(W, H, Vec::new());
        let light = DirectionalLight::default();
        renderer.begin_frame().unwrap();
        draw_cube(&mut renderer, &Mesh::cube(1.0), &light, Vector3::new(0.0, 0.0, -10.0));
        assert_ne!(renderer.char_at(W / 2, H / 2), Some(' '));
        assert_eq!(renderer.char_at(0, 0), Some(' '));
    }

    #[test]
    fn test_cube_behind_camera_draws_nothing() {
        let mut renderer = AsciiRenderer::new(W, H, Vec::new());
        let light = DirectionalLight::default();
        draw_cube(&mut renderer, &Mesh::cube(1.0), &light, Vector3::new(0.0, 0.0, 10.0));
        assert_eq!(filled(&renderer), 0);
    }

    #[test]
    fn test_begin_frame_clears() {
        let mut renderer = AsciiRenderer::new(W, H, Vec::new());
        let light = DirectionalLight::default();
        draw_cube(&mut renderer, &Mesh::cube(1.0), &light, Vector3::new(0.0, 0.0, -10.0));
        assert!(filled(&renderer) > 0);
        renderer.begin_frame().unwrap();
        assert_eq!(filled(&renderer), 0);
    }

    #[test]
    fn test_nearer_cube_wins_depth_test() {
        let mut renderer = AsciiRenderer::new(W, H, Vec::new());
        let light = DirectionalLight::default();
        let big_far = Mesh::cube(3.0);
        let small_near = Mesh::cube(0.5);
        draw_cube(&mut renderer, &big_far, &light, Vector3::new(0.0, 0.0, -20.0));
        draw_cube(&mut renderer, &small_near, &light, Vector3::new(0.0, 0.0, -5.0));
        // Drawing far first or near first must give the same center cell
        let mut reversed = AsciiRenderer::new(W, H, Vec::new());
        draw_cube(&mut reversed, &small_near, &light, Vector3::new(0.0, 0.0, -5.0));
        draw_cube(&mut reversed, &big_far, &light, Vector3::new(0.0, 0.0, -20.0));
        assert_eq!(renderer.char_at(W / 2, H / 2), reversed.char_at(W / 2, H / 2));

        let mut near_only = AsciiRenderer::new(W, H, Vec::new());
        draw_cube(&mut near_only, &small_near, &light, Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(
            renderer.char_at(W / 2, H / 2),
            near_only.char_at(W / 2, H / 2)
        );
    }

    #[test]
    fn test_present_writes_every_row() {
        let mut renderer = AsciiRenderer::new(4, 3, Vec::new());
        renderer.end_frame().unwrap();
        let out = String::from_utf8(renderer.into_writer()).expect("utf-8 output");
        assert_eq!(out.matches(' ').count(), 12);
    }

    #[test]
    fn test_ramp_bounds() {
        assert_eq!(ramp_char(-1.0), '.');
        assert_eq!(ramp_char(0.0), '.');
        assert_eq!(ramp_char(1.0), '@');
        assert_eq!(ramp_char(7.0), '@');
    }

    #[test]
    fn test_terminal_color_for_face_colors() {
        assert_eq!(terminal_color(&[1.0, 0.0, 0.0, 1.0], &[1.0, 0.0, 0.0, 1.0]), Color::Red);
        assert_eq!(terminal_color(&[0.0, 0.0, 0.3, 1.0], &[0.0, 0.0, 1.0, 1.0]), Color::DarkBlue);
        assert_eq!(terminal_color(&[1.0, 1.0, 1.0, 1.0], &[1.0, 1.0, 1.0, 1.0]), Color::White);
    }
}
