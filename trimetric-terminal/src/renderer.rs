/// ASCII preview of the projected cuboid net
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector2;
use std::io::Write;
use trimetric_core::{CompositeDocument, Face};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

fn face_fill(face: Face) -> char {
    match face {
        Face::X => '#',
        Face::Y => '=',
        Face::Z => '*',
    }
}

/// Rasterizes the outlines of the three projected faces into a character grid
pub struct AsciiPreview {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiPreview {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    pub fn render_composite(&mut self, composite: &CompositeDocument) {
        let outlines: Vec<(Face, [Vector2<f64>; 4])> = composite
            .groups()
            .iter()
            .map(|group| (group.face, group.outline()))
            .collect();

        let Some((min, max)) = bounds(outlines.iter().flat_map(|(_, corners)| corners.iter())) else {
            return;
        };
        if self.width < 2 || self.height < 2 {
            return;
        }

        // Fit the drawing into the grid, keeping the on-screen proportions.
        let extent = (max - min).map(|v| v.max(f64::EPSILON));
        let scale = ((self.width - 1) as f64 / extent.x)
            .min((self.height - 1) as f64 * CELL_ASPECT / extent.y);
        let to_cell = |p: &Vector2<f64>| {
            let d = p - min;
            (d.x * scale, d.y * scale / CELL_ASPECT)
        };

        for (face, corners) in outlines {
            let cells = corners.map(|corner| to_cell(&corner));
            let fill = face_fill(face);
            self.rasterize_triangle(&[cells[0], cells[1], cells[2]], fill);
            self.rasterize_triangle(&[cells[0], cells[2], cells[3]], fill);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to grid bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.char_buffer[y as usize * self.width + x as usize] = character;
                    }
                }
            }
        }
    }

    /// Grid rows with trailing blanks removed
    pub fn lines(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for line in self.lines() {
            for c in line.chars() {
                let color = match c {
                    '#' => Color::Cyan,
                    '=' => Color::Grey,
                    '*' => Color::White,
                    _ => Color::DarkGrey,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        writer.flush()
    }
}

fn bounds<'a>(
    mut points: impl Iterator<Item = &'a Vector2<f64>>,
) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let first = *points.next()?;
    Some(points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p))))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
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
    use trimetric_core::{Composer, FaceSources};

    fn cube() -> CompositeDocument {
        let face = r#"<svg width="10" height="10"><defs/></svg>"#;
        Composer::from_degrees(45.0, 35.0)
            .unwrap()
            .compose(&FaceSources::new(face, face, face))
            .unwrap()
    }

    #[test]
    fn test_preview_shows_every_face() {
        let mut preview = AsciiPreview::new(60, 30);
        preview.render_composite(&cube());
        let text = preview.lines().join("\n");
        assert!(text.contains('#'));
        assert!(text.contains('='));
        assert!(text.contains('*'));
    }

    #[test]
    fn test_clear() {
        let mut preview = AsciiPreview::new(20, 10);
        preview.render_composite(&cube());
        preview.clear();
        assert!(preview.lines().iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-12);
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
    }
}
