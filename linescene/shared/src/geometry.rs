use glam::Vec3;

use crate::{color::Color, error::GeometryError};

pub type Line = (Vec3, Vec3);

/// A batch of line segments sharing one color and line width.
///
/// Vertices are stored as consecutive endpoint pairs (line-list topology).
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub color: Color,
    pub line_width: f32,
}

impl LineGroup {
    pub fn from_lines(
        name: impl Into<String>,
        lines: &[Line],
        color: Color,
        line_width: f32,
    ) -> Result<Self, GeometryError> {
        if !(line_width > 0.0) {
            return Err(GeometryError::LineWidth(line_width));
        }

        Ok(Self {
            name: name.into(),
            vertices: lines.iter().flat_map(|(a, b)| [*a, *b]).collect(),
            color,
            line_width,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Interleaved `x, y, z` floats, ready for upload
    pub fn positions(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }
}

/// Three lines from the origin along the positive X, Y and Z axes.
#[derive(Debug, Clone, Copy)]
pub struct Axis {
    pub length: f32,
}

impl Axis {
    pub fn new(length: f32) -> Self {
        Self { length }
    }

    pub fn line_x(&self) -> Line {
        (Vec3::ZERO, Vec3::X * self.length)
    }

    pub fn line_y(&self) -> Line {
        (Vec3::ZERO, Vec3::Y * self.length)
    }

    pub fn line_z(&self) -> Line {
        (Vec3::ZERO, Vec3::Z * self.length)
    }
}

/// Upper bound on the lines a grid may have in each direction.
pub const MAX_GRID_LINES: usize = 10_001;

/// A square grid on the XZ plane centered on the origin.
///
/// `size` is the half-extent in world units; lines are placed every `spacing`
/// units from `-size` to `+size` in both directions.
#[derive(Debug, Clone, Copy)]
pub struct SquareGrid {
    spacing: f32,
    /// Number of steps from the center line to the outermost one
    steps: i32,
}

impl SquareGrid {
    pub fn new(size: f32, spacing: f32) -> Result<Self, GeometryError> {
        if !(spacing > 0.0) {
            return Err(GeometryError::GridSpacing(spacing));
        }

        if !(size >= 0.0) {
            return Err(GeometryError::GridSize(size));
        }

        let max_steps = (MAX_GRID_LINES - 1) / 2;
        let steps = (size / spacing).floor();
        if !(steps <= max_steps as f32) {
            return Err(GeometryError::GridTooDense { size, spacing });
        }

        Ok(Self {
            spacing,
            steps: steps as i32,
        })
    }

    /// Lines per direction
    pub fn lines_per_direction(&self) -> usize {
        self.steps as usize * 2 + 1
    }

    /// Lines parallel to Z first (sweeping X), then lines parallel to X (sweeping Z).
    pub fn lines(&self) -> Vec<Line> {
        let steps = self.steps;
        let extent = steps as f32 * self.spacing;

        let along_z = (-steps..=steps).map(|i| {
            let x = i as f32 * self.spacing;
            (Vec3::new(x, 0.0, -extent), Vec3::new(x, 0.0, extent))
        });
        let along_x = (-steps..=steps).map(|i| {
            let z = i as f32 * self.spacing;
            (Vec3::new(-extent, 0.0, z), Vec3::new(extent, 0.0, z))
        });

        along_z.chain(along_x).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_line_count() {
        let grid = SquareGrid::new(5.0, 1.0).unwrap();
        assert_eq!(grid.lines_per_direction(), 11);
        assert_eq!(grid.lines().len(), 22);

        let grid = SquareGrid::new(5.0, 2.0).unwrap();
        assert_eq!(grid.lines_per_direction(), 5);

        let grid = SquareGrid::new(0.0, 1.0).unwrap();
        assert_eq!(grid.lines().len(), 2);
    }

    #[test]
    fn grid_spans_the_extent() {
        let lines = SquareGrid::new(5.0, 1.0).unwrap().lines();

        assert_eq!(lines[0], (Vec3::new(-5.0, 0.0, -5.0), Vec3::new(-5.0, 0.0, 5.0)));
        assert_eq!(lines[10], (Vec3::new(5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0)));
        assert_eq!(lines[11], (Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, -5.0)));
        assert!(lines.iter().all(|(a, b)| a.y == 0.0 && b.y == 0.0));
    }

    #[test]
    fn grid_rejects_bad_parameters() {
        assert_eq!(
            SquareGrid::new(5.0, 0.0).unwrap_err(),
            GeometryError::GridSpacing(0.0)
        );
        assert_eq!(
            SquareGrid::new(-1.0, 1.0).unwrap_err(),
            GeometryError::GridSize(-1.0)
        );
        assert!(SquareGrid::new(5.0, f32::NAN).is_err());
    }

    #[test]
    fn grid_line_count_is_bounded() {
        let max_steps = ((MAX_GRID_LINES - 1) / 2) as f32;
        let grid = SquareGrid::new(max_steps, 1.0).unwrap();
        assert_eq!(grid.lines_per_direction(), MAX_GRID_LINES);

        assert_eq!(
            SquareGrid::new(max_steps + 1.0, 1.0).unwrap_err(),
            GeometryError::GridTooDense {
                size: max_steps + 1.0,
                spacing: 1.0
            }
        );
        assert!(matches!(
            SquareGrid::new(3.0e9, 1.0),
            Err(GeometryError::GridTooDense { .. })
        ));
        assert!(matches!(
            SquareGrid::new(1.0, f32::MIN_POSITIVE),
            Err(GeometryError::GridTooDense { .. })
        ));
        assert!(matches!(
            SquareGrid::new(f32::INFINITY, 1.0),
            Err(GeometryError::GridTooDense { .. })
        ));
    }

    #[test]
    fn grid_group_flattens_endpoints() {
        let grid = SquareGrid::new(5.0, 1.0).unwrap();
        let group = LineGroup::from_lines("grid", &grid.lines(), Color::BLACK, 1.0).unwrap();

        assert_eq!(group.segment_count(), 22);
        assert_eq!(group.vertices.len(), 44);
        assert_eq!(group.positions().len(), 44 * 3);
        assert_eq!(&group.positions()[..6], &[-5.0, 0.0, -5.0, -5.0, 0.0, 5.0]);
    }

    #[test]
    fn axis_lines_start_at_origin() {
        let axis = Axis::new(2.0);
        assert_eq!(axis.line_x(), (Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(axis.line_y(), (Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(axis.line_z(), (Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn line_width_must_be_positive() {
        let axis = Axis::new(1.0);
        assert_eq!(
            LineGroup::from_lines("x", &[axis.line_x()], Color::RED, 0.0).unwrap_err(),
            GeometryError::LineWidth(0.0)
        );
    }
}
