//! Peg pyramid layout
//!
//! Row `i` holds `initial + i` pegs spaced `2 * gap` apart and sits `2 * gap`
//! below row `i - 1`. Every row is centered on the same anchor x, which is
//! derived from the width of the last row. No randomness: slot geometry is
//! computed from the same layout and must agree with it.

use serde::{Deserialize, Serialize};

/// A static peg in the pyramid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub x: f32,
    pub y: f32,
    /// Row index, 0 is the top row
    pub row: u32,
}

/// Axis-aligned extent of the peg centers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PegBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl PegBounds {
    /// Horizontal span of the peg field
    #[inline]
    pub fn span_x(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn span_y(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Scene dimensions derived from the peg span plus padding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f32,
    pub height: f32,
}

/// Ordered pegs (row by row, left to right) plus derived bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub pegs: Vec<Peg>,
    /// `None` for an empty layout
    pub bounds: Option<PegBounds>,
    pub scene: SceneSize,
}

impl Layout {
    /// Generate the pyramid.
    ///
    /// `rows == 0` or `initial == 0` yields an empty layout, which callers
    /// must treat as a configuration error.
    pub fn generate(
        gap: f32,
        rows: u32,
        initial: u32,
        top_y: f32,
        reference_width: f32,
        padding: (f32, f32),
    ) -> Self {
        if rows == 0 || initial == 0 {
            return Self {
                pegs: Vec::new(),
                bounds: None,
                scene: SceneSize {
                    width: padding.0,
                    height: padding.1,
                },
            };
        }

        let last_row_count = initial + rows - 1;
        let anchor_x = (gap * last_row_count as f32 + reference_width) / 2.0;

        let total = (0..rows).map(|i| (initial + i) as usize).sum();
        let mut pegs = Vec::with_capacity(total);
        for row in 0..rows {
            let count = initial + row;
            let y = top_y + row as f32 * gap * 2.0;
            let left = anchor_x - (count - 1) as f32 * gap;
            for j in 0..count {
                pegs.push(Peg {
                    x: left + j as f32 * gap * 2.0,
                    y,
                    row,
                });
            }
        }

        let bounds = pegs.iter().fold(
            PegBounds {
                min_x: f32::INFINITY,
                max_x: f32::NEG_INFINITY,
                min_y: f32::INFINITY,
                max_y: f32::NEG_INFINITY,
            },
            |b, p| PegBounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        );

        let scene = SceneSize {
            width: bounds.span_x() + padding.0,
            height: bounds.span_y() + padding.1,
        };

        log::debug!(
            "Generated {} pegs in {} rows, scene {}x{}",
            pegs.len(),
            rows,
            scene.width,
            scene.height
        );

        Self {
            pegs,
            bounds: Some(bounds),
            scene,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pegs.is_empty()
    }

    /// Number of rows present
    pub fn row_count(&self) -> u32 {
        self.pegs.last().map(|p| p.row + 1).unwrap_or(0)
    }

    /// Pegs belonging to one row
    pub fn row(&self, row: u32) -> impl Iterator<Item = &Peg> {
        self.pegs.iter().filter(move |p| p.row == row)
    }

    /// Y of the lowest peg row
    pub fn lowest_peg_y(&self) -> Option<f32> {
        self.bounds.map(|b| b.max_y)
    }
}
