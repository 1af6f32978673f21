// Domain rules - Trim validity, filter mapping and export job construction

use serde::{Deserialize, Serialize};

use crate::domain::model::*;

/// Shortest clip the editor will produce
pub const MIN_CLIP_MS: u64 = 1000;

/// Business rules for trim edits
pub struct TrimRules;

impl TrimRules {
    /// `0 <= start < end <= duration` and at least [`MIN_CLIP_MS`] long
    pub fn is_valid(range: &TrimRange, source_duration_ms: u64) -> bool {
        range.start_ms < range.end_ms
            && range.end_ms <= source_duration_ms
            && range.duration_ms() >= MIN_CLIP_MS
    }
}

/// 4x5 linear color matrix, row-major, RGBA rows
///
/// The fifth column is a translation in 0-255 scale. The last row of every
/// preset is the identity for alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix {
    rows: [[f32; 5]; 4],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix::diagonal(1.0, 1.0, 1.0, 1.0);

    pub const SEPIA: ColorMatrix = ColorMatrix::from_rows([
        [0.393, 0.769, 0.189, 0.0, 0.0],
        [0.349, 0.686, 0.168, 0.0, 0.0],
        [0.272, 0.534, 0.131, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
    ]);

    pub const DARK: ColorMatrix = ColorMatrix::diagonal(0.4, 0.4, 0.4, 1.0);

    pub const WARM: ColorMatrix = ColorMatrix::diagonal(1.3, 1.1, 0.8, 1.0);

    pub const INVERT: ColorMatrix = ColorMatrix::from_rows([
        [-1.0, 0.0, 0.0, 0.0, 255.0],
        [0.0, -1.0, 0.0, 0.0, 255.0],
        [0.0, 0.0, -1.0, 0.0, 255.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
    ]);

    /// Saturation 0, Rec. 709 luma weights
    pub const GRAYSCALE: ColorMatrix = ColorMatrix::from_rows([
        [0.213, 0.715, 0.072, 0.0, 0.0],
        [0.213, 0.715, 0.072, 0.0, 0.0],
        [0.213, 0.715, 0.072, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
    ]);

    pub const fn from_rows(rows: [[f32; 5]; 4]) -> Self {
        Self { rows }
    }

    pub const fn diagonal(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            rows: [
                [r, 0.0, 0.0, 0.0, 0.0],
                [0.0, g, 0.0, 0.0, 0.0],
                [0.0, 0.0, b, 0.0, 0.0],
                [0.0, 0.0, 0.0, a, 0.0],
            ],
        }
    }

    /// Scale RGB by `scale` around the 127.5 midpoint
    pub fn contrast(scale: f32) -> Self {
        let offset = 127.5 * (1.0 - scale);
        Self {
            rows: [
                [scale, 0.0, 0.0, 0.0, offset],
                [0.0, scale, 0.0, 0.0, offset],
                [0.0, 0.0, scale, 0.0, offset],
                [0.0, 0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    pub fn rows(&self) -> &[[f32; 5]; 4] {
        &self.rows
    }

    /// Left 4x4 block
    pub fn coefficients(&self) -> [[f32; 4]; 4] {
        let mut out = [[0.0; 4]; 4];
        for (row, src) in out.iter_mut().zip(self.rows.iter()) {
            row.copy_from_slice(&src[..4]);
        }
        out
    }

    pub fn translation(&self) -> [f32; 4] {
        [
            self.rows[0][4],
            self.rows[1][4],
            self.rows[2][4],
            self.rows[3][4],
        ]
    }

    pub fn has_translation(&self) -> bool {
        self.translation().iter().any(|t| *t != 0.0)
    }

    /// Transform one RGBA pixel given in 0-255 scale, clamped to that range
    pub fn apply(&self, rgba: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (channel, row) in out.iter_mut().zip(self.rows.iter()) {
            let value = row[0] * rgba[0]
                + row[1] * rgba[1]
                + row[2] * rgba[2]
                + row[3] * rgba[3]
                + row[4];
            *channel = value.clamp(0.0, 255.0);
        }
        out
    }
}

/// One step of an effect chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorTransform {
    /// Desaturate completely
    Grayscale,
    /// 255 - value on every color channel
    Invert,
    /// Engine-native contrast, `amount` in -1..1, 0 is neutral
    Contrast { amount: f32 },
    Matrix { matrix: ColorMatrix },
}

impl ColorTransform {
    /// Equivalent color matrix, used for preview rendering
    pub fn to_matrix(&self) -> ColorMatrix {
        match self {
            ColorTransform::Grayscale => ColorMatrix::GRAYSCALE,
            ColorTransform::Invert => ColorMatrix::INVERT,
            ColorTransform::Contrast { amount } => ColorMatrix::contrast(1.0 + amount),
            ColorTransform::Matrix { matrix } => *matrix,
        }
    }
}

/// Contrast used by the HighContrast preset (scale 1.5)
pub const HIGH_CONTRAST_AMOUNT: f32 = 0.5;

/// Maps filter presets onto effect chains
pub struct FilterMapper;

impl FilterMapper {
    /// Ordered effect chain for `filter`; depends on nothing else
    pub fn effect_chain(filter: VideoFilter) -> Vec<ColorTransform> {
        match filter {
            VideoFilter::None => Vec::new(),
            VideoFilter::BlackWhite => vec![ColorTransform::Grayscale],
            VideoFilter::Dark => vec![ColorTransform::Matrix {
                matrix: ColorMatrix::DARK,
            }],
            VideoFilter::Sepia => vec![ColorTransform::Matrix {
                matrix: ColorMatrix::SEPIA,
            }],
            VideoFilter::Inverted => vec![ColorTransform::Invert],
            VideoFilter::HighContrast => vec![ColorTransform::Contrast {
                amount: HIGH_CONTRAST_AMOUNT,
            }],
            VideoFilter::Warm => vec![ColorTransform::Matrix {
                matrix: ColorMatrix::WARM,
            }],
        }
    }

    /// Whole chain folded into a single matrix, `None` for an empty chain
    pub fn preview_matrix(filter: VideoFilter) -> Option<ColorMatrix> {
        let chain = Self::effect_chain(filter);
        if chain.is_empty() {
            return None;
        }
        let matrix = chain
            .iter()
            .map(ColorTransform::to_matrix)
            .fold(ColorMatrix::IDENTITY, |acc, next| compose(&next, &acc));
        Some(matrix)
    }
}

/// `outer` applied after `inner`
fn compose(outer: &ColorMatrix, inner: &ColorMatrix) -> ColorMatrix {
    let a = outer.rows();
    let b = inner.rows();
    let mut rows = [[0.0f32; 5]; 4];
    for i in 0..4 {
        for j in 0..5 {
            let mut sum: f32 = (0..4).map(|k| a[i][k] * b[k][j]).sum();
            if j == 4 {
                sum += a[i][4];
            }
            rows[i][j] = sum;
        }
    }
    ColorMatrix::from_rows(rows)
}

/// Job descriptor handed to the transform engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub source: SourceRef,
    pub clip_range: TrimRange,
    pub effect_chain: Vec<ColorTransform>,
}

impl ExportJob {
    /// Build the descriptor from a session snapshot; `None` without a source
    pub fn from_session(session: &Session) -> Option<Self> {
        let source = session.source()?.clone();
        Some(Self {
            source,
            clip_range: session.trim(),
            effect_chain: FilterMapper::effect_chain(session.selected_filter()),
        })
    }
}

#[cfg(test)]
mod tests;
