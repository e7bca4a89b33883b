//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseGeometryError(String);

/// Target dimensions produced by [`fit_within`], kept fractional.
///
/// Scaling a 1000×333 image into a 500px bound gives a height of 166.5; the
/// fraction is carried until the raster surface is allocated, where
/// [`ScaledSize::to_pixels`] snaps it onto the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSize {
    pub width: f64,
    pub height: f64,
}

impl ScaledSize {
    fn unchanged(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// Whether the size is exactly the given original size.
    pub fn is_unchanged(&self, width: u32, height: u32) -> bool {
        self.width == width as f64 && self.height == height as f64
    }

    /// Integer pixel size for the raster surface.
    ///
    /// Rounds half away from zero and never goes below one pixel, so a
    /// 10000×1 strip scaled into 100px stays 100×1 instead of collapsing.
    pub fn to_pixels(&self) -> (u32, u32) {
        (snap(self.width), snap(self.height))
    }
}

fn snap(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

/// Fit `(width, height)` inside a square bound of `max_size` on the longer side.
///
/// Only ever shrinks. Landscape images scale by `max_size / width`; portrait
/// and square images scale by `max_size / height`. Images already inside the
/// bound come back unchanged.
///
/// # Examples
/// ```
/// # use pixfit::imaging::fit_within;
/// let size = fit_within(4000, 3000, 1500);
/// assert_eq!(size.to_pixels(), (1500, 1125));
///
/// // Inside the bound: untouched
/// assert!(fit_within(800, 600, 1500).is_unchanged(800, 600));
/// ```
pub fn fit_within(width: u32, height: u32, max_size: u32) -> ScaledSize {
    let max = max_size as f64;

    if width > height {
        if width > max_size {
            return ScaledSize {
                width: max,
                height: height as f64 * (max / width as f64),
            };
        }
    } else if height > max_size {
        // Portrait or square
        return ScaledSize {
            width: width as f64 * (max / height as f64),
            height: max,
        };
    }

    ScaledSize::unchanged(width, height)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h.max(tgt_h))
    }
}

/// Top-left offset that centers a `crop` region inside `outer`.
pub fn center_crop_offset(outer: (u32, u32), crop: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(crop.0) / 2,
        outer.1.saturating_sub(crop.1) / 2,
    )
}

/// Width-to-height proportion, written `16:9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }
}

impl FromStr for AspectRatio {
    type Err = ParseGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseGeometryError(format!("'{s}' is not a ratio like 16:9"));
        let (w, h) = s.trim().split_once(':').ok_or_else(invalid)?;
        let w = w.trim().parse().map_err(|_| invalid())?;
        let h = h.trim().parse().map_err(|_| invalid())?;
        Self::new(w, h).ok_or_else(invalid)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// A rectangle in pixel coordinates, written `WxH+X+Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Non-empty and entirely inside a `(width, height)` image.
    pub fn fits_within(&self, image: (u32, u32)) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        self.width > 0
            && self.height > 0
            && right.is_some_and(|r| r <= image.0)
            && bottom.is_some_and(|b| b <= image.1)
    }

    pub fn is_whole(&self, image: (u32, u32)) -> bool {
        self.x == 0 && self.y == 0 && (self.width, self.height) == image
    }
}

impl FromStr for Region {
    type Err = ParseGeometryError;

    /// `800x600+10+20`; the offset may be left out and defaults to `+0+0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseGeometryError(format!("'{s}' is not a region like 800x600+10+20"));
        let mut parts = s.trim().split('+');
        let size = parts.next().ok_or_else(invalid)?;
        let (w, h) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
        let next = |part: Option<&str>| -> Result<u32, ParseGeometryError> {
            part.map_or(Ok(0), |v| v.parse().map_err(|_| invalid()))
        };
        let x = next(parts.next())?;
        let y = next(parts.next())?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            x,
            y,
            width: w.parse().map_err(|_| invalid())?,
            height: h.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Largest `(width, height)` with the given ratio that fits inside `source`.
///
/// One side always matches the source; the other is rounded to the nearest
/// pixel and kept between 1 and the source size.
pub fn largest_aspect_crop(source: (u32, u32), ratio: AspectRatio) -> (u32, u32) {
    let (sw, sh) = (source.0 as u64, source.1 as u64);
    let (rw, rh) = (ratio.width as u64, ratio.height as u64);

    if sw * rh > sh * rw {
        // Source is wider: keep the full height
        let w = (sh * rw + rh / 2) / rh;
        (w.clamp(1, sw) as u32, source.1)
    } else {
        let h = (sw * rh + rw / 2) / rw;
        (source.0, h.clamp(1, sh) as u32)
    }
}

/// Tile rectangles for splitting `source` into a `columns`×`rows` grid, row by row.
///
/// With a `tile_aspect`, the largest centered area whose tiles have that
/// shape is used; otherwise the whole image. Tiles are equal-sized, so up to
/// `columns - 1` pixels (and `rows - 1`) are trimmed evenly from the edges.
/// Returns `None` when the grid is empty or a tile would be less than a pixel.
pub fn grid_tiles(
    source: (u32, u32),
    columns: u32,
    rows: u32,
    tile_aspect: Option<AspectRatio>,
) -> Option<Vec<Region>> {
    if columns == 0 || rows == 0 {
        return None;
    }

    let area = match tile_aspect {
        Some(tile) => {
            let grid = AspectRatio::new(
                tile.width.checked_mul(columns)?,
                tile.height.checked_mul(rows)?,
            )?;
            largest_aspect_crop(source, grid)
        }
        None => source,
    };

    let (tile_w, tile_h) = (area.0 / columns, area.1 / rows);
    if tile_w == 0 || tile_h == 0 {
        return None;
    }
    let (x0, y0) = center_crop_offset(source, (tile_w * columns, tile_h * rows));

    Some(
        (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| Region {
                    x: x0 + column * tile_w,
                    y: y0 + row * tile_h,
                    width: tile_w,
                    height: tile_h,
                })
            })
            .collect(),
    )
}
