// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAX_ZOOM: f64 = 18.0;

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `None` for NaN or out-of-range components.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if lat.abs() > MAX_LATITUDE || lon.abs() > MAX_LONGITUDE {
            return None;
        }
        Some(Self { lat, lon })
    }

    pub fn clamped(self) -> Self {
        Self {
            lat: self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            lon: self.lon.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point, or `None` when there are no points.
    pub fn around(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.south_west.lon = bounds.south_west.lon.min(point.lon);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
            bounds.north_east.lon = bounds.north_east.lon.max(point.lon);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn lon_span(&self) -> f64 {
        self.north_east.lon - self.south_west.lon
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lon..=self.north_east.lon).contains(&point.lon)
    }
}

/// Visible extent of a viewport at `zoom`, using the slippy-map convention of the world
/// spanning 360 degrees of longitude at zoom 0 and halving per zoom level.
pub fn viewport_bounds(center: Coordinate, zoom: f64) -> Bounds {
    let lon_half = MAX_LONGITUDE / 2f64.powf(zoom);
    let lat_half = MAX_LATITUDE / 2f64.powf(zoom);
    Bounds {
        south_west: Coordinate::new(center.lat - lat_half, center.lon - lon_half),
        north_east: Coordinate::new(center.lat + lat_half, center.lon + lon_half),
    }
}

/// `zoom` limited to the levels a surface can show, `0..=MAX_ZOOM`.
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(0.0, MAX_ZOOM)
}

/// Highest zoom (capped at `max_zoom`) whose viewport still contains `bounds`.
pub fn zoom_to_fit(bounds: &Bounds, max_zoom: f64) -> f64 {
    let lon_span = bounds.lon_span().max(f64::EPSILON);
    let lat_span = bounds.lat_span().max(f64::EPSILON);
    let lon_zoom = (2.0 * MAX_LONGITUDE / lon_span).log2();
    let lat_zoom = (2.0 * MAX_LATITUDE / lat_span).log2();
    clamp_zoom(lon_zoom.min(lat_zoom).floor().min(max_zoom))
}
