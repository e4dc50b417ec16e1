//! Reference ellipsoid and cartesian/cartographic conversion.
//!
//! Cartesian coordinates are Earth-centered, Earth-fixed: +Z through the north
//! pole, +X through (0° lon, 0° lat), meters.

use cirrus_config::GlobeShape;
use glam::DVec3;

/// Fixed-point iterations for geodetic latitude. Converges to sub-millimeter
/// accuracy for points outside the ellipsoid well before this.
const LATITUDE_ITERATIONS: usize = 6;

/// Longitude, latitude (radians) and height above the ellipsoid (meters).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Build from degrees of longitude and latitude.
    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64, height: f64) -> Self {
        Self::new(longitude_deg.to_radians(), latitude_deg.to_radians(), height)
    }
}

/// An oblate ellipsoid of revolution around the Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    semi_major: f64,
    semi_minor: f64,
}

impl Ellipsoid {
    /// WGS84.
    pub const WGS84: Self = Self {
        semi_major: 6_378_137.0,
        semi_minor: 6_356_752.314_245_179,
    };

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            semi_minor: radius,
        }
    }

    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// First eccentricity squared, `1 - b²/a²`.
    pub fn eccentricity_squared(&self) -> f64 {
        1.0 - (self.semi_minor * self.semi_minor) / (self.semi_major * self.semi_major)
    }

    /// Prime vertical radius of curvature at the given geodetic latitude.
    fn prime_vertical_radius(&self, sin_lat: f64) -> f64 {
        self.semi_major / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    pub fn cartographic_to_cartesian(&self, c: Cartographic) -> DVec3 {
        let e2 = self.eccentricity_squared();
        let (sin_lat, cos_lat) = c.latitude.sin_cos();
        let (sin_lon, cos_lon) = c.longitude.sin_cos();
        let n = self.prime_vertical_radius(sin_lat);

        DVec3::new(
            (n + c.height) * cos_lat * cos_lon,
            (n + c.height) * cos_lat * sin_lon,
            (n * (1.0 - e2) + c.height) * sin_lat,
        )
    }

    /// Convert an ECEF position to geodetic coordinates.
    ///
    /// Points inside the ellipsoid yield negative heights; the center maps to
    /// a height of `-semi_minor`.
    pub fn cartesian_to_cartographic(&self, position: DVec3) -> Cartographic {
        let e2 = self.eccentricity_squared();
        let p = position.x.hypot(position.y);
        let z = position.z;

        // On the polar axis longitude is undefined; report 0.
        if p < 1e-9 {
            let latitude = if z >= 0.0 {
                std::f64::consts::FRAC_PI_2
            } else {
                -std::f64::consts::FRAC_PI_2
            };
            return Cartographic::new(0.0, latitude, z.abs() - self.semi_minor);
        }

        let longitude = position.y.atan2(position.x);
        let mut latitude = z.atan2(p * (1.0 - e2));
        for _ in 0..LATITUDE_ITERATIONS {
            let sin_lat = latitude.sin();
            let n = self.prime_vertical_radius(sin_lat);
            latitude = (z + e2 * n * sin_lat).atan2(p);
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let height = p * cos_lat + z * sin_lat
            - self.semi_major * (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Cartographic::new(longitude, latitude, height)
    }

    /// Height of `position` above the ellipsoid surface in meters.
    pub fn height_above_surface(&self, position: DVec3) -> f64 {
        self.cartesian_to_cartographic(position).height
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl From<GlobeShape> for Ellipsoid {
    fn from(shape: GlobeShape) -> Self {
        match shape {
            GlobeShape::Wgs84 => Self::WGS84,
            GlobeShape::Sphere { radius_m } => Self::sphere(radius_m),
        }
    }
}
