//! Flight profile configuration
//!
//! Tuning knobs for the synthetic flight generator. Defaults reproduce the
//! reference ground-station demo: a launch site near 30°N 90°E, boards
//! staggering their launches over 15 s, and sensor baselines drawn from
//! realistic ambient ranges.

/// Inclusive-exclusive uniform range, `(low, high)`
pub type Range = (f64, f64);

/// Per-run configuration for the flight generator
#[derive(Debug, Clone, Copy)]
pub struct FlightProfile {
    /// Launch site latitude in degrees
    pub site_lat: f64,
    /// Launch site longitude in degrees
    pub site_lon: f64,
    /// Per-board jitter around the site, degrees
    pub site_jitter_deg: f64,
    /// Board base altitude above ground, meters
    pub base_altitude: Range,
    /// Ambient temperature baseline, °C
    pub temperature: Range,
    /// Ambient pressure baseline, Pa
    pub pressure: Range,
    /// Ambient humidity baseline, %
    pub humidity: Range,
    /// Maximum stagger between board launches, seconds
    pub launch_stagger_s: f64,
    /// In-flight GPS random-walk step, degrees per sample
    pub drift_deg: f64,
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            site_lat: 30.0,
            site_lon: 90.0,
            site_jitter_deg: 0.01,
            base_altitude: (0.0, 50.0),
            temperature: (20.0, 25.0),
            pressure: (1010.0, 1020.0),
            humidity: (40.0, 60.0),
            launch_stagger_s: 15.0,
            drift_deg: 0.001,
        }
    }
}

impl FlightProfile {
    /// Move the launch site
    pub fn with_site(mut self, lat: f64, lon: f64) -> Self {
        self.site_lat = lat;
        self.site_lon = lon;
        self
    }

    /// Override the launch stagger window
    ///
    /// Zero makes all boards launch together, which keeps phase timelines
    /// aligned across boards in tests.
    pub fn with_launch_stagger(mut self, seconds: f64) -> Self {
        self.launch_stagger_s = seconds.max(0.0);
        self
    }
}
