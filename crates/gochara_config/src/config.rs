//! Config file layout and conversion into typed search settings.
//!
//! ```toml
//! bodies = ["Sun", "Moon", "Mars"]      # moving bodies; default: all
//!
//! [scan]
//! step_days = 0.5
//! orb_scale = 0.5
//!
//! [orbs]
//! luminary_factor = 1.25
//! angle_factor = 0.75
//!
//! [[relationships]]                     # replaces the default set when present
//! name = "Conjunction"
//! angle = 0
//! orb = 8
//!
//! [return_search]
//! window_days = 5
//!
//! [ephemeris]
//! kind = "chebyshev"                    # or "mean-motion" (default)
//! path = "ephemeris.json"               # relative to the config file
//!
//! [natal]
//! birth = "1990-07-14T18:05:00Z"        # either a birth instant...
//! ascendant = 213.4
//! midheaven = 128.9
//! [natal.points]                        # ...or explicit longitudes
//! Sun = 111.9
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use gochara_core::{
    ALL_BODIES, BirthEvent, Body, ChartBuilder, ChartPoint, ChebyshevEphemeris,
    EphemerisChartBuilder, EphemerisProvider, MeanMotionEphemeris, NatalChart,
};
use gochara_search::{
    OrbPolicy, Relationship, ReturnConfig, ScanConfig, default_relationships,
    validate_relationships,
};
use gochara_time::UtcTime;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RootToml {
    bodies: Option<Vec<Body>>,
    scan: ScanConfig,
    orbs: OrbPolicy,
    relationships: Option<Vec<Relationship>>,
    return_search: ReturnConfig,
    ephemeris: EphemerisToml,
    natal: Option<NatalToml>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum EphemerisKind {
    #[default]
    MeanMotion,
    Chebyshev,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EphemerisToml {
    kind: EphemerisKind,
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NatalToml {
    birth: Option<UtcTime>,
    ascendant: Option<f64>,
    midheaven: Option<f64>,
    points: BTreeMap<String, f64>,
}

/// Where body positions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemerisSource {
    /// Built-in uniform-motion table; approximate.
    MeanMotion,
    /// Chebyshev segments from a JSON file.
    Chebyshev(PathBuf),
}

impl EphemerisSource {
    /// Instantiate the provider.
    pub fn open(&self) -> Result<Box<dyn EphemerisProvider + Send + Sync>, ConfigError> {
        match self {
            Self::MeanMotion => Ok(Box::new(MeanMotionEphemeris::j2000())),
            Self::Chebyshev(path) => {
                debug!(path = %path.display(), "loading Chebyshev ephemeris");
                Ok(Box::new(ChebyshevEphemeris::load(path)?))
            }
        }
    }
}

/// How the fixed reference chart is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum NatalSetup {
    /// Body longitudes evaluated through the provider at the birth instant;
    /// angles are given directly (house systems are computed elsewhere).
    Birth {
        birth: UtcTime,
        ascendant_deg: Option<f64>,
        midheaven_deg: Option<f64>,
    },
    /// Explicit longitudes.
    Points(NatalChart),
}

impl NatalSetup {
    /// Build the reference chart for `bodies`.
    pub fn chart<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        bodies: &[Body],
    ) -> Result<NatalChart, ConfigError> {
        match self {
            Self::Points(chart) => Ok(chart.clone()),
            Self::Birth {
                birth,
                ascendant_deg,
                midheaven_deg,
            } => {
                let event = BirthEvent {
                    jd_tdb: birth.to_jd(),
                    ascendant_deg: *ascendant_deg,
                    midheaven_deg: *midheaven_deg,
                };
                Ok(EphemerisChartBuilder::new(provider, bodies.to_vec()).build(&event)?)
            }
        }
    }

    pub fn birth(&self) -> Option<&UtcTime> {
        match self {
            Self::Birth { birth, .. } => Some(birth),
            Self::Points(_) => None,
        }
    }
}

/// Fully validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GocharaConfig {
    /// Moving bodies of a transit scan.
    pub bodies: Vec<Body>,
    /// Scan settings, orb modifiers included.
    pub scan: ScanConfig,
    /// Ordered relationship set.
    pub relationships: Vec<Relationship>,
    pub return_search: ReturnConfig,
    pub ephemeris: EphemerisSource,
    pub natal: Option<NatalSetup>,
}

impl Default for GocharaConfig {
    fn default() -> Self {
        Self {
            bodies: ALL_BODIES.to_vec(),
            scan: ScanConfig::default(),
            relationships: default_relationships(),
            return_search: ReturnConfig::default(),
            ephemeris: EphemerisSource::MeanMotion,
            natal: None,
        }
    }
}

impl GocharaConfig {
    /// Parse and validate TOML text. Relative paths stay relative.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_toml_with_base(text, None)
    }

    /// Read a config file; relative ephemeris paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_with_base(&text, path.parent())
    }

    fn from_toml_with_base(text: &str, base: Option<&Path>) -> Result<Self, ConfigError> {
        let root: RootToml = toml::from_str(text)?;

        let mut scan = root.scan;
        scan.orbs = root.orbs;

        let ephemeris = match (root.ephemeris.kind, root.ephemeris.path) {
            (EphemerisKind::MeanMotion, _) => EphemerisSource::MeanMotion,
            (EphemerisKind::Chebyshev, Some(path)) => {
                let path = match base {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                };
                EphemerisSource::Chebyshev(path)
            }
            (EphemerisKind::Chebyshev, None) => {
                return Err("ephemeris.path is required for kind = \"chebyshev\"".into());
            }
        };

        let natal = root.natal.map(natal_setup).transpose()?;

        let config = Self {
            bodies: root.bodies.unwrap_or_else(|| ALL_BODIES.to_vec()),
            scan,
            relationships: root.relationships.unwrap_or_else(default_relationships),
            return_search: root.return_search,
            ephemeris,
            natal,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every section; the search crate re-validates at call time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()?;
        self.return_search.validate()?;
        validate_relationships(&self.relationships)?;
        if self.bodies.is_empty() {
            return Err("bodies must not be empty".into());
        }
        let mut seen = BTreeSet::new();
        if let Some(body) = self.bodies.iter().find(|b| !seen.insert(**b)) {
            return Err(ConfigError::Invalid(format!("body {body} listed twice")));
        }
        Ok(())
    }
}

fn natal_setup(raw: NatalToml) -> Result<NatalSetup, ConfigError> {
    for (name, value) in [("ascendant", raw.ascendant), ("midheaven", raw.midheaven)] {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("natal.{name} must be finite")));
        }
    }
    match (raw.birth, raw.points.is_empty()) {
        (Some(_), false) => Err("natal: give either birth or points, not both".into()),
        (None, true) => Err("natal: birth or points is required".into()),
        (Some(birth), true) => {
            birth.validate()?;
            Ok(NatalSetup::Birth {
                birth,
                ascendant_deg: raw.ascendant,
                midheaven_deg: raw.midheaven,
            })
        }
        (None, false) => {
            let mut chart = NatalChart::default();
            for (name, lon) in &raw.points {
                if !lon.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "natal point {name} must be finite"
                    )));
                }
                push_unique(&mut chart, name.parse::<ChartPoint>()?, *lon)?;
            }
            if let Some(asc) = raw.ascendant {
                push_unique(&mut chart, ChartPoint::Ascendant, asc)?;
            }
            if let Some(mc) = raw.midheaven {
                push_unique(&mut chart, ChartPoint::Midheaven, mc)?;
            }
            Ok(NatalSetup::Points(chart))
        }
    }
}

/// Keys that differ in spelling ("Sun", "sun") can name the same point.
fn push_unique(chart: &mut NatalChart, point: ChartPoint, lon: f64) -> Result<(), ConfigError> {
    if chart.get(point).is_some() {
        return Err(ConfigError::Invalid(format!("natal point {point} given twice")));
    }
    chart.push(point, lon);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let c = GocharaConfig::from_toml_str("").unwrap();
        assert_eq!(c, GocharaConfig::default());
        assert_eq!(c.relationships.len(), 7);
        assert_eq!(c.bodies.len(), 14);
    }

    #[test]
    fn scan_and_orbs_sections() {
        let c = GocharaConfig::from_toml_str(
            r#"
            [scan]
            step_days = 0.25
            orb_scale = 1.0
            [orbs]
            angle_factor = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(c.scan.step_days, 0.25);
        assert_eq!(c.scan.orb_scale, 1.0);
        assert_eq!(c.scan.refine_max_iterations, 30);
        assert_eq!(c.scan.orbs.angle_factor, 0.5);
        assert_eq!(c.scan.orbs.luminary_factor, 1.25);
    }

    #[test]
    fn relationships_replace_defaults_in_order() {
        let c = GocharaConfig::from_toml_str(
            r#"
            [[relationships]]
            name = "Square"
            angle = 90
            orb = 6
            [[relationships]]
            name = "Conjunction"
            angle = 0
            orb = 10
            "#,
        )
        .unwrap();
        assert_eq!(c.relationships.len(), 2);
        assert_eq!(c.relationships[0].name, "Square");
        assert_eq!(c.relationships[1].orb_deg, 10.0);
    }

    #[test]
    fn rejects_invalid_values() {
        for text in [
            "[scan]\nstep_days = 0",
            "[return_search]\nmax_iterations = 0",
            "[[relationships]]\nname = \"x\"\nangle = 200\norb = 1",
            "bodies = []",
            "[orbs]\nluminary_factor = -1",
        ] {
            assert!(
                matches!(GocharaConfig::from_toml_str(text), Err(ConfigError::Invalid(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn rejects_unknown_keys_and_bodies() {
        assert!(matches!(
            GocharaConfig::from_toml_str("colour = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GocharaConfig::from_toml_str("bodies = [\"Vulcan\"]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_misspelled_section_keys() {
        for text in [
            "[scan]\nstep_day = 0.1",
            "[orbs]\nluminary = 1.5",
            "[return_search]\nwindow = 3",
        ] {
            assert!(
                matches!(GocharaConfig::from_toml_str(text), Err(ConfigError::Parse(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn rejects_duplicate_bodies() {
        assert!(matches!(
            GocharaConfig::from_toml_str("bodies = [\"Sun\", \"Mars\", \"Sun\"]"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_duplicate_natal_points() {
        for text in [
            "[natal]\nascendant = 10.0\n[natal.points]\nAscendant = 20.0",
            "[natal]\nmidheaven = 10.0\n[natal.points]\nmc = 20.0",
            "[natal.points]\nSun = 10.0\nsun = 20.0",
            "[natal.points]\n\"True Node\" = 10.0\nnode = 20.0",
        ] {
            assert!(
                matches!(GocharaConfig::from_toml_str(text), Err(ConfigError::Invalid(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn chebyshev_requires_path() {
        assert!(GocharaConfig::from_toml_str("[ephemeris]\nkind = \"chebyshev\"").is_err());
        let c = GocharaConfig::from_toml_str(
            "[ephemeris]\nkind = \"chebyshev\"\npath = \"eph.json\"",
        )
        .unwrap();
        assert_eq!(c.ephemeris, EphemerisSource::Chebyshev(PathBuf::from("eph.json")));
    }

    #[test]
    fn relative_path_resolves_against_config_dir() {
        let c = GocharaConfig::from_toml_with_base(
            "[ephemeris]\nkind = \"chebyshev\"\npath = \"eph.json\"",
            Some(Path::new("/etc/gochara")),
        )
        .unwrap();
        assert_eq!(
            c.ephemeris,
            EphemerisSource::Chebyshev(PathBuf::from("/etc/gochara/eph.json"))
        );
    }

    #[test]
    fn natal_points() {
        let c = GocharaConfig::from_toml_str(
            r#"
            [natal]
            ascendant = 213.4
            [natal.points]
            Sun = 111.9
            "true node" = 300.0
            "#,
        )
        .unwrap();
        let Some(NatalSetup::Points(chart)) = &c.natal else {
            panic!("expected explicit points");
        };
        assert_eq!(chart.len(), 3);
        assert_eq!(chart.body_longitude(Body::TrueNode), Some(300.0));
        assert!(chart.get(ChartPoint::Ascendant).is_some());
        assert!(c.natal.as_ref().unwrap().birth().is_none());
    }

    #[test]
    fn natal_birth_builds_through_provider() {
        let c = GocharaConfig::from_toml_str(
            r#"
            bodies = ["Sun", "Moon"]
            [natal]
            birth = "2000-01-01T12:00:00Z"
            midheaven = 90.0
            "#,
        )
        .unwrap();
        let natal = c.natal.as_ref().unwrap();
        let provider = c.ephemeris.open().unwrap();
        let chart = natal.chart(provider.as_ref(), &c.bodies).unwrap();
        assert_eq!(chart.len(), 3);
        assert!((chart.body_longitude(Body::Sun).unwrap() - 280.46646).abs() < 1e-6);
        assert!(chart.get(ChartPoint::Ascendant).is_none());
    }

    #[test]
    fn natal_needs_exactly_one_source() {
        assert!(GocharaConfig::from_toml_str("[natal]\nascendant = 1.0").is_err());
        assert!(
            GocharaConfig::from_toml_str(
                "[natal]\nbirth = \"2000-01-01\"\n[natal.points]\nSun = 1.0"
            )
            .is_err()
        );
    }

    #[test]
    fn natal_rejects_bad_point_name() {
        let err = GocharaConfig::from_toml_str("[natal.points]\nVulcan = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Ephemeris(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GocharaConfig::load(Path::new("/nonexistent/gochara.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn shipped_example_parses() {
        let text = include_str!("../../../configs/gochara.toml");
        let c = GocharaConfig::from_toml_str(text).unwrap();
        assert!(c.natal.is_some());
        assert_eq!(c.ephemeris, EphemerisSource::MeanMotion);
    }
}
