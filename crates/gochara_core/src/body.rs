//! Body and chart-point identifiers.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EphemerisError;

/// Bodies a provider can be asked about.
///
/// `SouthNode` is derived from `TrueNode` (+180°) rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    TrueNode,
    SouthNode,
    Lilith,
}

/// Every body, in conventional chart order.
pub const ALL_BODIES: [Body; 14] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::Chiron,
    Body::TrueNode,
    Body::SouthNode,
    Body::Lilith,
];

impl Body {
    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::Chiron => "Chiron",
            Self::TrueNode => "True Node",
            Self::SouthNode => "South Node",
            Self::Lilith => "Lilith",
        }
    }

    /// Sun and Moon widen orbs.
    pub const fn is_luminary(self) -> bool {
        matches!(self, Self::Sun | Self::Moon)
    }

    /// Calculated points whose negative speed is not a retrograde station.
    pub const fn is_calculated_point(self) -> bool {
        matches!(self, Self::TrueNode | Self::SouthNode | Self::Lilith)
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    /// Case-insensitive; spaces, `-` and `_` are ignored (`"true_node"`,
    /// `"True Node"` and `"truenode"` all match).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        let body = match key.as_str() {
            "sun" => Self::Sun,
            "moon" => Self::Moon,
            "mercury" => Self::Mercury,
            "venus" => Self::Venus,
            "mars" => Self::Mars,
            "jupiter" => Self::Jupiter,
            "saturn" => Self::Saturn,
            "uranus" => Self::Uranus,
            "neptune" => Self::Neptune,
            "pluto" => Self::Pluto,
            "chiron" => Self::Chiron,
            "truenode" | "northnode" | "node" => Self::TrueNode,
            "southnode" => Self::SouthNode,
            "lilith" => Self::Lilith,
            _ => return Err(EphemerisError::Data(format!("unknown body: {s}"))),
        };
        Ok(body)
    }
}

impl From<Body> for String {
    fn from(b: Body) -> Self {
        b.name().to_string()
    }
}

impl TryFrom<String> for Body {
    type Error = EphemerisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A fixed point of a natal chart: a body's birth position or a chart angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChartPoint {
    Body(Body),
    Ascendant,
    Midheaven,
}

impl ChartPoint {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Body(b) => b.name(),
            Self::Ascendant => "Ascendant",
            Self::Midheaven => "Midheaven",
        }
    }

    pub const fn is_luminary(self) -> bool {
        match self {
            Self::Body(b) => b.is_luminary(),
            _ => false,
        }
    }

    /// Horizon/meridian points narrow orbs.
    pub const fn is_angle(self) -> bool {
        matches!(self, Self::Ascendant | Self::Midheaven)
    }

    /// The natal counterpart of a moving body.
    pub fn is_natal_of(self, body: Body) -> bool {
        self == Self::Body(body)
    }
}

impl Display for ChartPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartPoint {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascendant" | "asc" => Ok(Self::Ascendant),
            "midheaven" | "mc" => Ok(Self::Midheaven),
            _ => s.parse().map(Self::Body),
        }
    }
}

impl From<ChartPoint> for String {
    fn from(p: ChartPoint) -> Self {
        p.name().to_string()
    }
}

impl TryFrom<String> for ChartPoint {
    type Error = EphemerisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
