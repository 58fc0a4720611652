//! Types for the sky snapshot: zodiac signs, retrogrades and lunar metrics.

use std::fmt::{Display, Formatter};

use gochara_core::{Body, normalize_360};
use serde::{Deserialize, Serialize};

/// Tropical zodiac sign (30° each, starting at 0° Aries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All twelve signs in zodiacal order.
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index (Aries = 0).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign containing an ecliptic longitude (any real value; normalized first).
    pub fn from_longitude(longitude_deg: f64) -> Self {
        let idx = (normalize_360(longitude_deg) / 30.0).floor() as usize;
        ALL_SIGNS[idx.min(11)]
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A longitude expressed as sign plus degrees/minutes/seconds within it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPosition {
    pub sign: Sign,
    /// Position within the sign, [0, 30).
    pub degrees_in_sign: f64,
    pub degree: u32,
    pub minute: u32,
    /// Rounded, capped at 59.
    pub second: u32,
}

impl Display for SignPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}°{:02}'{:02}\" {}",
            self.degree, self.minute, self.second, self.sign
        )
    }
}

/// A body moving backward in longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrogradeBody {
    pub body: Body,
    pub sign: Sign,
    pub speed_deg_per_day: f64,
}

/// Eight-fold Moon phase from the Sun-Moon elongation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    /// Phase for an elongation (Moon − Sun). Each phase spans 45°, centred on
    /// multiples of 45°, so New Moon covers [337.5, 360) ∪ [0, 22.5).
    pub fn from_elongation(elongation_deg: f64) -> Self {
        const PHASES: [MoonPhase; 8] = [
            MoonPhase::NewMoon,
            MoonPhase::WaxingCrescent,
            MoonPhase::FirstQuarter,
            MoonPhase::WaxingGibbous,
            MoonPhase::FullMoon,
            MoonPhase::WaningGibbous,
            MoonPhase::LastQuarter,
            MoonPhase::WaningCrescent,
        ];
        let idx = ((normalize_360(elongation_deg) + 22.5) / 45.0).floor() as usize % 8;
        PHASES[idx]
    }

    pub fn is_new_or_full(self) -> bool {
        matches!(self, Self::NewMoon | Self::FullMoon)
    }
}

impl Display for MoonPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Moon metrics at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarMetrics {
    pub moon_sign: Sign,
    pub phase: MoonPhase,
    /// Moon − Sun longitude, [0, 360).
    pub elongation_deg: f64,
    /// Illuminated fraction in percent, one decimal.
    pub illumination_pct: f64,
    /// Days since new moon on a 29.53-day cycle, one decimal.
    pub age_days: f64,
    /// 1-based day of the lunar cycle, at most 30.
    pub moon_day: u32,
    pub within_perigee: bool,
    pub within_apogee: bool,
    pub is_supermoon: bool,
}

/// Everything the sky snapshot reports for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkySnapshot {
    pub jd_tdb: f64,
    pub retrogrades: Vec<RetrogradeBody>,
    pub lunar: LunarMetrics,
}
