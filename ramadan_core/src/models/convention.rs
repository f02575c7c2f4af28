//! Calculation conventions: the named parameter sets that govern twilight
//! angles, the Asr shadow rule and high-latitude behaviour.

use std::fmt;
use std::str::FromStr;

use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::core::error::{PrayerError, PrayerResult};
use crate::time::TimeRounding;

/// Jurisprudential rule for the Asr shadow length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsrJuristic {
    /// Shadow equals object height (Shafi'i, Maliki, Hanbali).
    #[default]
    Standard,
    /// Shadow equals twice the object height.
    Hanafi,
}

impl AsrJuristic {
    pub fn shadow_factor(&self) -> f64 {
        match self {
            AsrJuristic::Standard => 1.0,
            AsrJuristic::Hanafi => 2.0,
        }
    }
}

impl FromStr for AsrJuristic {
    type Err = PrayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "shafi" | "shafii" | "1" => Ok(AsrJuristic::Standard),
            "hanafi" | "2" => Ok(AsrJuristic::Hanafi),
            other => Err(PrayerError::InvalidConvention(format!(
                "unknown asr rule '{}'. Use 'standard' or 'hanafi'",
                other
            ))),
        }
    }
}

/// How Isha is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IshaRule {
    /// Sun at this many degrees below the horizon after sunset.
    Angle(Degrees),
    /// A fixed number of minutes after Maghrib.
    MinutesAfterMaghrib(f64),
}

/// How Maghrib is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaghribRule {
    /// Maghrib at sunset.
    Sunset,
    /// Sun at this many degrees below the horizon (Shia conventions).
    Angle(Degrees),
}

/// Policy for twilight angles the Sun does not reach near the poles.
///
/// The fallback portion is measured against the night, from sunset to the
/// next sunrise. Fajr is never earlier than `sunrise - portion` and Isha
/// never later than `sunset + portion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLatitudeRule {
    /// Portion is half the night.
    #[default]
    MiddleOfNight,
    /// Portion is one seventh of the night.
    SeventhOfNight,
    /// Portion is `angle / 60` of the night.
    TwilightAngle,
    /// No fallback: an unreachable angle is an error.
    Strict,
}

impl HighLatitudeRule {
    /// Fraction of the night used as the fallback portion for `angle`.
    pub fn night_fraction(&self, angle: Degrees) -> Option<f64> {
        match self {
            HighLatitudeRule::MiddleOfNight => Some(0.5),
            HighLatitudeRule::SeventhOfNight => Some(1.0 / 7.0),
            HighLatitudeRule::TwilightAngle => Some(angle.value() / 60.0),
            HighLatitudeRule::Strict => None,
        }
    }
}

impl FromStr for HighLatitudeRule {
    type Err = PrayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "middleofnight" | "nightmiddle" | "middle" => Ok(HighLatitudeRule::MiddleOfNight),
            "seventhofnight" | "oneseventh" | "seventh" => Ok(HighLatitudeRule::SeventhOfNight),
            "twilightangle" | "anglebased" | "angle" => Ok(HighLatitudeRule::TwilightAngle),
            "strict" | "none" => Ok(HighLatitudeRule::Strict),
            _ => Err(PrayerError::InvalidConvention(format!(
                "unknown high latitude rule '{}'",
                s
            ))),
        }
    }
}

/// Minute offsets added to each computed instant before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerAdjustments {
    pub fajr: f64,
    pub sunrise: f64,
    pub dhuhr: f64,
    pub asr: f64,
    pub maghrib: f64,
    pub isha: f64,
}

impl PrayerAdjustments {
    fn all(&self) -> [f64; 6] {
        [self.fajr, self.sunrise, self.dhuhr, self.asr, self.maghrib, self.isha]
    }
}

/// Named conventions published by Islamic authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConventionPreset {
    MuslimWorldLeague,
    NorthAmerica,
    Egyptian,
    UmmAlQura,
    Karachi,
    Tehran,
    Jafari,
    Dubai,
    Kuwait,
    Qatar,
    Singapore,
    Turkey,
}

impl ConventionPreset {
    pub const ALL: [ConventionPreset; 12] = [
        ConventionPreset::MuslimWorldLeague,
        ConventionPreset::NorthAmerica,
        ConventionPreset::Egyptian,
        ConventionPreset::UmmAlQura,
        ConventionPreset::Karachi,
        ConventionPreset::Tehran,
        ConventionPreset::Jafari,
        ConventionPreset::Dubai,
        ConventionPreset::Kuwait,
        ConventionPreset::Qatar,
        ConventionPreset::Singapore,
        ConventionPreset::Turkey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConventionPreset::MuslimWorldLeague => "Muslim World League",
            ConventionPreset::NorthAmerica => "Islamic Society of North America",
            ConventionPreset::Egyptian => "Egyptian General Authority of Survey",
            ConventionPreset::UmmAlQura => "Umm al-Qura University, Makkah",
            ConventionPreset::Karachi => "University of Islamic Sciences, Karachi",
            ConventionPreset::Tehran => "Institute of Geophysics, University of Tehran",
            ConventionPreset::Jafari => "Shia Ithna Ashari, Leva Institute, Qum",
            ConventionPreset::Dubai => "Dubai",
            ConventionPreset::Kuwait => "Kuwait",
            ConventionPreset::Qatar => "Qatar",
            ConventionPreset::Singapore => "Majlis Ugama Islam Singapura",
            ConventionPreset::Turkey => "Diyanet Isleri Baskanligi, Turkey",
        }
    }

    /// (fajr angle, isha rule, maghrib rule)
    fn parameters(&self) -> (f64, IshaRule, MaghribRule) {
        let angle = |a: f64| IshaRule::Angle(Degrees::new(a));
        match self {
            ConventionPreset::MuslimWorldLeague => (18.0, angle(17.0), MaghribRule::Sunset),
            ConventionPreset::NorthAmerica => (15.0, angle(15.0), MaghribRule::Sunset),
            ConventionPreset::Egyptian => (19.5, angle(17.5), MaghribRule::Sunset),
            ConventionPreset::UmmAlQura => {
                (18.5, IshaRule::MinutesAfterMaghrib(90.0), MaghribRule::Sunset)
            }
            ConventionPreset::Karachi => (18.0, angle(18.0), MaghribRule::Sunset),
            ConventionPreset::Tehran => {
                (17.7, angle(14.0), MaghribRule::Angle(Degrees::new(4.5)))
            }
            ConventionPreset::Jafari => (16.0, angle(14.0), MaghribRule::Angle(Degrees::new(4.0))),
            ConventionPreset::Dubai => (18.2, angle(18.2), MaghribRule::Sunset),
            ConventionPreset::Kuwait => (18.0, angle(17.5), MaghribRule::Sunset),
            ConventionPreset::Qatar => (18.0, IshaRule::MinutesAfterMaghrib(90.0), MaghribRule::Sunset),
            ConventionPreset::Singapore => (20.0, angle(18.0), MaghribRule::Sunset),
            ConventionPreset::Turkey => (18.0, angle(17.0), MaghribRule::Sunset),
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for ConventionPreset {
    type Err = PrayerError;

    /// Parses a preset by short code or full name, ignoring case, spaces,
    /// dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        let preset = match key.as_str() {
            "mwl" | "muslimworldleague" => ConventionPreset::MuslimWorldLeague,
            "isna" | "northamerica" => ConventionPreset::NorthAmerica,
            "egypt" | "egyptian" => ConventionPreset::Egyptian,
            "makkah" | "ummalqura" => ConventionPreset::UmmAlQura,
            "karachi" => ConventionPreset::Karachi,
            "tehran" => ConventionPreset::Tehran,
            "jafari" | "shia" => ConventionPreset::Jafari,
            "dubai" => ConventionPreset::Dubai,
            "kuwait" => ConventionPreset::Kuwait,
            "qatar" => ConventionPreset::Qatar,
            "singapore" => ConventionPreset::Singapore,
            "turkey" | "diyanet" => ConventionPreset::Turkey,
            _ => {
                return ConventionPreset::ALL
                    .iter()
                    .copied()
                    .find(|p| normalize_key(p.name()) == key)
                    .ok_or_else(|| {
                        PrayerError::InvalidConvention(format!("unknown convention '{}'", s))
                    })
            }
        };
        Ok(preset)
    }
}

impl fmt::Display for ConventionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete parameter set for the solar time engine.
///
/// Construct from a [`ConventionPreset`] and refine with the `with_*`
/// methods. Call [`CalculationConvention::validate`] once before use; the
/// engine does this on construction.
///
/// # Examples
///
/// ```
/// use ramadan_core::models::{AsrJuristic, CalculationConvention, ConventionPreset};
///
/// let convention = CalculationConvention::from_preset(ConventionPreset::MuslimWorldLeague)
///     .with_asr(AsrJuristic::Hanafi);
/// assert!(convention.validate().is_ok());
/// assert_eq!(convention.asr.shadow_factor(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationConvention {
    pub name: String,
    pub fajr_angle: Degrees,
    pub isha: IshaRule,
    pub maghrib: MaghribRule,
    pub asr: AsrJuristic,
    pub high_latitude_rule: HighLatitudeRule,
    pub adjustments: PrayerAdjustments,
    pub rounding: TimeRounding,
}

impl CalculationConvention {
    pub fn from_preset(preset: ConventionPreset) -> Self {
        let (fajr, isha, maghrib) = preset.parameters();
        Self {
            name: preset.name().to_string(),
            fajr_angle: Degrees::new(fajr),
            isha,
            maghrib,
            asr: AsrJuristic::default(),
            high_latitude_rule: HighLatitudeRule::default(),
            adjustments: PrayerAdjustments::default(),
            rounding: TimeRounding::default(),
        }
    }

    /// A custom convention with explicit angles.
    pub fn custom(name: impl Into<String>, fajr_angle: f64, isha: IshaRule) -> Self {
        Self {
            name: name.into(),
            fajr_angle: Degrees::new(fajr_angle),
            isha,
            maghrib: MaghribRule::Sunset,
            asr: AsrJuristic::default(),
            high_latitude_rule: HighLatitudeRule::default(),
            adjustments: PrayerAdjustments::default(),
            rounding: TimeRounding::default(),
        }
    }

    pub fn with_asr(mut self, asr: AsrJuristic) -> Self {
        self.asr = asr;
        self
    }

    pub fn with_high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = rule;
        self
    }

    pub fn with_adjustments(mut self, adjustments: PrayerAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_rounding(mut self, rounding: TimeRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Isha depression angle, when Isha is angle-based.
    pub fn isha_angle(&self) -> Option<Degrees> {
        match self.isha {
            IshaRule::Angle(angle) => Some(angle),
            IshaRule::MinutesAfterMaghrib(_) => None,
        }
    }

    /// Checks the parameter set for contradictions.
    ///
    /// # Returns
    /// * `Ok(())` if the convention can be used
    /// * `Err(PrayerError::InvalidConvention)` naming the first bad field
    pub fn validate(&self) -> PrayerResult<()> {
        check_depression("fajr angle", self.fajr_angle)?;

        match self.isha {
            IshaRule::Angle(angle) => check_depression("isha angle", angle)?,
            IshaRule::MinutesAfterMaghrib(minutes) => {
                if !minutes.is_finite() || minutes <= 0.0 || minutes >= 24.0 * 60.0 {
                    return Err(PrayerError::InvalidConvention(format!(
                        "isha minutes after maghrib must be in (0, 1440), got {}",
                        minutes
                    )));
                }
            }
        }

        if let MaghribRule::Angle(angle) = self.maghrib {
            check_depression("maghrib angle", angle)?;
            if let IshaRule::Angle(isha) = self.isha {
                if isha <= angle {
                    return Err(PrayerError::InvalidConvention(format!(
                        "isha angle {} must be deeper than maghrib angle {}",
                        isha.value(),
                        angle.value()
                    )));
                }
            }
        }

        if let Some(bad) = self.adjustments.all().iter().find(|m| !m.is_finite()) {
            return Err(PrayerError::InvalidConvention(format!(
                "minute adjustment {} is not finite",
                bad
            )));
        }

        Ok(())
    }
}

impl Default for CalculationConvention {
    fn default() -> Self {
        Self::from_preset(ConventionPreset::MuslimWorldLeague)
    }
}

fn check_depression(field: &str, angle: Degrees) -> PrayerResult<()> {
    let value = angle.value();
    if !value.is_finite() || value <= 0.0 || value >= 90.0 {
        return Err(PrayerError::InvalidConvention(format!(
            "{} must be in (0, 90) degrees below the horizon, got {}",
            field, value
        )));
    }
    Ok(())
}
