//! Encounter condition vocabulary.

use std::fmt;

/// A condition under which an encounter slot is active.
///
/// The variant order is the canonical output order: time of day, then
/// weather, then terrain. Rendered condition lists always follow
/// [`Condition::ALL`], never the column order of a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Morning,
    Day,
    Evening,
    Night,
    Clear,
    Cloudy,
    HarshSunlight,
    Blizzard,
    Land,
    WaterSurface,
    Underwater,
    Overland,
    Sky,
}

impl Condition {
    /// Every condition, in canonical order.
    pub const ALL: &'static [Condition] = &[
        Condition::Morning,
        Condition::Day,
        Condition::Evening,
        Condition::Night,
        Condition::Clear,
        Condition::Cloudy,
        Condition::HarshSunlight,
        Condition::Blizzard,
        Condition::Land,
        Condition::WaterSurface,
        Condition::Underwater,
        Condition::Overland,
        Condition::Sky,
    ];

    /// The label shown in the payload and on the site's condition chips.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Morning => "Time Morning",
            Condition::Day => "Time Day",
            Condition::Evening => "Time Evening",
            Condition::Night => "Time Night",
            Condition::Clear => "Weather Clear",
            Condition::Cloudy => "Weather Cloudy",
            Condition::HarshSunlight => "Weather Harsh Sunlight",
            Condition::Blizzard => "Weather Blizzard",
            Condition::Land => "Terrain Land",
            Condition::WaterSurface => "Terrain Water Surface",
            Condition::Underwater => "Terrain Underwater",
            Condition::Overland => "Terrain Overland",
            Condition::Sky => "Terrain Sky",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
