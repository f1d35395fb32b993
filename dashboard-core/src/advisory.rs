//! Rule-based advisories derived from a [`WeatherSnapshot`].
//!
//! Each advisory field is an ordered decision list: the first rule whose guard
//! holds supplies the text, otherwise the list's fallback does. Condition
//! checks are case-insensitive substring matches on the provider's free text.

use crate::model::{Advisory, WeatherSnapshot};

#[derive(Debug, Clone, Copy)]
enum Check {
    TempBelow(f64),
    TempAbove(f64),
    /// Inclusive on both ends.
    TempWithin(f64, f64),
    HumidityAbove(u8),
    /// Needle must be lower-case.
    ConditionContains(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Guard {
    All(&'static [Check]),
    Any(&'static [Check]),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    guard: Guard,
    text: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct DecisionList {
    rules: &'static [Rule],
    fallback: &'static str,
}

/// The parts of a snapshot the rules look at, with the condition normalized once.
struct Reading {
    temp_c: f64,
    humidity_pct: u8,
    condition: String,
}

const HEALTH: DecisionList = DecisionList {
    rules: &[
        Rule {
            guard: Guard::All(&[Check::TempBelow(14.0)]),
            text: "Cold weather: Stay warm and hydrated.",
        },
        Rule {
            guard: Guard::All(&[Check::TempAbove(32.0)]),
            text: "Hot day: Drink water and avoid direct sun.",
        },
        Rule {
            guard: Guard::All(&[Check::HumidityAbove(80)]),
            text: "Humid: Wear light clothes and stay cool.",
        },
    ],
    fallback: "Normal weather: Enjoy your day safely!",
};

const TRAVEL: DecisionList = DecisionList {
    rules: &[
        Rule {
            guard: Guard::All(&[Check::ConditionContains("rain")]),
            text: "Rainy: Avoid unnecessary travel.",
        },
        Rule {
            guard: Guard::All(&[Check::ConditionContains("clear")]),
            text: "Clear skies – safe to commute.",
        },
    ],
    fallback: "Moderate weather – travel generally safe.",
};

const ACTIVITY: DecisionList = DecisionList {
    rules: &[
        Rule {
            guard: Guard::All(&[Check::TempWithin(18.0, 27.0), Check::ConditionContains("clear")]),
            text: "Perfect for outdoor activities!",
        },
        Rule {
            guard: Guard::Any(&[Check::TempAbove(35.0), Check::ConditionContains("storm")]),
            text: "Too hot/stormy? Stay indoors and relax.",
        },
        Rule {
            guard: Guard::All(&[Check::ConditionContains("rain")]),
            text: "Rainy: Indoor activities recommended.",
        },
    ],
    fallback: "Good weather for outdoor fun!",
};

impl Check {
    fn holds(&self, reading: &Reading) -> bool {
        match *self {
            Check::TempBelow(limit) => reading.temp_c < limit,
            Check::TempAbove(limit) => reading.temp_c > limit,
            Check::TempWithin(lo, hi) => (lo..=hi).contains(&reading.temp_c),
            Check::HumidityAbove(limit) => reading.humidity_pct > limit,
            Check::ConditionContains(needle) => reading.condition.contains(needle),
        }
    }
}

impl Guard {
    fn holds(&self, reading: &Reading) -> bool {
        match self {
            Guard::All(checks) => checks.iter().all(|c| c.holds(reading)),
            Guard::Any(checks) => checks.iter().any(|c| c.holds(reading)),
        }
    }
}

impl DecisionList {
    fn select(&self, reading: &Reading) -> &'static str {
        self.rules
            .iter()
            .find(|rule| rule.guard.holds(reading))
            .map_or(self.fallback, |rule| rule.text)
    }
}

/// Derive the health, travel and activity advisory for a snapshot. Never fails.
pub fn derive(snapshot: &WeatherSnapshot) -> Advisory {
    let reading = Reading {
        temp_c: snapshot.temp_c,
        humidity_pct: snapshot.humidity_pct,
        condition: snapshot.condition.to_lowercase(),
    };

    Advisory {
        health_tip: HEALTH.select(&reading).to_string(),
        travel_alert: TRAVEL.select(&reading).to_string(),
        activity_rec: ACTIVITY.select(&reading).to_string(),
    }
}
