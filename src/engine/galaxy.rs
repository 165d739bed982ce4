pub const WORDS_PER_PLANET: usize = 5;

#[derive(Debug)]
pub struct PlanetDefinition {
    pub name: &'static str,
    pub words_required: usize,
    /// Position on the map in percent of the drawing area.
    pub x: u16,
    pub y: u16,
}

pub const PLANETS: &[PlanetDefinition] = &[
    PlanetDefinition { name: "Terra Nova", words_required: 5, x: 15, y: 70 },
    PlanetDefinition { name: "Lexicon Prime", words_required: 10, x: 30, y: 45 },
    PlanetDefinition { name: "Syntax Nebula", words_required: 15, x: 50, y: 60 },
    PlanetDefinition { name: "Grammar Station", words_required: 20, x: 65, y: 35 },
    PlanetDefinition { name: "Fluency Core", words_required: 25, x: 85, y: 55 },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanetStatus {
    Locked,
    Unlocked,
    Completed,
}

#[derive(Clone, Copy, Debug)]
pub struct Planet {
    pub definition: &'static PlanetDefinition,
    pub status: PlanetStatus,
}

/// Planet states for a learned-word count. A planet unlocks once the
/// previous one is completed.
pub fn chart(learned_words: usize) -> Vec<Planet> {
    PLANETS
        .iter()
        .enumerate()
        .map(|(i, definition)| {
            let unlocked = i == 0 || learned_words >= PLANETS[i - 1].words_required;
            let status = if learned_words >= definition.words_required {
                PlanetStatus::Completed
            } else if unlocked {
                PlanetStatus::Unlocked
            } else {
                PlanetStatus::Locked
            };
            Planet { definition, status }
        })
        .collect()
}

/// Index of the planet the rocket is parked at.
pub fn rocket_position(learned_words: usize) -> usize {
    (learned_words / WORDS_PER_PLANET).min(PLANETS.len() - 1)
}

pub fn goal() -> usize {
    PLANETS.last().map(|p| p.words_required).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(learned: usize) -> Vec<PlanetStatus> {
        chart(learned).into_iter().map(|p| p.status).collect()
    }

    #[test]
    fn first_planet_is_always_open() {
        use PlanetStatus::*;
        assert_eq!(statuses(0), vec![Unlocked, Locked, Locked, Locked, Locked]);
    }

    #[test]
    fn completing_a_planet_unlocks_the_next() {
        use PlanetStatus::*;
        assert_eq!(statuses(5), vec![Completed, Unlocked, Locked, Locked, Locked]);
        assert_eq!(statuses(12), vec![Completed, Completed, Unlocked, Locked, Locked]);
        assert_eq!(statuses(25), vec![Completed; 5]);
    }

    #[test]
    fn rocket_stops_at_last_planet() {
        assert_eq!(rocket_position(0), 0);
        assert_eq!(rocket_position(9), 1);
        assert_eq!(rocket_position(24), 4);
        assert_eq!(rocket_position(400), 4);
        assert_eq!(goal(), 25);
    }
}
