//! Offline archive: cached facts served when no provider credential is set.
//!
//! Entity lookups are total: exact display name, then the per-kind generic
//! entry, then a universal default. Phenomenon lookups (free-text search)
//! are case-insensitive on the trimmed query and may miss.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fact::Fact;
use crate::kinds::CosmicKind;

/// Search topics that have archive entries, in display order.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "Boötes Void",
    "Encke Gap",
    "Magnetar",
    "Oort Cloud",
    "Diamond Planet",
    "Pillars of Creation",
];

/// Errors loading a user-supplied archive document.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("invalid archive JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("archive entry '{0}' is missing a title, body or fun fact")]
    Incomplete(String),
}

/// JSON shape of an archive document. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveDocument {
    /// Facts keyed by exact entity display name.
    pub entities: HashMap<String, Fact>,
    /// Generic facts keyed by kind tag (`STAR`, `BLACK_HOLE`, ...).
    pub kinds: HashMap<CosmicKind, Fact>,
    /// Facts keyed by phenomenon name; matched case-insensitively.
    pub phenomena: HashMap<String, Fact>,
    pub universal: Option<Fact>,
}

/// In-memory offline fact tables.
#[derive(Debug, Clone)]
pub struct OfflineArchive {
    by_name: HashMap<String, Fact>,
    by_kind: HashMap<CosmicKind, Fact>,
    phenomena: HashMap<String, Fact>,
    universal: Fact,
}

impl Default for OfflineArchive {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OfflineArchive {
    /// The archive shipped with the explorer: every pool name, a generic
    /// entry per kind, and the suggested search topics.
    pub fn builtin() -> Self {
        let by_name = ENTITY_FACTS
            .iter()
            .map(|&(name, title, body, fun)| (name.to_string(), Fact::new(title, body, fun)))
            .collect();

        let by_kind = CosmicKind::ALL
            .into_iter()
            .map(|kind| (kind, kind_fact(kind)))
            .collect();

        let phenomena = PHENOMENA
            .iter()
            .map(|&(key, title, body, fun)| (normalize_query(key), Fact::new(title, body, fun)))
            .collect();

        Self {
            by_name,
            by_kind,
            phenomena,
            universal: kind_fact(CosmicKind::Star),
        }
    }

    /// Parse a JSON archive document and layer it over the built-in archive.
    pub fn builtin_with_json(json: &str) -> Result<Self, ArchiveError> {
        let doc: ArchiveDocument = serde_json::from_str(json)?;
        let mut archive = Self::builtin();
        archive.merge(doc)?;
        Ok(archive)
    }

    /// Layer a document over this archive; later entries win.
    pub fn merge(&mut self, doc: ArchiveDocument) -> Result<(), ArchiveError> {
        let check = |key: &str, fact: &Fact| {
            if fact.is_complete() {
                Ok(())
            } else {
                Err(ArchiveError::Incomplete(key.to_string()))
            }
        };

        for (name, fact) in &doc.entities {
            check(name, fact)?;
        }
        for (kind, fact) in &doc.kinds {
            check(kind.tag(), fact)?;
        }
        for (key, fact) in &doc.phenomena {
            check(key, fact)?;
        }
        if let Some(fact) = &doc.universal {
            check("universal", fact)?;
        }

        let added = doc.entities.len() + doc.kinds.len() + doc.phenomena.len();
        self.by_name.extend(doc.entities);
        self.by_kind.extend(doc.kinds);
        self.phenomena.extend(
            doc.phenomena
                .into_iter()
                .map(|(key, fact)| (normalize_query(&key), fact)),
        );
        if let Some(universal) = doc.universal {
            self.universal = universal;
        }
        log::debug!("Merged {} archive entries", added);
        Ok(())
    }

    /// Offline fact for an entity. Always returns a fact.
    ///
    /// An exact name hit is returned as stored. Otherwise the kind's generic
    /// entry (or the universal default) is returned retitled to `name`.
    pub fn entity_fact(&self, kind: CosmicKind, name: &str) -> Fact {
        if let Some(fact) = self.by_name.get(name) {
            log::debug!("Archive hit for '{}'", name);
            return fact.clone();
        }
        log::debug!("Archive miss for '{}', using {} fallback", name, kind);
        let fallback = self.by_kind.get(&kind).unwrap_or(&self.universal);
        fallback.clone().with_title(format!("{} (Simulation)", name))
    }

    /// Archived phenomenon matching `query`, ignoring case and surrounding space.
    pub fn phenomenon(&self, query: &str) -> Option<Fact> {
        self.phenomena.get(&normalize_query(query)).cloned()
    }

    /// Fact shown for a search that has neither a credential nor an archive hit.
    pub fn unconfigured_fact(&self, query: &str) -> Fact {
        Fact::new(
            "Offline Mode",
            format!(
                "You searched for \"{}\". The ship's long-range sensors (AI) are offline. \
                 Try clicking one of the suggested topics (like 'Boötes Void') to access \
                 cached data, or configure your API Key to enable full search.",
                query
            ),
            "The universe is waiting for you to connect.",
        )
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn entity_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn phenomenon_count(&self) -> usize {
        self.phenomena.len()
    }
}

/// Lookup key for free-text queries.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn kind_fact(kind: CosmicKind) -> Fact {
    let (title, body, fun) = match kind {
        CosmicKind::Star => STAR_GENERIC,
        CosmicKind::Planet => PLANET_GENERIC,
        CosmicKind::Nebula => NEBULA_GENERIC,
        CosmicKind::Anomaly => ANOMALY_GENERIC,
        CosmicKind::BlackHole => BLACK_HOLE_GENERIC,
    };
    Fact::new(title, body, fun)
}

// ── Built-in data ───────────────────────────────────────────────────────

type Entry = (&'static str, &'static str, &'static str);
type KeyedEntry = (&'static str, &'static str, &'static str, &'static str);

const STAR_GENERIC: Entry = (
    "Distant Star (Database)",
    "A massive, luminous sphere of plasma held together by its own gravity. The ship's sensors are currently relying on pre-cached data rather than live spectral analysis.",
    "The light you see from some stars left them before civilizations existed on Earth.",
);

const PLANET_GENERIC: Entry = (
    "Exoplanet (Database)",
    "A rocky or gaseous world orbiting a distant star. Without the live AI uplink, detailed atmospheric composition analysis is unavailable.",
    "There are likely more planets in the universe than grains of sand on all of Earth's beaches.",
);

const NEBULA_GENERIC: Entry = (
    "Nebula Cloud (Database)",
    "A vast cloud of dust and gas. These are often stellar nurseries. In simulation mode, we display a generalized structure rather than specific chemical composition.",
    "Nebulae come in many shapes, leading to names like 'Horsehead', 'Crab', and 'Eye of God'.",
);

const BLACK_HOLE_GENERIC: Entry = (
    "Singularity (Database)",
    "A region of spacetime where gravity is so strong that nothing can escape. The ship's computer is simulating the event horizon visuals based on general relativity models.",
    "If you fell into a black hole, you would be stretched out like spaghetti in a process called 'spaghettification'.",
);

const ANOMALY_GENERIC: Entry = (
    "Unidentified Anomaly",
    "The ship's sensors are picking up a high-energy signature in this sector. Due to limited uplink connectivity, the exact nature of this phenomenon, whether a wormhole or spatial rift, cannot be determined.",
    "Dark matter makes up about 27% of the universe, yet it remains invisible to direct detection.",
);

static ENTITY_FACTS: &[KeyedEntry] = &[
    // Stars
    ("Distant Star", STAR_GENERIC.0, STAR_GENERIC.1, STAR_GENERIC.2),
    (
        "Betelgeuse",
        "Betelgeuse (Database)",
        "A red supergiant star in the constellation Orion, one of the largest stars visible to the naked eye. It's so massive that if placed at the center of our solar system, its surface would extend past the orbit of Mars.",
        "Betelgeuse is expected to explode as a supernova within the next 100,000 years, which astronomically speaking is any moment now.",
    ),
    (
        "Sirius",
        "Sirius (Database)",
        "The brightest star in Earth's night sky, located in the constellation Canis Major. It's actually a binary star system, with Sirius B being a faint white dwarf companion.",
        "Ancient Egyptians based their calendar on Sirius: its rising marked the annual flooding of the Nile.",
    ),
    (
        "Proxima Centauri",
        "Proxima Centauri (Database)",
        "The closest known star to the Sun at just 4.24 light-years away. It's a small, dim red dwarf that hosts at least one confirmed exoplanet in its habitable zone.",
        "Even at the speed of our fastest spacecraft, it would take over 73,000 years to reach Proxima Centauri.",
    ),
    (
        "Vega",
        "Vega (Database)",
        "A bright blue-white star in the constellation Lyra, only 25 light-years from Earth. It was the first star other than the Sun to be photographed and have its spectrum recorded.",
        "In about 12,000 years, Vega will become Earth's North Star due to axial precession.",
    ),
    (
        "Polaris",
        "Polaris (Database)",
        "The current North Star, located nearly in line with Earth's rotational axis. It's actually a triple star system, with Polaris A being a yellow supergiant.",
        "Polaris is about 2,500 times brighter than our Sun but appears dim because it's 433 light-years away.",
    ),
    (
        "Rigel",
        "Rigel (Database)",
        "A blue supergiant star in the constellation Orion, the seventh-brightest star in the night sky. It shines with the luminosity of approximately 120,000 Suns.",
        "Despite being much farther away than Betelgeuse, Rigel appears almost as bright because it's intrinsically far more luminous.",
    ),
    (
        "Aldebaran",
        "Aldebaran (Database)",
        "An orange giant star that forms the 'eye' of the constellation Taurus. It has exhausted its hydrogen fuel and expanded to about 44 times the Sun's diameter.",
        "The Pioneer 10 spacecraft is heading in Aldebaran's direction and will pass by in about 2 million years.",
    ),
    (
        "Antares",
        "Antares (Database)",
        "A red supergiant star and the brightest object in the constellation Scorpius. Its name means 'rival of Mars' because its reddish color resembles the planet.",
        "Antares is so large that if it replaced the Sun, its surface would extend beyond the orbit of Mars.",
    ),
    (
        "Canopus",
        "Canopus (Database)",
        "The second-brightest star in the night sky, a bright giant in the constellation Carina. It's used as a navigation reference point for many spacecraft.",
        "Canopus is about 10,000 times more luminous than the Sun and lies 310 light-years from Earth.",
    ),
    // Planets
    ("Exoplanet", PLANET_GENERIC.0, PLANET_GENERIC.1, PLANET_GENERIC.2),
    (
        "Kepler-22b",
        "Kepler-22b (Database)",
        "The first exoplanet confirmed by NASA's Kepler mission to orbit within the habitable zone of a Sun-like star. It's about 2.4 times Earth's radius and could potentially have liquid water.",
        "Kepler-22b is 600 light-years away, meaning the light we see from it left during the Middle Ages.",
    ),
    (
        "TRAPPIST-1e",
        "TRAPPIST-1e (Database)",
        "One of seven Earth-sized planets orbiting the ultracool dwarf star TRAPPIST-1. It's the most likely candidate in the system to harbor liquid water on its surface.",
        "The TRAPPIST-1 planets are so close together that standing on one, you could see the others as clearly as we see the Moon.",
    ),
    (
        "Gliese 581g",
        "Gliese 581g (Database)",
        "A controversial exoplanet candidate orbiting in the habitable zone of red dwarf star Gliese 581. If it exists, it would be one of the most Earth-like planets discovered.",
        "Gliese 581g is tidally locked, meaning one side always faces its star in eternal day while the other is in permanent night.",
    ),
    (
        "HD 209458 b",
        "HD 209458 b - Osiris (Database)",
        "The first exoplanet observed transiting its parent star and the first to have its atmosphere detected. Nicknamed 'Osiris,' this hot Jupiter is being slowly stripped of its atmosphere.",
        "HD 209458 b has a tail of evaporating atmosphere trailing behind it, like a comet made of a planet.",
    ),
    (
        "Proxima Centauri b",
        "Proxima Centauri b (Database)",
        "An Earth-sized exoplanet orbiting in the habitable zone of Proxima Centauri, the closest star to the Sun. It receives about 70% of the light Earth gets from the Sun.",
        "This is the closest known exoplanet to Earth, and it's a prime target for future interstellar exploration missions.",
    ),
    (
        "Kepler-452b",
        "Kepler-452b (Database)",
        "Often called 'Earth's Cousin,' this super-Earth orbits a Sun-like star at a similar distance as Earth orbits the Sun. It's about 60% larger than Earth and could have active volcanoes.",
        "Kepler-452b has been in its star's habitable zone for 6 billion years, longer than Earth has existed.",
    ),
    (
        "WASP-121b",
        "WASP-121b (Database)",
        "An ultra-hot Jupiter that's being stretched into a football shape by its star's gravity. Its upper atmosphere reaches temperatures hot enough to vaporize iron and titanium.",
        "WASP-121b has glowing water vapor in its atmosphere and may rain liquid gems made of iron and corundum.",
    ),
    // Nebulae
    ("Nebula Cloud", NEBULA_GENERIC.0, NEBULA_GENERIC.1, NEBULA_GENERIC.2),
    (
        "Crab Nebula",
        "Crab Nebula (Database)",
        "The remnant of a supernova explosion observed by Chinese astronomers in 1054 AD. At its center lies a pulsar spinning 30 times per second, shooting out jets of particles.",
        "The supernova that created the Crab Nebula was bright enough to be visible during the day for 23 days.",
    ),
    (
        "Orion Nebula",
        "Orion Nebula (Database)",
        "The closest large star-forming region to Earth, visible to the naked eye as a fuzzy patch in Orion's sword. It contains hundreds of young stars being born right now.",
        "The Orion Nebula is only about 2 million years old, a cosmic infant, and contains enough gas to create 2,000 more Suns.",
    ),
    (
        "Helix Nebula",
        "Helix Nebula (Database)",
        "A planetary nebula nicknamed the 'Eye of God' due to its striking appearance. It's one of the closest planetary nebulae to Earth at about 700 light-years away.",
        "The Helix Nebula was created when a dying Sun-like star shed its outer layers, previewing our own Sun's fate in 5 billion years.",
    ),
    (
        "Ring Nebula",
        "Ring Nebula (Database)",
        "A famous planetary nebula in the constellation Lyra, appearing as a colorful ring surrounding a dying white dwarf star. It's about one light-year in diameter.",
        "The Ring Nebula's distinctive shape is actually a barrel we happen to view from one end, not a true ring.",
    ),
    (
        "Horsehead Nebula",
        "Horsehead Nebula (Database)",
        "A dark nebula in Orion shaped remarkably like a horse's head, silhouetted against a glowing emission nebula. It's about 1,500 light-years from Earth.",
        "The Horsehead Nebula will be eroded away by ultraviolet radiation from nearby stars in about 5 million years.",
    ),
    // Black holes
    ("Singularity", BLACK_HOLE_GENERIC.0, BLACK_HOLE_GENERIC.1, BLACK_HOLE_GENERIC.2),
    (
        "Sagittarius A*",
        "Sagittarius A* (Database)",
        "The supermassive black hole at the center of our Milky Way galaxy, with a mass of about 4 million Suns. It was directly imaged by the Event Horizon Telescope in 2022.",
        "Despite its enormous mass, Sagittarius A* is quiet compared to other supermassive black holes because it's currently on a 'starvation diet.'",
    ),
    (
        "M87*",
        "M87* (Database)",
        "The supermassive black hole at the center of galaxy Messier 87, famous for being the first black hole ever directly imaged in 2019. It has a mass of 6.5 billion Suns.",
        "M87* shoots out a jet of plasma traveling at nearly the speed of light that extends for 5,000 light-years.",
    ),
    (
        "Cygnus X-1",
        "Cygnus X-1 (Database)",
        "One of the first widely accepted black hole candidates, orbiting a blue supergiant star in a binary system. It's actively pulling material from its companion star.",
        "Stephen Hawking famously bet against Cygnus X-1 being a black hole in 1974, and happily lost that bet.",
    ),
    (
        "V404 Cygni",
        "V404 Cygni (Database)",
        "A black hole binary system that produces dramatic X-ray outbursts. In 2015, it underwent its first outburst in 26 years, becoming one of the brightest X-ray sources in the sky.",
        "V404 Cygni's black hole wobbles like a spinning top, causing its jets to spray in different directions over hours.",
    ),
    // Anomalies
    ("Cosmic Anomaly", ANOMALY_GENERIC.0, ANOMALY_GENERIC.1, ANOMALY_GENERIC.2),
    (
        "Tabby's Star",
        "Tabby's Star - KIC 8462852 (Database)",
        "A star exhibiting irregular, unprecedented dimming that baffled astronomers. Various explanations have been proposed, from a swarm of comets to, controversially, alien megastructures.",
        "Tabby's Star once dimmed by 22% over just a few days, far more than any planet transit could explain.",
    ),
    (
        "Fast Radio Burst",
        "Fast Radio Burst (Database)",
        "Mysterious millisecond-long bursts of radio waves from deep space. Their origins remain one of the biggest mysteries in modern astrophysics, though magnetars are suspected.",
        "A single fast radio burst releases as much energy in a millisecond as the Sun produces in 80 years.",
    ),
    (
        "Gamma-Ray Burst",
        "Gamma-Ray Burst (Database)",
        "The most energetic explosions in the universe, typically associated with the collapse of massive stars or neutron star mergers. They can outshine entire galaxies for brief moments.",
        "A gamma-ray burst pointed at Earth from within our galaxy could cause a mass extinction event.",
    ),
    (
        "Oumuamua",
        "'Oumuamua (Database)",
        "The first known interstellar object detected passing through our solar system in 2017. Its unusual cigar shape and acceleration away from the Sun sparked wild speculation.",
        "'Oumuamua means 'scout' in Hawaiian, and some scientists genuinely considered whether it might be an alien probe.",
    ),
];

static PHENOMENA: &[KeyedEntry] = &[
    (
        "Boötes Void",
        "BOÖTES VOID (OFFLINE ARCHIVE)",
        "One of the largest known voids in the universe, often referred to as 'The Great Nothing'. Spanning approximately 330 million light-years in diameter, it contains very few galaxies. If our galaxy were in the center of the Boötes Void, we wouldn't have known other galaxies existed until the 1960s.",
        "It is estimated that if the void were a typical region of space, it should contain thousands of galaxies, but only about 60 have been found.",
    ),
    (
        "Encke Gap",
        "ENCKE GAP (OFFLINE ARCHIVE)",
        "A 325-kilometer-wide gap within the A Ring of Saturn. It is kept open by the presence of a small moonlet named Pan, which orbits within the gap and acts as a shepherd moon, clearing particles from its path.",
        "The moon Pan creates wake patterns in the ring particles that look like ripples.",
    ),
    (
        "Magnetar",
        "MAGNETAR (OFFLINE ARCHIVE)",
        "A type of neutron star with an extraordinarily powerful magnetic field, about a quadrillion times stronger than Earth's. They are the most magnetic objects known in the universe, capable of erasing credit cards from halfway across the solar system.",
        "A magnetar's magnetic field is so intense that it would be lethal from 1,000 kilometers away, distorting the electron clouds in your atoms.",
    ),
    (
        "Oort Cloud",
        "OORT CLOUD (OFFLINE ARCHIVE)",
        "A theoretical spherical shell of icy objects that is believed to surround the Sun at a distance of up to 100,000 AU. It is thought to be the origin of long-period comets.",
        "No spacecraft has yet reached the Oort Cloud; Voyager 1 will take about 300 years to reach the inner edge.",
    ),
    (
        "Diamond Planet",
        "55 CANCRI E (OFFLINE ARCHIVE)",
        "An exoplanet that is twice the size of Earth but eight times its mass. Due to its pressure and carbon-rich composition, scientists believe a significant portion of its mass could be pure diamond.",
        "This 'diamond super-Earth' is so hot that its surface is likely covered in lava.",
    ),
    (
        "Pillars of Creation",
        "PILLARS OF CREATION (OFFLINE ARCHIVE)",
        "Elephant trunks of interstellar gas and dust in the Eagle Nebula. They are in the process of creating new stars, while simultaneously being eroded by the light from nearby massive stars.",
        "They were actually destroyed by a supernova 6000 years ago, but the light of the destruction won't reach Earth for another millennium.",
    ),
];
