//! Canonical taxonomic rank levels.
//!
//! Rank levels are floats; larger is coarser. Multiples of 10 are the major
//! Linnaean ranks (70 kingdom down to 10 species), with intermediate levels
//! for the finer-grained ranks some taxonomies carry.

/// Rank level to rank name, coarsest first.
const RANK_LEVELS: &[(f32, &str)] = &[
    (100.0, "stateofmatter"),
    (70.0, "kingdom"),
    (67.0, "subkingdom"),
    (60.0, "phylum"),
    (57.0, "subphylum"),
    (53.0, "superclass"),
    (50.0, "class"),
    (47.0, "subclass"),
    (45.0, "infraclass"),
    (43.0, "superorder"),
    (40.0, "order"),
    (37.0, "suborder"),
    (35.0, "infraorder"),
    (34.5, "parvorder"),
    (34.0, "zoosection"),
    (33.5, "zoosubsection"),
    (33.0, "superfamily"),
    (32.0, "epifamily"),
    (30.0, "family"),
    (27.0, "subfamily"),
    (26.0, "supertribe"),
    (25.0, "tribe"),
    (24.0, "subtribe"),
    (20.0, "genus"),
    (15.0, "subgenus"),
    (13.0, "section"),
    (12.0, "subsection"),
    (10.0, "species"),
    (5.0, "subspecies"),
];

/// Name of a canonical rank level, `None` for levels outside the table.
pub fn rank_name(level: f32) -> Option<&'static str> {
    RANK_LEVELS
        .iter()
        .find(|(rank_level, _)| *rank_level == level)
        .map(|(_, name)| *name)
}
