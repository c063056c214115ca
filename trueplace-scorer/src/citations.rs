//! Provenance of the metric categories the scorers consume.

use trueplace_core::Citation;

const CITATIONS: [Citation; 3] = [
    Citation {
        metric: "Crime Statistics",
        source: "FBI Crime Data Explorer",
        url: "https://cde.ucr.cjis.gov/",
    },
    Citation {
        metric: "Demographics & Housing",
        source: "U.S. Census Bureau ACS",
        url: "https://data.census.gov/",
    },
    Citation {
        metric: "Health Indicators",
        source: "CDC PLACES",
        url: "https://www.cdc.gov/places/",
    },
];

/// Return the fixed, ordered citation list: crime, census, then health.
///
/// The list never varies per location.
///
/// # Examples
/// ```
/// use trueplace_scorer::get_citations;
///
/// let citations = get_citations();
/// assert_eq!(citations.len(), 3);
/// assert_eq!(citations[0].source, "FBI Crime Data Explorer");
/// ```
#[must_use]
pub const fn get_citations() -> &'static [Citation] {
    &CITATIONS
}
