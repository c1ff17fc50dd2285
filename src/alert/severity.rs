//! Wind-speed severity classification.
//!
//! Maps a storm's maximum sustained wind (knots) to a Saffir-Simpson-
//! derived category with a fixed impact description. Classification is a
//! pure lookup: identical wind always yields identical output, and the
//! bands are contiguous and exhaustive over wind_kt >= 0.

// ---------------------------------------------------------------------------
// Category scale
// ---------------------------------------------------------------------------

/// One band of the severity scale.
pub struct StormCategory {
    /// Lower bound of the band, inclusive, in knots.
    pub min_wind_kt: u32,
    pub label: &'static str,
    /// Impact summary appended to the label in report output.
    pub description: &'static str,
}

impl StormCategory {
    /// The report's `category_description` text.
    pub fn text(&self) -> String {
        format!("{} – {}", self.label, self.description)
    }
}

/// Severity bands in descending threshold order. `classify` walks this
/// top-down and returns the first band the wind reaches, so the entries
/// must stay sorted by `min_wind_kt` descending with a 0-knot floor.
pub static CATEGORY_SCALE: &[StormCategory] = &[
    StormCategory {
        min_wind_kt: 137,
        label: "Category 5 of 5: Devastating",
        description: "Most buildings destroyed, area uninhabitable.",
    },
    StormCategory {
        min_wind_kt: 113,
        label: "Category 4 of 5: Very Strong",
        description: "Long power/water outages, major destruction.",
    },
    StormCategory {
        min_wind_kt: 96,
        label: "Category 3 of 5: Strong",
        description: "Widespread damage, long outages.",
    },
    StormCategory {
        min_wind_kt: 83,
        label: "Category 2 of 5: Moderate",
        description: "Large trees uprooted, major roof damage.",
    },
    StormCategory {
        min_wind_kt: 64,
        label: "Category 1 of 5: Weak",
        description: "Roof and tree damage, power outages likely.",
    },
    StormCategory {
        min_wind_kt: 34,
        label: "Tropical Storm",
        description: "Strong wind, high seas, possible flooding.",
    },
    StormCategory {
        min_wind_kt: 0,
        label: "Tropical Depression",
        description: "Localized heavy rain and gusty squalls.",
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Returns the severity band for a maximum sustained wind in knots.
pub fn classify(max_wind_kt: u32) -> &'static StormCategory {
    CATEGORY_SCALE
        .iter()
        .find(|band| max_wind_kt >= band.min_wind_kt)
        .expect("CATEGORY_SCALE has a 0-knot floor band")
}

/// Rank of the band a wind speed falls in: 0 for Tropical Depression up
/// to 6 for Category 5. Stronger wind never ranks lower.
pub fn band_rank(wind_kt: u32) -> usize {
    let position = CATEGORY_SCALE
        .iter()
        .position(|band| wind_kt >= band.min_wind_kt)
        .expect("CATEGORY_SCALE has a 0-knot floor band");
    CATEGORY_SCALE.len() - 1 - position
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_sorted_descending_with_zero_floor() {
        for pair in CATEGORY_SCALE.windows(2) {
            assert!(
                pair[0].min_wind_kt > pair[1].min_wind_kt,
                "scale must be strictly descending: {} then {}",
                pair[0].min_wind_kt,
                pair[1].min_wind_kt
            );
        }
        assert_eq!(
            CATEGORY_SCALE.last().unwrap().min_wind_kt,
            0,
            "scale must cover every wind speed down to 0 kt"
        );
    }

    #[test]
    fn test_band_boundaries() {
        // Each boundary from the Saffir-Simpson-derived table: the last
        // knot of one band and the first knot of the next.
        assert_eq!(classify(0).label, "Tropical Depression");
        assert_eq!(classify(33).label, "Tropical Depression");
        assert_eq!(classify(34).label, "Tropical Storm");
        assert_eq!(classify(63).label, "Tropical Storm");
        assert_eq!(classify(64).label, "Category 1 of 5: Weak");
        assert_eq!(classify(82).label, "Category 1 of 5: Weak");
        assert_eq!(classify(83).label, "Category 2 of 5: Moderate");
        assert_eq!(classify(95).label, "Category 2 of 5: Moderate");
        assert_eq!(classify(96).label, "Category 3 of 5: Strong");
        assert_eq!(classify(112).label, "Category 3 of 5: Strong");
        assert_eq!(classify(113).label, "Category 4 of 5: Very Strong");
        assert_eq!(classify(136).label, "Category 4 of 5: Very Strong");
        assert_eq!(classify(137).label, "Category 5 of 5: Devastating");
        assert_eq!(classify(180).label, "Category 5 of 5: Devastating");
    }

    #[test]
    fn test_classification_is_monotonic() {
        // Stronger wind must never map to a lower band.
        let mut previous_rank = 0;
        for wind_kt in 0..=200 {
            let rank = band_rank(wind_kt);
            assert!(
                rank >= previous_rank,
                "band rank dropped from {} to {} at {} kt",
                previous_rank,
                rank,
                wind_kt
            );
            previous_rank = rank;
        }
    }

    #[test]
    fn test_category_text_appends_impact_description() {
        let text = classify(80).text();
        assert_eq!(
            text,
            "Category 1 of 5: Weak – Roof and tree damage, power outages likely."
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        for wind_kt in [0, 34, 80, 137] {
            assert_eq!(classify(wind_kt).label, classify(wind_kt).label);
            assert_eq!(classify(wind_kt).text(), classify(wind_kt).text());
        }
    }
}
