//! Built-in talent profiles served when no store is configured or reachable.

use std::sync::OnceLock;

use serde_json::Map;

use crate::models::{Aesthetic, Talent};

const SEEDED_AT: &str = "2025-03-21T21:49:43.000Z";

static FALLBACK: OnceLock<Vec<Talent>> = OnceLock::new();

/// The fixed dataset. Built once, never mutated.
pub fn fallback_talents() -> &'static [Talent] {
    FALLBACK.get_or_init(build)
}

fn build() -> Vec<Talent> {
    vec![
        sample(
            "maya-chen",
            "Maya Chen",
            "Vibrant and playful with high-energy colors, bold contrasts, and dynamic \
             animations for an engaging digital experience.",
            &["vibrant", "playful", "energetic", "bold", "expressive", "engaging"],
        ),
        sample(
            "olivia-gray",
            "Olivia Gray",
            "Modern and refined with subtle contrasts, cooler tones, and slightly faster \
             animations for a contemporary digital experience.",
            &["modern", "refined", "cool", "subtle", "sophisticated", "contemporary"],
        ),
    ]
}

fn sample(id: &str, name: &str, aesthetic: &str, keywords: &[&str]) -> Talent {
    Talent {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("Profile for {name}"),
        kind: "designer".to_string(),
        aesthetic: Aesthetic {
            description: aesthetic.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        },
        title: None,
        summary: None,
        photo: None,
        design_system: None,
        created_at: SEEDED_AT.to_string(),
        updated_at: SEEDED_AT.to_string(),
        extra: Map::new(),
    }
}

/// Looks up a fallback profile by id.
pub fn find_fallback(id: &str) -> Option<&'static Talent> {
    fallback_talents().iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_has_two_designers() {
        let talents = fallback_talents();
        assert_eq!(talents.len(), 2);
        assert!(talents.iter().all(|t| t.kind == "designer"));
    }

    #[test]
    fn test_ids_are_unique() {
        let talents = fallback_talents();
        let mut ids: Vec<_> = talents.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), talents.len());
    }

    #[test]
    fn test_find_fallback() {
        assert_eq!(find_fallback("olivia-gray").unwrap().name, "Olivia Gray");
        assert!(find_fallback("ghost").is_none());
    }

    #[test]
    fn test_aesthetic_text_is_single_spaced() {
        let maya = find_fallback("maya-chen").unwrap();
        assert!(maya.aesthetic.description.contains("bold contrasts, and dynamic animations"));
    }
}
