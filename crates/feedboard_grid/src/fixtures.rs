// Shared test data

use feedboard_types::{DietEntry, Feed, Horse};

pub const BOARD: &str = "barn-1";

/// Apollo, Bella, Charlie with Oats (rank 3), Hay (rank 2), Vitamins (rank 1)
pub struct Barn {
    pub horses: Vec<Horse>,
    pub feeds: Vec<Feed>,
    pub diet: Vec<DietEntry>,
}

pub fn barn() -> Barn {
    Barn {
        horses: vec![
            Horse::new("apollo", BOARD, "Apollo"),
            Horse::new("bella", BOARD, "Bella"),
            Horse::new("charlie", BOARD, "Charlie"),
        ],
        feeds: vec![
            Feed::new("oats", BOARD, "Oats", 3).with_unit("weight", "lb"),
            Feed::new("hay", BOARD, "Hay", 2).with_unit("count", "flake"),
            Feed::new("vitamins", BOARD, "Vitamins", 1).with_unit("volume", "scoop"),
        ],
        diet: vec![
            DietEntry::new("apollo", "oats").am(2.0),
            DietEntry::new("bella", "hay").pm(1.0),
            DietEntry::new("charlie", "oats").am(1.0).pm(1.0),
            DietEntry::new("charlie", "vitamins").am(0.5).pm(0.5),
        ],
    }
}

/// One horse eating ten feeds in the morning
pub fn one_horse_ten_feeds() -> Barn {
    let feeds: Vec<Feed> = (0..10)
        .map(|i| Feed::new(format!("feed-{i}"), BOARD, format!("Feed {i}"), i))
        .collect();
    let diet = feeds
        .iter()
        .map(|f| DietEntry::new("solo", f.id.clone()).am(1.0))
        .collect();

    Barn {
        horses: vec![Horse::new("solo", BOARD, "Solo")],
        feeds,
        diet,
    }
}

pub fn names(entities: &[feedboard_types::AxisEntity]) -> Vec<&str> {
    entities.iter().map(|e| e.name()).collect()
}
