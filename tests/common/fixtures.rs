use serde_json::{Value, json};

pub fn captains() -> Value {
    json!([
        { "name": "James T. Kirk", "series": ["The original series"], "century": 23 },
        { "name": "Jean-Luc Picard", "series": ["The next generation"], "century": 24 },
        { "name": "Benjamin Sisko", "series": ["The next generation", "Deep Space 9"], "century": 24 },
        { "name": "Kathryn Janeway", "series": ["The next generation", "Voyager"], "century": 24 },
        { "name": "Jonathan Archer", "series": ["Entreprise"], "century": 22 },
        { "codename": "Emergency Command Hologram", "surname": "The Doctor", "series": ["Voyager"], "century": 24 },
        { "name": "Samantha Carter", "series": [], "century": 21 }
    ])
}

pub fn movies() -> Value {
    json!([
        { "id": "I", "name": "The Motion Picture", "captain": "James T. Kirk" },
        { "id": "II", "name": "The Wrath of Kahn", "captain": "James T. Kirk" },
        { "id": "III", "name": "The Search for Spock", "captain": "James T. Kirk" },
        { "id": "IV", "name": "The Voyage Home", "captain": "James T. Kirk" },
        { "id": "V", "name": "The Final Frontier", "captain": "James T. Kirk" },
        { "id": "VI", "name": "The Undiscovered Country", "captain": "James T. Kirk" },
        { "id": "VII", "name": "Generations", "captain": ["James T. Kirk", "Jean-Luc Picard"] },
        { "id": "VIII", "name": "First Contact", "captain": "Jean-Luc Picard" },
        { "id": "IX", "name": "Insurrection", "captain": "Jean-Luc Picard" },
        { "id": "X", "name": "Nemesis", "captain": "Jean-Luc Picard" },
        { "id": "XI", "name": "Star Trek", "captain": "Spock" },
        { "id": "XII", "name": "Star Trek Into Darkness", "captain": "Spock" }
    ])
}

/// A captain record by its position in the fixture.
pub fn captain(index: usize) -> Value {
    captains()[index].clone()
}

/// Kirk's six solo films followed by Picard's three, as join output rows.
pub fn solo_film_pairs() -> Vec<Value> {
    let kirk = [
        "The Motion Picture",
        "The Wrath of Kahn",
        "The Search for Spock",
        "The Voyage Home",
        "The Final Frontier",
        "The Undiscovered Country",
    ];
    let picard = ["First Contact", "Insurrection", "Nemesis"];
    kirk.iter()
        .map(|movie| json!({ "captain": "James T. Kirk", "movie": movie }))
        .chain(
            picard
                .iter()
                .map(|movie| json!({ "captain": "Jean-Luc Picard", "movie": movie })),
        )
        .collect()
}
