//! Example collection written on first run.

use super::wine::{WineRecord, WineType};

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    producer: &str,
    region: &str,
    year: i32,
    wine_type: WineType,
    rating: f64,
    notes: &str,
    grapes: &[&str],
) -> WineRecord {
    WineRecord {
        id: id.to_string(),
        name: name.to_string(),
        producer: Some(producer.to_string()),
        region: region.to_string(),
        year,
        wine_type,
        rating,
        image: None,
        notes: Some(notes.to_string()),
        grapes: Some(grapes.iter().map(|g| (*g).to_string()).collect()),
    }
}

/// The default seed set.
pub fn sample_wines() -> Vec<WineRecord> {
    vec![
        sample(
            "1",
            "Barolo Cannubi",
            "Marchesi di Barolo",
            "Piemonte",
            2018,
            WineType::Red,
            9.5,
            "Elegant and powerful, with rose, cherry and liquorice. Silky tannins and a long finish.",
            &["Nebbiolo"],
        ),
        sample(
            "2",
            "Amarone della Valpolicella",
            "Allegrini",
            "Veneto",
            2015,
            WineType::Red,
            9.0,
            "Rich and layered, with dried fruit, spice and chocolate. Imposing structure.",
            &["Corvina", "Rondinella", "Molinara"],
        ),
        sample(
            "3",
            "Brunello di Montalcino",
            "Biondi-Santi",
            "Toscana",
            2016,
            WineType::Red,
            9.3,
            "Refined and balanced, with cherry, violet and tobacco. Built to age.",
            &["Sangiovese"],
        ),
        sample(
            "4",
            "Gavi di Gavi",
            "La Scolca",
            "Piemonte",
            2021,
            WineType::White,
            8.5,
            "Fresh and mineral, with white peach, white flowers and almond. Bright acidity.",
            &["Cortese"],
        ),
        sample(
            "5",
            "Franciacorta Satèn",
            "Ca' del Bosco",
            "Lombardia",
            2019,
            WineType::Sparkling,
            8.8,
            "Creamy and delicate, with citrus, toasted bread and white flowers. Very fine bubbles.",
            &["Chardonnay"],
        ),
    ]
}
