use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const BASE_PATH: &str = "/AdresseWS/adresse";

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adresse {
    pub adressenavn: String,
    pub husnr: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bokstav: String,
    pub postnr: String,
    pub poststed: String,
    pub kommunenr: String,
    pub kommunenavn: String,
    pub nord: f64,
    pub aust: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SokStatus {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melding: Option<String>,
}

/// Response envelope as the real service sends it: `adresser` is left out
/// when there are no hits, and failures carry no hit count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "sokStatus")]
    pub sok_status: SokStatus,
    #[serde(
        rename = "totaltAntallTreff",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub totalt_antall_treff: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adresser: Vec<Adresse>,
}

impl Envelope {
    fn hits(all: Vec<Adresse>, page: Page) -> Self {
        let total = all.len();
        let adresser = all
            .into_iter()
            .skip(page.side.saturating_mul(page.ant_per_side))
            .take(page.ant_per_side)
            .collect();
        Envelope {
            sok_status: SokStatus {
                ok: true,
                melding: None,
            },
            totalt_antall_treff: Some(total),
            adresser,
        }
    }

    fn failed(melding: impl Into<String>) -> Self {
        Envelope {
            sok_status: SokStatus {
                ok: false,
                melding: Some(melding.into()),
            },
            totalt_antall_treff: None,
            adresser: Vec::new(),
        }
    }
}

pub type Db = Arc<Vec<Adresse>>;

type Params = HashMap<String, String>;

#[derive(Clone, Copy)]
struct Page {
    side: usize,
    ant_per_side: usize,
}

/// Router over the built-in fixture addresses.
pub fn app() -> Router {
    app_with(fixtures())
}

pub fn app_with(addresses: Vec<Adresse>) -> Router {
    let db: Db = Arc::new(addresses);
    let routes = Router::new()
        .route("/sok", get(sok))
        .route("/radius", get(radius))
        .with_state(db);
    Router::new().nest(BASE_PATH, routes)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn sok(State(db): State<Db>, Query(params): Query<Params>) -> Json<Envelope> {
    debug!(?params, "sok");
    Json(search_text(&db, &params).unwrap_or_else(Envelope::failed))
}

/// Bounding-box search when all four corners are given, radius search
/// otherwise.
async fn radius(State(db): State<Db>, Query(params): Query<Params>) -> Json<Envelope> {
    debug!(?params, "radius");
    let is_box = ["nordLL", "austLL", "nordUR", "austUR"]
        .iter()
        .all(|k| params.contains_key(*k));
    let result = if is_box {
        search_box(&db, &params)
    } else {
        search_radius(&db, &params)
    };
    Json(result.unwrap_or_else(Envelope::failed))
}

fn search_text(db: &[Adresse], params: &Params) -> Result<Envelope, String> {
    let needle = params
        .get("sokestreng")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "sokestreng mangler".to_string())?;
    let page = page(params)?;

    let hits = db
        .iter()
        .filter(|a| {
            let gate = format!("{} {}{}", a.adressenavn, a.husnr, a.bokstav).to_lowercase();
            gate.contains(&needle)
                || a.poststed.to_lowercase().contains(&needle)
                || a.kommunenavn.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Ok(Envelope::hits(hits, page))
}

fn search_radius(db: &[Adresse], params: &Params) -> Result<Envelope, String> {
    let nord = number(params, "nord")?;
    let aust = number(params, "aust")?;
    let radius = number(params, "radius")?;
    if radius < 0.0 {
        return Err("radius kan ikke være negativ".to_string());
    }
    let page = page(params)?;

    let hits = db
        .iter()
        .filter(|a| distance_m(nord, aust, a.nord, a.aust) <= radius)
        .cloned()
        .collect();
    Ok(Envelope::hits(hits, page))
}

fn search_box(db: &[Adresse], params: &Params) -> Result<Envelope, String> {
    let nord_ll = number(params, "nordLL")?;
    let aust_ll = number(params, "austLL")?;
    let nord_ur = number(params, "nordUR")?;
    let aust_ur = number(params, "austUR")?;
    if nord_ll > nord_ur || aust_ll > aust_ur {
        return Err("ugyldig område: nedre hjørne må ligge sørvest for øvre".to_string());
    }
    let page = page(params)?;

    let hits = db
        .iter()
        .filter(|a| (nord_ll..=nord_ur).contains(&a.nord) && (aust_ll..=aust_ur).contains(&a.aust))
        .cloned()
        .collect();
    Ok(Envelope::hits(hits, page))
}

fn number(params: &Params, key: &str) -> Result<f64, String> {
    let raw = params.get(key).ok_or_else(|| format!("{key} mangler"))?;
    raw.parse()
        .map_err(|_| format!("{key} er ikke et tall: {raw}"))
}

fn page(params: &Params) -> Result<Page, String> {
    let int = |key: &str, default: usize| -> Result<usize, String> {
        match params.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("{key} er ikke et heltall: {raw}")),
        }
    };
    Ok(Page {
        side: int("side", 0)?,
        ant_per_side: int("antPerSide", 10)?,
    })
}

/// Equirectangular approximation, good enough at city scale.
fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let mean_lat = ((lat1 + lat2) / 2.0).to_radians();
    let x = (lon2 - lon1).to_radians() * mean_lat.cos();
    let y = (lat2 - lat1).to_radians();
    EARTH_RADIUS_M * (x * x + y * y).sqrt()
}

fn adresse(
    adressenavn: &str,
    husnr: u32,
    bokstav: &str,
    postnr: &str,
    poststed: &str,
    kommune: (&str, &str),
    nord: f64,
    aust: f64,
) -> Adresse {
    Adresse {
        adressenavn: adressenavn.to_string(),
        husnr,
        bokstav: bokstav.to_string(),
        postnr: postnr.to_string(),
        poststed: poststed.to_string(),
        kommunenr: kommune.0.to_string(),
        kommunenavn: kommune.1.to_string(),
        nord,
        aust,
    }
}

/// A handful of real-looking addresses in Oslo, Bergen and Trondheim.
pub fn fixtures() -> Vec<Adresse> {
    let oslo = ("0301", "OSLO");
    let bergen = ("4601", "BERGEN");
    let trondheim = ("5001", "TRONDHEIM");
    vec![
        adresse("Karl Johans gate", 1, "", "0154", "OSLO", oslo, 59.91084, 10.75099),
        adresse("Karl Johans gate", 22, "", "0159", "OSLO", oslo, 59.91255, 10.74180),
        adresse("Storgata", 1, "", "0155", "OSLO", oslo, 59.91299, 10.75179),
        adresse("Storgata", 3, "B", "0155", "OSLO", oslo, 59.91317, 10.75225),
        adresse("Bryggen", 1, "", "5003", "BERGEN", bergen, 60.39747, 5.32414),
        adresse("Torgallmenningen", 8, "", "5014", "BERGEN", bergen, 60.39299, 5.32415),
        adresse("Munkegata", 1, "", "7013", "TRONDHEIM", trondheim, 63.43049, 10.39506),
        adresse("Storgata", 10, "", "7011", "TRONDHEIM", trondheim, 63.43221, 10.40212),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_envelope_omits_adresser() {
        let env = Envelope::hits(Vec::new(), Page { side: 0, ant_per_side: 10 });
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["sokStatus"]["ok"], true);
        assert_eq!(json["totaltAntallTreff"], 0);
        assert!(json.get("adresser").is_none());
    }

    #[test]
    fn failed_envelope_has_message_and_no_count() {
        let json = serde_json::to_value(Envelope::failed("bad query")).unwrap();
        assert_eq!(json["sokStatus"]["ok"], false);
        assert_eq!(json["sokStatus"]["melding"], "bad query");
        assert!(json.get("totaltAntallTreff").is_none());
    }

    #[test]
    fn text_search_matches_street_and_city_case_insensitively() {
        let db = fixtures();
        let env = search_text(&db, &params(&[("sokestreng", "storgata")])).unwrap();
        assert_eq!(env.totalt_antall_treff, Some(3));

        let env = search_text(&db, &params(&[("sokestreng", "bergen")])).unwrap();
        assert_eq!(env.totalt_antall_treff, Some(2));
    }

    #[test]
    fn text_search_requires_sokestreng() {
        let err = search_text(&fixtures(), &params(&[("sokestreng", "  ")])).unwrap_err();
        assert!(err.contains("sokestreng"));
    }

    #[test]
    fn pagination_slices_but_keeps_total() {
        let db = fixtures();
        let env = search_text(
            &db,
            &params(&[("sokestreng", "storgata"), ("side", "1"), ("antPerSide", "2")]),
        )
        .unwrap();
        assert_eq!(env.totalt_antall_treff, Some(3));
        assert_eq!(env.adresser.len(), 1);
    }

    #[test]
    fn radius_search_uses_metres() {
        let db = fixtures();
        let env = search_radius(
            &db,
            &params(&[("nord", "59.91299"), ("aust", "10.75179"), ("radius", "50")]),
        )
        .unwrap();
        // Storgata 1 and 3B are ~30 m apart.
        assert_eq!(env.totalt_antall_treff, Some(2));
    }

    #[test]
    fn radius_search_rejects_non_numbers() {
        let err = search_radius(
            &fixtures(),
            &params(&[("nord", "north"), ("aust", "10"), ("radius", "1")]),
        )
        .unwrap_err();
        assert!(err.contains("nord"));
    }

    #[test]
    fn box_search_rejects_inverted_corners() {
        let err = search_box(
            &fixtures(),
            &params(&[
                ("nordLL", "60"),
                ("austLL", "5"),
                ("nordUR", "59"),
                ("austUR", "6"),
            ]),
        )
        .unwrap_err();
        assert!(err.contains("ugyldig"));
    }

    #[test]
    fn distance_is_zero_for_same_point() {
        assert_eq!(distance_m(59.9, 10.7, 59.9, 10.7), 0.0);
    }
}
