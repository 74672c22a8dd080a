//! Wire DTOs for the artworks API.
//!
//! These mirror the JSON payload of `GET /artworks?page=..&limit=..` and are
//! converted into domain records at the boundary.

use gallery_core::record::{Page, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Fields requested from the API, matching [`ArtworkDto`].
pub const ARTWORK_FIELDS: &str =
    "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";

/// Paginated list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkListResponse {
    pub pagination: PaginationDto,
    #[serde(default)]
    pub data: Vec<ArtworkDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDto {
    pub total: usize,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub current_page: Option<usize>,
}

/// One artwork as served by the API. Everything but the id may be null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i32>,
    #[serde(default)]
    pub date_end: Option<i32>,
}

impl From<ArtworkDto> for Record {
    fn from(dto: ArtworkDto) -> Self {
        Record {
            id: RecordId(dto.id),
            title: dto.title,
            place_of_origin: dto.place_of_origin,
            artist_display: dto.artist_display,
            inscriptions: dto.inscriptions,
            date_start: dto.date_start,
            date_end: dto.date_end,
        }
    }
}

impl ArtworkListResponse {
    /// Converts the response into the domain page fetched for `index`.
    pub fn into_page(self, index: usize) -> Page {
        let records = self.data.into_iter().map(Record::from).collect();
        Page::new(index, records, self.pagination.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pagination": {"total": 129884, "limit": 2, "offset": 0, "total_pages": 64942, "current_page": 1},
        "data": [
            {
                "id": 129884,
                "title": "Starry Night and the Astronauts",
                "place_of_origin": "United States",
                "artist_display": "Alma Thomas\nAmerican, 1891-1978",
                "inscriptions": null,
                "date_start": 1972,
                "date_end": 1972
            },
            {
                "id": 16568,
                "title": "Water Lilies",
                "place_of_origin": "France",
                "artist_display": "Claude Monet\nFrench, 1840-1926",
                "date_start": 1906,
                "date_end": 1906
            }
        ],
        "info": {"license_text": "..."}
    }"#;

    #[test]
    fn test_decode_sample_response() {
        let response: ArtworkListResponse = serde_json::from_str(SAMPLE).unwrap();
        let page = response.into_page(0);

        assert_eq!(page.total, 129884);
        assert_eq!(page.len(), 2);
        assert_eq!(page.records[0].id, RecordId(129884));
        assert_eq!(page.records[0].inscriptions, None);
        assert_eq!(page.records[1].display_title(), "Water Lilies");
        assert_eq!(page.records[1].inscriptions, None);
    }

    #[test]
    fn test_missing_pagination_is_rejected() {
        let result = serde_json::from_str::<ArtworkListResponse>(r#"{"data": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_data_is_empty_page() {
        let response: ArtworkListResponse =
            serde_json::from_str(r#"{"pagination": {"total": 0}}"#).unwrap();
        assert!(response.into_page(3).is_empty());
    }
}
