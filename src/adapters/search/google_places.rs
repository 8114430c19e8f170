//! Place and event search through the Google Places text-search API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::search::{PlaceQuery, PlaceResult, NOT_AVAILABLE};
use crate::ports::{PlaceSearch, SearchError, SearchKind};

use super::rapidapi::RapidApiClient;

const MAX_RESULTS: u32 = 15;

#[derive(Debug, Clone)]
pub struct GooglePlacesSearch {
    client: RapidApiClient,
    host: String,
    base_url: String,
}

impl GooglePlacesSearch {
    pub fn new(client: RapidApiClient, host: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            host: host.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesSearch {
    async fn search_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, SearchError> {
        let url = format!("{}/v1/places:searchText", self.base_url);
        let text_query = query.text_query();
        tracing::info!(text_query = %text_query, "Searching places");

        let request = self
            .client
            .request(reqwest::Method::POST, &url, &self.host)
            .header("X-Goog-FieldMask", "*")
            .json(&json!({
                "textQuery": text_query,
                "languageCode": "en",
                "maxResultCount": MAX_RESULTS,
            }));
        let body = self.client.send(SearchKind::Place, request).await?;

        let places = normalize_places(&body);
        tracing::info!(count = places.len(), "Place search complete");
        Ok(places)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PlacesResponse {
    places: Option<Vec<Place>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    #[serde(default)]
    id: String,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u64>,
    #[serde(default)]
    types: Vec<String>,
    primary_type_display_name: Option<LocalizedText>,
    icon_background_color: Option<String>,
    icon_mask_base_uri: Option<String>,
    google_maps_uri: Option<String>,
    website_uri: Option<String>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalizedText {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Photo {
    name: Option<String>,
}

fn normalize_places(body: &Value) -> Vec<PlaceResult> {
    let places = match serde_json::from_value::<PlacesResponse>(body.clone()) {
        Ok(PlacesResponse { places: Some(places) }) => places,
        Ok(_) => {
            tracing::info!("No places in provider response");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unexpected place response shape");
            return Vec::new();
        }
    };

    places.into_iter().map(to_result).collect()
}

fn to_result(place: Place) -> PlaceResult {
    let text = |t: Option<LocalizedText>| t.and_then(|t| t.text).filter(|s| !s.is_empty());

    let primary_type = text(place.primary_type_display_name).or_else(|| place.types.first().cloned());
    let icon_url = place
        .icon_background_color
        .as_ref()
        .and(place.icon_mask_base_uri.clone());

    PlaceResult {
        id: place.id,
        title: text(place.display_name).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        address: place
            .formatted_address
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        rating: place.rating.filter(|r| *r > 0.0),
        user_rating_count: place.user_rating_count.unwrap_or(0),
        primary_type,
        types: place.types,
        icon_background_color: place.icon_background_color,
        icon_url,
        google_maps_uri: place.google_maps_uri,
        website_uri: place.website_uri,
        first_photo_reference: place.photos.into_iter().next().and_then(|p| p.name),
        image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn place_is_normalised() {
        let body = json!({
            "places": [{
                "id": "ChIJ123",
                "displayName": { "text": "Belém Tower" },
                "formattedAddress": "Av. Brasília, Lisboa",
                "rating": 4.6,
                "userRatingCount": 81234,
                "types": ["tourist_attraction", "museum"],
                "iconBackgroundColor": "#7B9EB0",
                "iconMaskBaseUri": "https://maps.gstatic.com/icon",
                "googleMapsUri": "https://maps.google.com/?cid=1",
                "photos": [ { "name": "places/ChIJ123/photos/abc" } ]
            }]
        });

        let places = normalize_places(&body);
        let place = &places[0];
        assert_eq!(place.title, "Belém Tower");
        assert_eq!(place.primary_type.as_deref(), Some("tourist_attraction"));
        assert_eq!(place.icon_url.as_deref(), Some("https://maps.gstatic.com/icon"));
        assert_eq!(place.first_photo_reference.as_deref(), Some("places/ChIJ123/photos/abc"));
        assert_eq!(place.website_uri, None);
        assert_eq!(place.image_url, None);
    }

    #[test]
    fn sparse_place_uses_placeholders() {
        let body = json!({ "places": [ { "id": "p1", "iconMaskBaseUri": "https://icon" } ] });
        let place = &normalize_places(&body)[0];
        assert_eq!(place.title, NOT_AVAILABLE);
        assert_eq!(place.address, NOT_AVAILABLE);
        assert_eq!(place.rating, None);
        assert_eq!(place.user_rating_count, 0);
        assert_eq!(place.primary_type, None);
        // No background colour, no icon.
        assert_eq!(place.icon_url, None);
    }

    #[test]
    fn missing_places_array_is_empty() {
        assert!(normalize_places(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn posts_text_query_with_field_mask() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/places:searchText"))
            .and(header("X-Goog-FieldMask", "*"))
            .and(header("X-RapidAPI-Host", "places.example"))
            .and(body_json(json!({
                "textQuery": "museums in Lisbon",
                "languageCode": "en",
                "maxResultCount": 15
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "places": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RapidApiClient::new("rapid-key", std::time::Duration::from_secs(5)).unwrap();
        let search = GooglePlacesSearch::new(client, "places.example", server.uri());
        let query = PlaceQuery::new(Some("Lisbon".into()), Some("museums".into())).unwrap();
        assert!(search.search_places(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn nested_google_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/places:searchText"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "error": { "message": "API key invalid" } })),
            )
            .mount(&server)
            .await;

        let client = RapidApiClient::new("rapid-key", std::time::Duration::from_secs(5)).unwrap();
        let search = GooglePlacesSearch::new(client, "places.example", server.uri());
        let query = PlaceQuery::new(Some("Lisbon".into()), None).unwrap();
        let err = search.search_places(&query).await.unwrap_err();
        assert_eq!(err.to_string(), "Error from event/place API: API key invalid");
    }
}
