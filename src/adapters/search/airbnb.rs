//! Accommodation search through the Airbnb19 RapidAPI provider.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::search::{AccommodationOffer, AccommodationQuery, HostSummary};
use crate::ports::{AccommodationSearch, SearchError, SearchKind};

use super::rapidapi::RapidApiClient;

const MAX_IMAGES: usize = 5;
const ROOMS_URL: &str = "https://www.airbnb.com/rooms";

static TOTAL_PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?([\d,]+(?:\.\d{2})?)").expect("total price pattern"));
static RATING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\d.]+)").expect("rating pattern"));
static REVIEW_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([\d,]+)\)").expect("review count pattern"));

#[derive(Debug, Clone)]
pub struct AirbnbAccommodationSearch {
    client: RapidApiClient,
    host: String,
    base_url: String,
}

impl AirbnbAccommodationSearch {
    pub fn new(client: RapidApiClient, host: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            host: host.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AccommodationSearch for AirbnbAccommodationSearch {
    async fn search_accommodations(
        &self,
        query: &AccommodationQuery,
    ) -> Result<Vec<AccommodationOffer>, SearchError> {
        let url = format!("{}/api/v2/searchPropertyByLocation", self.base_url);
        let params = accommodation_params(query);
        tracing::info!(city = %query.destination_city, "Searching accommodations");

        let request = self
            .client
            .request(reqwest::Method::GET, &url, &self.host)
            .query(&params);
        let body = self.client.send(SearchKind::Accommodation, request).await?;

        let offers = normalize_accommodations(&body, query);
        tracing::info!(count = offers.len(), "Accommodation search complete");
        Ok(offers)
    }
}

fn accommodation_params(query: &AccommodationQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", query.destination_city.clone()),
        ("checkin", query.check_in.format("%Y-%m-%d").to_string()),
        ("checkout", query.check_out.format("%Y-%m-%d").to_string()),
        ("adults", query.passengers.adults.to_string()),
        ("children", query.passengers.children.to_string()),
        ("infants", query.passengers.infants.to_string()),
        ("currency", query.currency.clone()),
        ("guestFavorite", "false".to_string()),
        ("ib", "false".to_string()),
    ];
    let optional = [
        ("priceMin", &query.price_min),
        ("priceMax", &query.price_max),
        ("minBedrooms", &query.min_bedrooms),
        ("amenities", &query.amenities),
    ];
    params.extend(
        optional
            .into_iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key, v))),
    );
    params
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
struct AirbnbResponse {
    #[serde(default)]
    status: bool,
    data: Option<AirbnbData>,
}

#[derive(Debug, Default, Deserialize)]
struct AirbnbData {
    list: Option<Vec<Item>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: Option<String>,
    #[serde(default)]
    listing: Listing,
    demand_stay_listing: Option<DemandStayListing>,
    structured_display_price: Option<DisplayPrice>,
    #[serde(default)]
    contextual_pictures: Vec<Picture>,
    avg_rating_localized: Option<String>,
    #[serde(default)]
    badges: Vec<Badge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    id: Option<Value>,
    legacy_name: Option<String>,
    title: Option<String>,
    legacy_localized_city_name: Option<String>,
    legacy_city: Option<String>,
    primary_host_passport: Option<HostPassport>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostPassport {
    name: Option<String>,
    is_superhost: Option<bool>,
    thumbnail_url: Option<String>,
    time_as_host: Option<TimeAsHost>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeAsHost {
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct DemandStayListing {
    location: Option<DemandStayLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemandStayLocation {
    localized_city_name: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayPrice {
    primary_line: Option<PriceLine>,
    secondary_line: Option<PriceLine>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceLine {
    price: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Picture {
    picture: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Badge {
    text: Option<String>,
}

impl Listing {
    fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Normalisation
// ════════════════════════════════════════════════════════════════════════════

fn normalize_accommodations(body: &Value, query: &AccommodationQuery) -> Vec<AccommodationOffer> {
    let response: AirbnbResponse = match serde_json::from_value(body.clone()) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Unexpected accommodation response shape");
            return Vec::new();
        }
    };
    if !response.status {
        return Vec::new();
    }
    let Some(list) = response.data.and_then(|d| d.list) else {
        return Vec::new();
    };

    list.iter()
        .map(|item| to_offer(item, query))
        .filter(AccommodationOffer::has_useful_data)
        .collect()
}

fn price_per_night(raw: &str) -> Option<f64> {
    raw.replace(['$', ','], "").trim().parse().ok()
}

fn total_price(raw: &str) -> Option<f64> {
    let digits = TOTAL_PRICE.captures(raw)?.get(1)?.as_str().replace(',', "");
    digits.parse().ok()
}

/// Splits `"4.56 (227)"` into rating and review count.
fn rating_and_reviews(raw: &str) -> (Option<f64>, Option<u32>) {
    let rating = RATING
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());
    let reviews = REVIEW_COUNT
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok());
    (rating, reviews)
}

fn to_offer(item: &Item, query: &AccommodationQuery) -> AccommodationOffer {
    let listing = &item.listing;
    let prices = item.structured_display_price.as_ref();
    let line_price = |line: Option<&PriceLine>| line.and_then(|l| l.price.clone());

    let price_per_night = line_price(prices.and_then(|p| p.primary_line.as_ref()))
        .as_deref()
        .and_then(price_per_night);
    let total_price = line_price(prices.and_then(|p| p.secondary_line.as_ref()))
        .as_deref()
        .and_then(total_price);

    let images: Vec<String> = item
        .contextual_pictures
        .iter()
        .take(MAX_IMAGES)
        .filter_map(|p| p.picture.clone())
        .collect();
    let image_url = item.contextual_pictures.first().and_then(|p| p.picture.clone());

    let (rating, review_count) = item
        .avg_rating_localized
        .as_deref()
        .map(rating_and_reviews)
        .unwrap_or((None, None));

    let name = item
        .title
        .clone()
        .or_else(|| listing.legacy_name.clone())
        .or_else(|| listing.title.clone())
        .unwrap_or_else(|| "Accommodation".to_string());

    let demand_stay = item.demand_stay_listing.as_ref().and_then(|d| d.location.as_ref());
    let location = listing
        .legacy_localized_city_name
        .clone()
        .or_else(|| listing.legacy_city.clone())
        .or_else(|| demand_stay.and_then(|l| l.localized_city_name.clone()))
        .or_else(|| demand_stay.and_then(|l| l.city.clone()))
        .unwrap_or_else(|| query.destination_city.clone());

    let host = listing.primary_host_passport.as_ref().map(|h| HostSummary {
        name: h.name.clone(),
        is_superhost: h.is_superhost,
        profile_picture: h.thumbnail_url.clone(),
        years_hosting: h.time_as_host.as_ref().and_then(|t| t.years),
    });

    let id = listing
        .id()
        .unwrap_or_else(|| format!("accommodation_{}", Uuid::new_v4()));

    AccommodationOffer {
        booking_link: format!("{}/{}", ROOMS_URL, id),
        id,
        description: name.clone(),
        name,
        location,
        destination_city: query.destination_city.clone(),
        price_per_night,
        total_price,
        currency: query.currency.clone(),
        rating,
        review_count,
        image_url,
        images,
        provider: "Airbnb".to_string(),
        check_in_date: query.check_in.format("%Y-%m-%d").to_string(),
        check_out_date: query.check_out.format("%Y-%m-%d").to_string(),
        number_of_guests: query.passengers.adults,
        host,
        badges: item.badges.iter().filter_map(|b| b.text.clone()).collect(),
    }
}
