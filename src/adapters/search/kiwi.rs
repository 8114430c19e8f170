//! Flight search through the Kiwi.com RapidAPI provider.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::search::{
    format_duration, FlightOffer, FlightQuery, FlightSort, ReturnInfo, DURATION_NOT_AVAILABLE,
    NOT_AVAILABLE, UNKNOWN_AIRLINE, UNKNOWN_AIRPORT, UNKNOWN_CITY,
};
use crate::ports::{FlightSearch, SearchError, SearchKind};

use super::rapidapi::{lenient_number, RapidApiClient};

const ONE_WAY_WINDOW_DAYS: i64 = 2;
const ROUND_TRIP_WINDOW_DAYS: i64 = 3;
const ONE_WAY_LIMIT: u32 = 15;
const ROUND_TRIP_LIMIT: u32 = 20;
const KIWI_SITE: &str = "https://www.kiwi.com";
const DEFAULT_PROVIDER: &str = "Kiwi.com";

#[derive(Debug, Clone)]
pub struct KiwiFlightSearch {
    client: RapidApiClient,
    host: String,
    base_url: String,
}

impl KiwiFlightSearch {
    pub fn new(client: RapidApiClient, host: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            host: host.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FlightSearch for KiwiFlightSearch {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError> {
        let path = if query.is_round_trip() { "round-trip" } else { "one-way" };
        let url = format!("{}/{}", self.base_url, path);
        let params = flight_params(query);

        tracing::info!(
            origin = %query.origin,
            destination = %query.destination,
            round_trip = query.is_round_trip(),
            "Searching flights"
        );

        let request = self
            .client
            .request(reqwest::Method::GET, &url, &self.host)
            .query(&params);
        let body = self.client.send(SearchKind::Flight, request).await?;

        let offers = normalize_flights(&body, query);
        tracing::info!(count = offers.len(), "Flight search complete");
        Ok(offers)
    }
}

/// `YYYY-MM-DDT00:00:00` bounds `days` either side of `date`.
fn window(date: NaiveDate, days: i64) -> (String, String) {
    let fmt = |d: NaiveDate| format!("{}T00:00:00", d.format("%Y-%m-%d"));
    (
        fmt(date - ChronoDuration::days(days)),
        fmt(date + ChronoDuration::days(days)),
    )
}

fn flight_params(query: &FlightQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("source", query.origin.clone()),
        ("destination", query.destination.clone()),
        ("adults", query.passengers.adults.to_string()),
        ("children", query.passengers.children.to_string()),
        ("infants", query.passengers.infants.to_string()),
        ("currency", "USD".to_string()),
        ("locale", "en".to_string()),
        ("sortBy", query.sort_by.as_str().to_string()),
    ];

    match query.return_date {
        Some(return_date) => {
            let (out_start, out_end) = window(query.departure_date, ROUND_TRIP_WINDOW_DAYS);
            let (in_start, in_end) = window(return_date, ROUND_TRIP_WINDOW_DAYS);
            params.extend([
                ("limit", ROUND_TRIP_LIMIT.to_string()),
                ("handbags", "1".to_string()),
                ("holdbags", "0".to_string()),
                ("cabinClass", "ECONOMY".to_string()),
                ("sortOrder", "ASCENDING".to_string()),
                ("transportTypes", "FLIGHT".to_string()),
                ("outboundDepartmentDateStart", out_start),
                ("outboundDepartmentDateEnd", out_end),
                ("inboundDepartureDateStart", in_start),
                ("inboundDepartureDateEnd", in_end),
                ("allowReturnFromDifferentCity", "false".to_string()),
                ("allowChangeInboundDestination", "false".to_string()),
                ("allowChangeInboundSource", "false".to_string()),
                ("allowDifferentStationConnection", "true".to_string()),
                ("enableSelfTransfer", "false".to_string()),
                ("allowOvernightStopover", "true".to_string()),
            ]);
        }
        None => {
            let (out_start, out_end) = window(query.departure_date, ONE_WAY_WINDOW_DAYS);
            params.extend([
                ("limit", ONE_WAY_LIMIT.to_string()),
                ("outboundDepartmentDateStart", out_start),
                ("outboundDepartmentDateEnd", out_end),
            ]);
            if matches!(query.sort_by, FlightSort::Price | FlightSort::Duration) {
                params.push(("sortOrder", "ASCENDING".to_string()));
            }
        }
    }

    if let Some(stops) = query.max_stopovers {
        params.push(("maxStopsCount", stops.to_string()));
    }
    params
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KiwiResponse {
    #[serde(default)]
    itineraries: Option<Vec<Itinerary>>,
    currency: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Itinerary {
    id: Option<String>,
    legacy_id: Option<String>,
    price: Option<Price>,
    booking_options: Option<BookingOptions>,
    sector: Option<Sector>,
    outbound: Option<Leg>,
    inbound: Option<Leg>,
    provider: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
struct Price {
    amount: Option<Value>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BookingOptions {
    #[serde(default)]
    edges: Vec<BookingEdge>,
}

#[derive(Debug, Default, Deserialize)]
struct BookingEdge {
    node: Option<BookingNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingNode {
    price: Option<Price>,
    booking_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Leg {
    sector: Option<Sector>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sector {
    #[serde(default)]
    sector_segments: Vec<SectorSegment>,
}

#[derive(Debug, Default, Deserialize)]
struct SectorSegment {
    segment: Option<Segment>,
}

#[derive(Debug, Default, Deserialize)]
struct Segment {
    source: Option<Endpoint>,
    destination: Option<Endpoint>,
    duration: Option<i64>,
    carrier: Option<Carrier>,
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    local_time: Option<String>,
    utc_time: Option<String>,
    station: Option<Station>,
}

#[derive(Debug, Default, Deserialize)]
struct Station {
    name: Option<String>,
    code: Option<String>,
    city: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
struct Carrier {
    name: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    name: Option<String>,
}

impl Sector {
    fn first_segment(&self) -> Option<&Segment> {
        self.sector_segments.first().and_then(|s| s.segment.as_ref())
    }
}

impl Endpoint {
    fn city(&self) -> Option<&str> {
        self.station.as_ref()?.city.as_ref()?.name.as_deref()
    }
}

fn station(endpoint: Option<&Endpoint>) -> Option<&Station> {
    endpoint.and_then(|e| e.station.as_ref())
}

impl Itinerary {
    fn primary_booking(&self) -> Option<&BookingNode> {
        self.booking_options.as_ref()?.edges.first()?.node.as_ref()
    }

    fn outbound_sector(&self) -> Option<&Sector> {
        self.outbound
            .as_ref()
            .and_then(|leg| leg.sector.as_ref())
            .or(self.sector.as_ref())
    }

    fn inbound_sector(&self) -> Option<&Sector> {
        self.inbound.as_ref().and_then(|leg| leg.sector.as_ref())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Normalisation
// ════════════════════════════════════════════════════════════════════════════

fn normalize_flights(body: &Value, query: &FlightQuery) -> Vec<FlightOffer> {
    let response: KiwiResponse = match serde_json::from_value(body.clone()) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Unexpected flight response shape");
            return Vec::new();
        }
    };

    let response_currency = response
        .currency
        .clone()
        .or_else(|| response.metadata.as_ref().and_then(|m| m.currency.clone()));

    response
        .itineraries
        .unwrap_or_default()
        .iter()
        .map(|itinerary| to_offer(itinerary, response_currency.as_deref(), query))
        .collect()
}

fn to_offer(itinerary: &Itinerary, response_currency: Option<&str>, query: &FlightQuery) -> FlightOffer {
    let round_trip = query.is_round_trip();
    let booking = itinerary.primary_booking();

    let price = booking
        .and_then(|b| b.price.as_ref())
        .and_then(|p| lenient_number(p.amount.as_ref()))
        .or_else(|| {
            itinerary
                .price
                .as_ref()
                .and_then(|p| lenient_number(p.amount.as_ref()))
        });

    let currency = response_currency
        .map(str::to_string)
        .or_else(|| itinerary.price.as_ref().and_then(|p| p.currency.clone()))
        .unwrap_or_else(|| "USD".to_string());

    let booking_link = booking.and_then(|b| b.booking_url.as_deref()).map(|url| {
        if url.starts_with('/') {
            format!("{}{}", KIWI_SITE, url)
        } else {
            url.to_string()
        }
    });

    let sector = if round_trip {
        itinerary.outbound_sector()
    } else {
        itinerary.sector.as_ref()
    };
    let segment = sector.and_then(Sector::first_segment);
    let departure = segment.and_then(|s| s.source.as_ref());
    let arrival = segment.and_then(|s| s.destination.as_ref());
    let carrier = segment.and_then(|s| s.carrier.as_ref());
    let duration = segment.and_then(|s| s.duration);

    let return_segment = if round_trip {
        itinerary.inbound_sector().and_then(Sector::first_segment)
    } else {
        None
    };

    let total_trip_duration = round_trip.then(|| {
        match (duration, return_segment.and_then(|s| s.duration)) {
            (Some(out), Some(back)) => format_duration(Some(out + back)),
            _ => DURATION_NOT_AVAILABLE.to_string(),
        }
    });

    let return_info = return_segment.map(|s| ReturnInfo {
        departure_time: s.source.as_ref().and_then(|e| e.local_time.clone()),
        arrival_time: s.destination.as_ref().and_then(|e| e.local_time.clone()),
        departure_city: s.source.as_ref().and_then(Endpoint::city).map(str::to_string),
        arrival_city: s.destination.as_ref().and_then(Endpoint::city).map(str::to_string),
    });

    let id = itinerary
        .id
        .clone()
        .or_else(|| itinerary.legacy_id.clone())
        .unwrap_or_else(|| {
            let prefix = if round_trip { "roundtrip" } else { "oneway" };
            format!("{}_{}", prefix, Uuid::new_v4())
        });

    let text = |value: Option<&str>, fallback: &str| value.unwrap_or(fallback).to_string();

    FlightOffer {
        id,
        price,
        currency,
        departure_city: text(departure.and_then(Endpoint::city), UNKNOWN_CITY),
        departure_airport: text(station(departure).and_then(|s| s.name.as_deref()), UNKNOWN_AIRPORT),
        departure_airport_code: text(station(departure).and_then(|s| s.code.as_deref()), NOT_AVAILABLE),
        departure_time_local: departure.and_then(|e| e.local_time.clone()),
        departure_time_utc: departure.and_then(|e| e.utc_time.clone()),
        arrival_city: text(arrival.and_then(Endpoint::city), UNKNOWN_CITY),
        arrival_airport: text(station(arrival).and_then(|s| s.name.as_deref()), UNKNOWN_AIRPORT),
        arrival_airport_code: text(station(arrival).and_then(|s| s.code.as_deref()), NOT_AVAILABLE),
        arrival_time_local: arrival.and_then(|e| e.local_time.clone()),
        arrival_time_utc: arrival.and_then(|e| e.utc_time.clone()),
        duration_in_seconds: duration,
        duration_formatted: format_duration(duration),
        total_trip_duration,
        airline_name: text(carrier.and_then(|c| c.name.as_deref()), UNKNOWN_AIRLINE),
        airline_code: text(carrier.and_then(|c| c.code.as_deref()), NOT_AVAILABLE),
        flight_number: text(segment.and_then(|s| s.code.as_deref()), NOT_AVAILABLE),
        booking_link,
        provider: text(
            itinerary.provider.as_ref().and_then(|p| p.name.as_deref()),
            DEFAULT_PROVIDER,
        ),
        is_round_trip: round_trip,
        return_info,
        original_departure_date: query.departure_date.format("%Y-%m-%d").to_string(),
        original_return_date: query
            .return_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
    }
}
