//! Client for the crime prediction service.
//!
//! [`build_request`] turns a completed selection into the wire request.
//! [`PredictClient`] POSTs it once (no retries) and classifies failures so
//! callers can report an HTTP status separately from an unreachable
//! service.

mod client;
mod basic;
pub mod types;

pub use client::HttpClient;
pub use basic::BasicClient;
pub use types::{ChartPoint, PredictionRequest, PredictionResponse, adapt};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};

use crate::error::PredictionError;
use crate::geometry::GeoPoint;

/// Timestamp format the prediction service expects.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Builds the request body from the pieces of a selection.
///
/// # Errors
///
/// Returns [`PredictionError::IncompleteSelection`] when the ward or the
/// location is still missing.
pub fn build_request(
    ward: Option<i64>,
    point: Option<GeoPoint>,
    when: NaiveDateTime,
) -> Result<PredictionRequest, PredictionError> {
    let ward = ward.ok_or(PredictionError::IncompleteSelection("no ward selected"))?;
    let point = point.ok_or(PredictionError::IncompleteSelection("no location selected"))?;
    Ok(PredictionRequest {
        ward,
        date_of_occurrence: when.format(TIMESTAMP_FORMAT).to_string(),
        latitude: point.latitude,
        longitude: point.longitude,
    })
}

/// Abstraction over the prediction service.
#[async_trait]
pub trait PredictionApi {
    /// Requests crime probabilities and counts for one ward and timestamp.
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError>;
}

/// HTTP-backed [`PredictionApi`] bound to one endpoint URL.
pub struct PredictClient<C = BasicClient> {
    endpoint: reqwest::Url,
    http: C,
}

impl PredictClient<BasicClient> {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: endpoint.parse()?,
            http: BasicClient::new()?,
        })
    }
}

impl<C: HttpClient> PredictClient<C> {
    pub fn with_client(endpoint: &str, http: C) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: endpoint.parse()?,
            http,
        })
    }
}

#[async_trait]
impl<C: HttpClient> PredictionApi for PredictClient<C> {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let mut req = reqwest::Request::new(Method::POST, self.endpoint.clone());
        let body = serde_json::to_vec(request).map_err(|e| PredictionError::Encode {
            reason: e.to_string(),
        })?;
        *req.body_mut() = Some(body.into());
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .execute(req)
            .await
            .map_err(|e| PredictionError::Network {
                cause: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Http {
                status: status.as_u16(),
            });
        }

        response.json::<PredictionResponse>().await.map_err(|e| {
            if e.is_decode() {
                PredictionError::Decode {
                    reason: e.to_string(),
                }
            } else {
                PredictionError::Network {
                    cause: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reqwest::{Request, Response};

    fn canned(status: u16, body: &str) -> reqwest::Result<Response> {
        let response = http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap();
        Ok(response.into())
    }

    struct CannedClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            canned(self.status, self.body)
        }
    }

    /// Checks the outgoing wire request, then answers with an empty payload.
    struct AssertingClient;

    #[async_trait]
    impl HttpClient for AssertingClient {
        async fn execute(&self, req: Request) -> reqwest::Result<Response> {
            assert_eq!(req.method(), &Method::POST);
            assert_eq!(req.url().as_str(), "http://127.0.0.1:8000/predict");
            assert_eq!(req.headers()[CONTENT_TYPE], "application/json");

            let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
            let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
            assert_eq!(value["ward"], 10);
            assert_eq!(value["date_of_occurrence"], "2024-03-01 03:00");

            canned(200, "{}")
        }
    }

    fn when() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap()
    }

    fn point() -> GeoPoint {
        GeoPoint::new(41.85, -87.65).unwrap()
    }

    #[test]
    fn test_build_request_formats_timestamp() {
        let request = build_request(Some(10), Some(point()), when()).unwrap();
        assert_eq!(request.ward, 10);
        assert_eq!(request.date_of_occurrence, "2024-03-01 03:00");
        assert_eq!(request.latitude, 41.85);
        assert_eq!(request.longitude, -87.65);
    }

    #[test]
    fn test_build_request_requires_ward_and_location() {
        assert!(matches!(
            build_request(None, Some(point()), when()),
            Err(PredictionError::IncompleteSelection(_))
        ));
        assert!(matches!(
            build_request(Some(10), None, when()),
            Err(PredictionError::IncompleteSelection(_))
        ));
    }

    #[tokio::test]
    async fn test_predict_decodes_success_payload() {
        let client = PredictClient::with_client(
            "http://127.0.0.1:8000/predict",
            CannedClient {
                status: 200,
                body: r#"{"crime_types_probability":{"THEFT":0.2},"crime_types_count":{"THEFT":5}}"#,
            },
        )
        .unwrap();

        let request = build_request(Some(10), Some(point()), when()).unwrap();
        let response = client.predict(&request).await.unwrap();
        assert_eq!(response.crime_types_probability["THEFT"], 0.2);
        assert_eq!(response.crime_types_count["THEFT"], 5);
    }

    #[tokio::test]
    async fn test_predict_maps_http_status() {
        let client = PredictClient::with_client(
            "http://127.0.0.1:8000/predict",
            CannedClient {
                status: 404,
                body: "not found",
            },
        )
        .unwrap();

        let request = build_request(Some(10), Some(point()), when()).unwrap();
        let err = client.predict(&request).await.unwrap_err();
        assert!(matches!(err, PredictionError::Http { status: 404 }));
    }

    #[tokio::test]
    async fn test_predict_flags_undecodable_body() {
        let client = PredictClient::with_client(
            "http://127.0.0.1:8000/predict",
            CannedClient {
                status: 200,
                body: "success, but not json",
            },
        )
        .unwrap();

        let request = build_request(Some(10), Some(point()), when()).unwrap();
        let err = client.predict(&request).await.unwrap_err();
        assert!(matches!(err, PredictionError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_predict_posts_json_body() {
        let client =
            PredictClient::with_client("http://127.0.0.1:8000/predict", AssertingClient).unwrap();
        let request = build_request(Some(10), Some(point()), when()).unwrap();
        let response = client.predict(&request).await.unwrap();
        assert_eq!(response, PredictionResponse::default());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        assert!(PredictClient::with_client("not a url", AssertingClient).is_err());
    }
}
