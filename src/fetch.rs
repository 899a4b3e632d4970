// fetch.rs - intraday series from the Yahoo Finance chart API
use crate::config::Ticker;
use crate::error::FetchError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// One observation: epoch milliseconds and price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: i64,
    pub price: f64,
}

impl Sample {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

/// Source of session series. Implementations must return the whole session,
/// ordered by time.
pub trait MarketData: Send + Sync {
    fn fetch(&self, ticker: &Ticker, interval: &str, period: &str) -> Result<Vec<Sample>, FetchError>;
}

/// Provider bar interval for a refresh interval.
pub fn select_interval(refresh_secs: u64) -> &'static str {
    if refresh_secs < 60 {
        "1m"
    } else if refresh_secs < 300 {
        "5m"
    } else {
        "15m"
    }
}

pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl MarketData for YahooClient {
    fn fetch(&self, ticker: &Ticker, interval: &str, period: &str) -> Result<Vec<Sample>, FetchError> {
        let symbol = ticker.symbol.as_str();
        let url = format!("{}/{}", CHART_URL, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("interval", interval), ("range", period)])
            .send()
            .map_err(|e| FetchError::network(symbol, e))?;

        classify_status(symbol, response.status())?;
        let body = response.text().map_err(|e| FetchError::network(symbol, e))?;
        let samples = parse_chart(symbol, &body)?;
        tracing::debug!(symbol, interval, period, samples = samples.len(), "fetched chart");
        Ok(samples)
    }
}

/// 404 means the provider has no such symbol; any other non-2xx is a
/// transport-level failure worth retrying next tick.
pub fn classify_status(symbol: &str, status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::unavailable(symbol, "unknown symbol"));
    }
    if !status.is_success() {
        return Err(FetchError::network(symbol, format!("http status {}", status)));
    }
    Ok(())
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Parses a chart response body into time-ordered samples.
/// Null or non-finite closes are dropped.
pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<Sample>, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::unavailable(symbol, format!("malformed response: {}", e)))?;

    if let Some(err) = response.chart.error {
        let reason = err.description.unwrap_or_else(|| "provider error".to_string());
        return Err(FetchError::unavailable(symbol, reason));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::unavailable(symbol, "empty result"))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut samples: Vec<Sample> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&secs, close)| match close {
            Some(price) if price.is_finite() => Some(Sample::new(secs * 1000, price)),
            _ => None,
        })
        .collect();

    if samples.is_empty() {
        return Err(FetchError::unavailable(symbol, "no prices in session"));
    }
    samples.sort_by_key(|s| s.time);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1 => "1m")]
    #[test_case(59 => "1m")]
    #[test_case(60 => "5m")]
    #[test_case(299 => "5m")]
    #[test_case(300 => "15m")]
    #[test_case(3600 => "15m")]
    fn interval_follows_refresh_rate(secs: u64) -> &'static str {
        select_interval(secs)
    }

    #[test_case(200 => Ok(()))]
    #[test_case(204 => Ok(()))]
    #[test_case(404 => Err("unavailable"))]
    #[test_case(429 => Err("network"))]
    #[test_case(500 => Err("network"))]
    #[test_case(503 => Err("network"))]
    #[test_case(301 => Err("network"))]
    fn status_maps_to_error_kind(code: u16) -> Result<(), &'static str> {
        let status = StatusCode::from_u16(code).unwrap();
        classify_status("AAA", status).map_err(|e| match e {
            FetchError::DataUnavailable { .. } => "unavailable",
            FetchError::Network { .. } => "network",
        })
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[1700000120,1700000000,1700000060],
            "indicators":{"quote":[{"close":[101.5,100.0,null]}]}}],"error":null}}"#;
        let samples = parse_chart("AAA", body).unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new(1_700_000_000_000, 100.0),
                Sample::new(1_700_000_120_000, 101.5)
            ]
        );
    }

    #[test]
    fn provider_error_is_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        match parse_chart("ZZZ", body) {
            Err(FetchError::DataUnavailable { symbol, reason }) => {
                assert_eq!(symbol, "ZZZ");
                assert!(reason.contains("delisted"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_series_is_unavailable() {
        let body = r#"{"chart":{"result":[{"timestamp":[],"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        assert!(matches!(
            parse_chart("AAA", body),
            Err(FetchError::DataUnavailable { .. })
        ));

        let all_null = r#"{"chart":{"result":[{"timestamp":[1,2],"indicators":{"quote":[{"close":[null,null]}]}}],"error":null}}"#;
        assert!(matches!(
            parse_chart("AAA", all_null),
            Err(FetchError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn garbage_is_unavailable() {
        assert!(matches!(
            parse_chart("AAA", "<html>rate limited</html>"),
            Err(FetchError::DataUnavailable { .. })
        ));
    }
}
