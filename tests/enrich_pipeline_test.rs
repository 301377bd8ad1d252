use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use geo_enricher::app::enrich_use_case::EnrichUseCase;
use geo_enricher::app::ports::GeocoderPort;
use geo_enricher::common::{Candidate, GeocoderError};
use geo_enricher::config::{GeocodePolicy, GeocoderConfig};
use geo_enricher::infra::nominatim_client::NominatimClient;
use geo_enricher::infra::pacer_adapter::FixedDelayPacer;
use geo_enricher::infra::progress_adapter::SilentProgress;
use geo_enricher::pipeline::storage::{parse_column_list, Table};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::tempdir;

/// Answers every query with the same candidates and records what was asked.
struct ScriptedGeocoder {
    answer: Vec<Candidate>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl GeocoderPort for ScriptedGeocoder {
    async fn lookup(&self, query: &str) -> geo_enricher::common::Result<Vec<Candidate>> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(self.answer.clone())
    }
}

fn use_case(geocoder: Box<dyn GeocoderPort>) -> EnrichUseCase {
    EnrichUseCase::new(
        geocoder,
        Box::new(FixedDelayPacer::new(Duration::ZERO)),
        Box::new(SilentProgress),
        GeocodePolicy::default(),
    )
}

#[tokio::test]
async fn test_semicolon_file_through_nominatim_client() -> Result<()> {
    let server = MockServer::start_async().await;
    let full = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Springfield Hill County");
            then.status(200).json_body(json!([
                {"class": "highway", "type": "residential", "display_name": "Hill Road"}
            ]));
        })
        .await;
    let relaxed = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Springfield Hill");
            then.status(200).json_body(json!([
                {"class": "place", "type": "village", "display_name": "X", "lat": "1.0", "lon": "2.0"}
            ]));
        })
        .await;

    let dir = tempdir()?;
    let source = dir.path().join("source.csv");
    let result = dir.path().join("result.csv");
    fs::write(
        &source,
        "id;Region;District;Town;Population\n1;Springfield;Hill;County;100\n2;nan;nan;nan;5\n",
    )?;

    let config = GeocoderConfig {
        endpoint: server.url("/search"),
        delay_ms: 0,
        ..GeocoderConfig::default()
    };
    let mut table = Table::read(&source)?;
    assert_eq!(table.delimiter(), b';');

    let stats = use_case(Box::new(NominatimClient::new(&config)?))
        .enrich_table(&mut table, &parse_column_list("Region,District,Town"))
        .await?;
    table.write(&result)?;

    full.assert_async().await;
    relaxed.assert_async().await;
    assert_eq!(stats.matched_rows, 1);
    assert_eq!(stats.empty_rows, 1);
    assert_eq!(stats.lookups, 2);
    assert_eq!(
        fs::read_to_string(&result)?,
        "id;Region;District;Town;Object_name;Latitude;Longitude;Search_query;Population\n\
         1;Springfield;Hill;County;X;1.0;2.0;Springfield Hill;100\n\
         2;nan;nan;nan;;;;;5\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_comma_file_keeps_columns_and_delimiter() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("source.csv");
    let result = dir.path().join("result.csv");
    fs::write(
        &source,
        "Country,Region,Town,Code\nUtopia,Lake (north),Oak – Ridge,A1\n",
    )?;

    let calls = Arc::new(Mutex::new(Vec::new()));
    let geocoder = ScriptedGeocoder {
        answer: vec![Candidate {
            class: Some("boundary".into()),
            kind: Some("administrative".into()),
            display_name: Some("Utopia, Lake".into()),
            lat: Some("10.5".into()),
            lon: Some("-3.25".into()),
        }],
        calls: calls.clone(),
    };

    let mut table = Table::read(&source)?;
    use_case(Box::new(geocoder))
        .enrich_table(&mut table, &parse_column_list("Country, Region, Town"))
        .await?;
    table.write(&result)?;

    assert_eq!(*calls.lock().unwrap(), ["Utopia Lake Oak Ridge"]);
    assert_eq!(
        fs::read_to_string(&result)?,
        "Country,Region,Town,Object_name,Latitude,Longitude,Search_query,Code\n\
         Utopia,Lake (north),Oak – Ridge,\"Utopia, Lake\",10.5,-3.25,Utopia Lake Oak Ridge,A1\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_column_fails_without_lookups() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("source.csv");
    fs::write(&source, "a;b;c\n1;2;3\n")?;

    let calls = Arc::new(Mutex::new(Vec::new()));
    let geocoder = ScriptedGeocoder {
        answer: vec![],
        calls: calls.clone(),
    };

    let mut table = Table::read(&source)?;
    let err = use_case(Box::new(geocoder))
        .enrich_table(&mut table, &parse_column_list("a,b,missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeocoderError::ColumnValidation(_)));
    assert!(calls.lock().unwrap().is_empty());
    Ok(())
}
