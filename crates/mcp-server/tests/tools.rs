use anyhow::Result;
use apiscope_explorer::LoaderConfig;
use apiscope_mcp::{
    AnalyzeSchemaRequest, ApiScopeService, CompareSchemasRequest, EmptyRequest,
    EndpointDetailsRequest, LoadSpecRequest, SearchEndpointsRequest, NO_SPEC_LOADED,
};
use pretty_assertions::assert_eq;
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

mod support;

use support::{result_json, PETSTORE};

async fn loaded_service() -> Result<ApiScopeService> {
    let service = ApiScopeService::new(LoaderConfig::default())?;
    let result = service
        .load_openapi_spec(Parameters(LoadSpecRequest {
            source: PETSTORE.to_string(),
        }))
        .await?;
    assert_ne!(result.is_error, Some(true), "load_openapi_spec failed");
    Ok(service)
}

#[tokio::test]
async fn tools_report_no_spec_loaded_before_load() -> Result<()> {
    let service = ApiScopeService::new(LoaderConfig::default())?;

    let result = service
        .get_api_analytics(Parameters(EmptyRequest::default()))
        .await?;
    assert_eq!(result.is_error, Some(true));
    let body = result_json(&result)?;
    assert_eq!(body["code"], NO_SPEC_LOADED);
    assert!(body["hint"].as_str().is_some());

    let result = service
        .search_endpoints(Parameters(SearchEndpointsRequest::default()))
        .await?;
    assert_eq!(result.is_error, Some(true));
    Ok(())
}

#[tokio::test]
async fn load_returns_summary() -> Result<()> {
    let service = ApiScopeService::new(LoaderConfig::default())?;
    let result = service
        .load_openapi_spec(Parameters(LoadSpecRequest {
            source: PETSTORE.to_string(),
        }))
        .await?;
    assert_ne!(result.is_error, Some(true));

    let summary = result_json(&result)?;
    assert_eq!(summary["title"], "Petstore");
    assert_eq!(summary["openapiVersion"], "3.0.3");
    assert_eq!(summary["endpointCount"], 3);
    assert_eq!(summary["schemaCount"], 2);
    assert_eq!(summary["metadata"]["chunksProcessed"], 1);
    Ok(())
}

#[tokio::test]
async fn load_from_file_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("petstore.json");
    std::fs::write(&path, PETSTORE)?;

    let service = ApiScopeService::new(LoaderConfig::default())?;
    let result = service
        .load_openapi_spec(Parameters(LoadSpecRequest {
            source: path.display().to_string(),
        }))
        .await?;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(result_json(&result)?["source"], path.display().to_string());
    Ok(())
}

#[tokio::test]
async fn failed_load_reports_envelope() -> Result<()> {
    let service = ApiScopeService::new(LoaderConfig::default())?;
    let result = service
        .load_openapi_spec(Parameters(LoadSpecRequest {
            source: "definitely/not/here.yaml".to_string(),
        }))
        .await?;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(result_json(&result)?["code"], "io_error");

    let result = service
        .load_openapi_spec(Parameters(LoadSpecRequest {
            source: "   ".to_string(),
        }))
        .await?;
    assert_eq!(result_json(&result)?["code"], "invalid_source");
    Ok(())
}

#[tokio::test]
async fn search_filters_and_rejects_bad_arguments() -> Result<()> {
    let service = loaded_service().await?;

    let result = service
        .search_endpoints(Parameters(SearchEndpointsRequest {
            query: Some("PET".into()),
            method: Some("get".into()),
            ..Default::default()
        }))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["totalMatches"], 1);
    assert_eq!(body["endpoints"][0]["path"], "/pets");
    assert_eq!(body["endpoints"][0]["operationId"], "listPets");

    let result = service
        .search_endpoints(Parameters(SearchEndpointsRequest {
            deprecated: Some(true),
            ..Default::default()
        }))
        .await?;
    assert_eq!(result_json(&result)?["endpoints"][0]["method"], "PATCH");

    let err = service
        .search_endpoints(Parameters(SearchEndpointsRequest {
            method: Some("fetch".into()),
            ..Default::default()
        }))
        .await;
    assert!(err.is_err());

    let err = service
        .search_endpoints(Parameters(SearchEndpointsRequest {
            complexity: Some("extreme".into()),
            ..Default::default()
        }))
        .await;
    assert!(err.is_err());
    Ok(())
}

#[tokio::test]
async fn endpoint_details_and_missing_endpoint() -> Result<()> {
    let service = loaded_service().await?;

    let result = service
        .get_endpoint_details(Parameters(EndpointDetailsRequest {
            method: "PATCH".into(),
            path: "/users/{id}".into(),
        }))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["businessContext"], "User Management");
    assert_eq!(body["estimatedResponseTime"], "slow");
    assert_eq!(body["deprecated"], true);

    let result = service
        .get_endpoint_details(Parameters(EndpointDetailsRequest {
            method: "delete".into(),
            path: "/pets".into(),
        }))
        .await?;
    assert_eq!(result.is_error, Some(true));
    let body = result_json(&result)?;
    assert_eq!(body["code"], "endpoint_not_found");
    assert_eq!(body["message"], "Endpoint not found: DELETE /pets");
    Ok(())
}

#[tokio::test]
async fn schema_tools() -> Result<()> {
    let service = loaded_service().await?;

    let result = service
        .list_schemas(Parameters(EmptyRequest::default()))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["total"], 2);
    assert_eq!(body["schemas"][0]["name"], "Pet");
    assert_eq!(body["schemas"][0]["metrics"]["circularRefs"], true);

    let result = service
        .analyze_schema(Parameters(AnalyzeSchemaRequest { name: "User".into() }))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["dependencies"], json!(["Pet"]));
    assert_eq!(body["dependents"], json!(["Pet"]));
    assert_eq!(body["reachable"], json!(["Pet", "User"]));

    let result = service
        .analyze_schema(Parameters(AnalyzeSchemaRequest {
            name: "Ghost".into(),
        }))
        .await?;
    assert_eq!(result_json(&result)?["code"], "schema_not_found");

    let result = service
        .compare_schemas(Parameters(CompareSchemasRequest {
            left: "Pet".into(),
            right: "User".into(),
        }))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["score"], 70);
    assert_eq!(body["shared"], json!(["id", "name"]));
    Ok(())
}

#[tokio::test]
async fn analytics_after_load() -> Result<()> {
    let service = loaded_service().await?;
    let result = service
        .get_api_analytics(Parameters(EmptyRequest::default()))
        .await?;
    let body = result_json(&result)?;
    assert_eq!(body["endpoints"]["total"], 3);
    assert_eq!(body["endpoints"]["deprecated"], 1);
    assert_eq!(body["endpoints"]["byMethod"]["POST"], 1);
    assert_eq!(body["schemas"]["circular"], json!(["Pet", "User"]));
    assert_eq!(body["schemas"]["cycleGroups"], json!([["Pet", "User"]]));
    Ok(())
}
