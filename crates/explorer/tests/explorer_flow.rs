use apiscope_explorer::{
    compute_analytics, search_endpoints, EndpointQuery, ExplorerError, LoaderConfig, SpecLoader,
    SpecSource,
};
use apiscope_stream_parser::{HttpMethod, ParseOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PETSTORE: &str = r##"openapi: 3.0.3
info:
  title: Petstore
  version: 1.2.0
paths:
  /pets:
    get:
      summary: List pets
      operationId: listPets
      tags: [pets]
      parameters:
        - name: limit
          in: query
      responses:
        '200':
          description: ok
    post:
      summary: Create a pet
      tags: [pets]
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        '201':
          description: created
  /users/{id}:
    patch:
      summary: Update user profile
      tags: [users]
      deprecated: true
      responses:
        '200':
          description: ok
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
        owner:
          $ref: '#/components/schemas/User'
    User:
      type: object
      properties:
        id:
          type: integer
        name:
          type: string
        pets:
          type: array
          items:
            $ref: '#/components/schemas/Pet'
    Error:
      type: object
      properties:
        code:
          type: integer
"##;

fn write_fixture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("petstore.yaml");
    std::fs::write(&path, PETSTORE).unwrap();
    path
}

#[tokio::test]
async fn loads_file_and_answers_queries() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir);
    let loader = SpecLoader::new(LoaderConfig::default()).unwrap();
    let loaded = loader.load(&SpecSource::File(path)).await.unwrap();

    let summary = loaded.summary();
    assert_eq!(summary.title.as_deref(), Some("Petstore"));
    assert_eq!(summary.version.as_deref(), Some("1.2.0"));
    assert_eq!(summary.openapi_version.as_deref(), Some("3.0.3"));
    assert_eq!(summary.endpoint_count, 3);
    assert_eq!(summary.schema_count, 3);
    assert_eq!(loaded.schema_names(), vec!["Error", "Pet", "User"]);

    let results = search_endpoints(
        loaded.endpoints(),
        &EndpointQuery {
            query: Some("pet".into()),
            ..Default::default()
        },
    );
    assert_eq!(results.total_matches, 2);

    let patch = loaded.endpoint(HttpMethod::Patch, "/users/{id}").unwrap();
    assert!(patch.deprecated);
    assert_eq!(patch.business_context, "User Management");
    assert_eq!(patch.estimated_response_time.as_str(), "slow");
}

#[tokio::test]
async fn schema_detail_and_comparison() {
    let loader = SpecLoader::new(LoaderConfig::default()).unwrap();
    let loaded = loader
        .load(&SpecSource::classify(PETSTORE).unwrap())
        .await
        .unwrap();

    let pet = loaded.schema_detail("Pet").unwrap();
    assert!(pet.metrics.circular_refs);
    assert_eq!(pet.metrics.required_count, 2);
    assert_eq!(pet.dependencies, vec!["User"]);
    assert_eq!(pet.dependents, vec!["User"]);
    // Pet -> User -> Pet, so Pet reaches itself
    assert_eq!(pet.reachable, vec!["Pet", "User"]);

    let error = loaded.schema_detail("Error").unwrap();
    assert!(!error.metrics.circular_refs);
    assert_eq!(error.metrics.dependency_count, 0);
    assert!(error.reachable.is_empty());

    let report = loaded.compare("Pet", "User").unwrap();
    assert_eq!(report.shared, vec!["id", "name"]);
    // jaccard 2/4, both shared types agree
    assert_eq!(report.score, 70);

    let err = loaded.schema_detail("Ghost").unwrap_err();
    assert_eq!(err.code(), "schema_not_found");
}

#[tokio::test]
async fn analytics_summarise_the_document() {
    let loader = SpecLoader::new(LoaderConfig::default()).unwrap();
    let loaded = loader
        .load(&SpecSource::Inline(PETSTORE.to_string()))
        .await
        .unwrap();
    let analytics = compute_analytics(&loaded);

    assert_eq!(analytics.endpoints.total, 3);
    assert_eq!(analytics.endpoints.by_method["GET"], 1);
    assert_eq!(analytics.endpoints.by_method["PATCH"], 1);
    assert_eq!(analytics.endpoints.deprecated, 1);
    assert_eq!(analytics.endpoints.tag_usage["pets"], 2);
    assert_eq!(analytics.schemas.total, 3);
    assert_eq!(analytics.schemas.circular, vec!["Pet", "User"]);
    assert_eq!(analytics.schemas.cycle_groups, vec![vec!["Pet", "User"]]);
    assert_eq!(analytics.schemas.most_referenced.len(), 2);
    assert!(analytics.schemas.max_complexity >= analytics.schemas.most_complex[0].value);
}

#[tokio::test]
async fn oversized_sources_are_rejected_before_parsing() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir);
    let config = LoaderConfig {
        max_file_size: 64,
        ..Default::default()
    };
    let loader = SpecLoader::new(config).unwrap();

    let err = loader.load(&SpecSource::File(path)).await.unwrap_err();
    assert!(matches!(err, ExplorerError::TooLarge { limit: 64, .. }));
    assert_eq!(err.code(), "too_large");
    assert!(err.hint().is_some());

    let err = loader
        .load(&SpecSource::Inline(PETSTORE.to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerError::TooLarge { .. }));
}

#[tokio::test]
async fn missing_file_and_unknown_endpoint_errors() {
    let dir = TempDir::new().unwrap();
    let config = LoaderConfig {
        parse: ParseOptions::low_memory(),
        ..Default::default()
    };
    let loader = SpecLoader::new(config).unwrap();
    let err = loader
        .load(&SpecSource::File(dir.path().join("nope.json")))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "io_error");

    let loaded = loader
        .load(&SpecSource::Inline(PETSTORE.to_string()))
        .await
        .unwrap();
    let err = loaded.endpoint(HttpMethod::Get, "/nothing").unwrap_err();
    assert_eq!(err.code(), "endpoint_not_found");
    assert_eq!(err.to_string(), "Endpoint not found: GET /nothing");
}
