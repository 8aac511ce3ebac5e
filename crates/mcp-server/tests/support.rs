use anyhow::{Context, Result};
use rmcp::model::CallToolResult;
use std::path::PathBuf;

pub const PETSTORE: &str = r##"{
  "openapi": "3.0.3",
  "info": {"title": "Petstore", "version": "1.2.0"},
  "paths": {
    "/pets": {
      "get": {
        "summary": "List pets",
        "operationId": "listPets",
        "tags": ["pets"],
        "parameters": [{"name": "limit", "in": "query"}],
        "responses": {"200": {"description": "ok"}}
      },
      "post": {
        "summary": "Create a pet",
        "tags": ["pets"],
        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
        "responses": {"201": {"description": "created"}}
      }
    },
    "/users/{id}": {
      "patch": {
        "summary": "Update user profile",
        "tags": ["users"],
        "deprecated": true,
        "responses": {"200": {"description": "ok"}}
      }
    }
  },
  "components": {
    "schemas": {
      "Pet": {
        "type": "object",
        "required": ["id", "name"],
        "properties": {
          "id": {"type": "integer"},
          "name": {"type": "string"},
          "owner": {"$ref": "#/components/schemas/User"}
        }
      },
      "User": {
        "type": "object",
        "properties": {
          "id": {"type": "integer"},
          "name": {"type": "string"},
          "pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
        }
      }
    }
  }
}
"##;

#[allow(dead_code)]
pub fn locate_apiscope_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_apiscope-mcp") {
        return Ok(PathBuf::from(path));
    }

    // `.../target/{debug|release}/deps/<test>` → `.../target/{debug|release}/apiscope-mcp`
    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("apiscope-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/apiscope-mcp", "target/release/apiscope-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate apiscope-mcp binary; build with: cargo build -p apiscope-mcp")
}

/// First text block of a tool result, parsed as JSON
pub fn result_json(result: &CallToolResult) -> Result<serde_json::Value> {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .context("tool result missing text output")?;
    serde_json::from_str(text).context("tool output is not JSON")
}
