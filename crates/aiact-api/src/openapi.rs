// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};

use crate::errors::API_ERROR_CODES;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}
    })
}

fn tenant_header() -> Value {
    json!({"name": "x-organization-id", "in": "header", "required": true, "schema": {"type": "string", "maxLength": 64}})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let error_codes: Vec<&str> = API_ERROR_CODES.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "aiact compliance API",
        "version": "v1",
        "x-api-contract-version": "v1"
      },
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {
          "get": {
            "responses": {
              "200": {"description": "ready"},
              "503": error_response("store unavailable")
            }
          }
        },
        "/metrics": {"get": {"responses": {"200": {"description": "prometheus metrics"}}}},
        "/v1/version": {"get": {"responses": {"200": {"description": "service, api and policy version"}}}},
        "/v1/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}},
        "/v1/systems/{system_id}/certification": {
          "get": {
            "parameters": [
              tenant_header(),
              {"name": "system_id", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {
                "description": "compliance projection recomputed at read time",
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/CertificationProjection"}}}
              },
              "400": error_response("missing tenant or invalid system id"),
              "404": error_response("system not found for tenant"),
              "503": error_response("store unavailable")
            }
          }
        },
        "/v1/systems/{system_id}/certificate": {
          "post": {
            "parameters": [
              tenant_header(),
              {"name": "system_id", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "201": {"description": "certificate issued"},
              "400": error_response("missing tenant or invalid system id"),
              "404": error_response("system not found for tenant"),
              "422": error_response("system does not qualify"),
              "503": error_response("store unavailable")
            }
          }
        },
        "/v1/certificates/{cert_id}": {
          "get": {
            "parameters": [
              tenant_header(),
              {"name": "cert_id", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "stored certificate with expired flag"},
              "400": error_response("missing tenant or invalid certificate id"),
              "404": error_response("certificate not found")
            }
          }
        },
        "/v1/certificates/{cert_id}/pdf": {
          "get": {
            "parameters": [
              tenant_header(),
              {"name": "cert_id", "in": "path", "required": true, "schema": {"type": "string"}},
              {"name": "disposition", "in": "query", "schema": {"type": "string", "enum": ["inline", "attachment"]}}
            ],
            "responses": {
              "200": {"description": "certificate PDF; expired certificates are stamped and unknown ids render a placeholder", "content": {"application/pdf": {}}},
              "400": error_response("missing tenant or invalid query parameter"),
              "503": error_response("store unavailable")
            }
          }
        },
        "/v1/badges/{cert_id}": {
          "get": {
            "parameters": [
              {"name": "cert_id", "in": "path", "required": true, "schema": {"type": "string"}},
              {"name": "style", "in": "query", "schema": {"type": "string", "enum": ["standard", "compact", "detailed"]}}
            ],
            "responses": {
              "200": {"description": "badge SVG; placeholder for unknown or expired certificates", "content": {"image/svg+xml": {}}}
            }
          }
        },
        "/v1/documents/pdf": {
          "post": {
            "parameters": [tenant_header()],
            "requestBody": {
              "required": true,
              "content": {"application/json": {"schema": {"$ref": "#/components/schemas/DocumentRequest"}}}
            },
            "responses": {
              "200": {"description": "document PDF", "content": {"application/pdf": {}}},
              "400": error_response("invalid document request"),
              "413": error_response("request body too large")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiErrorCode": {"type": "string", "enum": error_codes},
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object"},
              "request_id": {"type": "string"}
            }
          },
          "CertificationProjection": {
            "type": "object",
            "required": [
              "agent_id", "compliance_score", "certification_level", "certification_status",
              "requirements", "checks", "bonus_points", "certification"
            ],
            "additionalProperties": false,
            "properties": {
              "agent_id": {"type": "string"},
              "compliance_score": {"type": "integer", "minimum": 0, "maximum": 100},
              "certification_level": {"type": "string", "enum": ["none", "bronze", "silver", "gold"]},
              "certification_status": {"type": "string", "enum": ["not_applicable", "not_eligible", "pending", "eligible", "certified"]},
              "requirements": {
                "type": "object",
                "properties": {
                  "total": {"type": "integer"},
                  "completed": {"type": "integer"},
                  "percentage": {"type": "integer", "minimum": 0, "maximum": 100}
                }
              },
              "checks": {
                "type": "object",
                "properties": {
                  "sdk_connected": {"type": "boolean"},
                  "hitl_rules_active": {"type": "boolean"},
                  "no_open_incidents": {"type": "boolean"},
                  "logging_active": {"type": "boolean"}
                }
              },
              "bonus_points": {"type": "integer", "minimum": 0},
              "certification": {
                "type": "object",
                "nullable": true,
                "properties": {
                  "cert_id": {"type": "string", "nullable": true},
                  "valid_until": {"type": "string", "format": "date-time"},
                  "next_verification_at": {"type": "string", "format": "date-time"}
                }
              }
            }
          },
          "DocumentRequest": {
            "type": "object",
            "required": ["title"],
            "additionalProperties": false,
            "properties": {
              "title": {"type": "string", "maxLength": 200},
              "sections": {
                "type": "array",
                "maxItems": 100,
                "items": {
                  "type": "object",
                  "required": ["heading"],
                  "properties": {
                    "heading": {"type": "string"},
                    "body": {"type": "string", "nullable": true}
                  }
                }
              }
            }
          }
        }
      }
    })
}
