//! OpenAPI document and Swagger UI page
//!
//! `basicAuth` is declared on every car operation for client generators.
//! The server itself does not check credentials.

use axum::{
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

const SWAGGER_UI_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Cars API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

fn car_example() -> Value {
    json!({ "id": 1, "name": "Toyota", "price": 20500 })
}

fn car_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name", "price"],
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" },
            "price": { "type": "number" }
        }
    })
}

fn single_car_responses(summary: &str) -> Value {
    json!({
        "200": {
            "description": summary,
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "properties": { "car": { "$ref": "#/components/schemas/Car" } }
                    },
                    "example": { "car": car_example() }
                }
            }
        },
        "401": { "description": "Unauthorized" },
        "404": { "description": "Not found" },
        "500": { "description": "Some server error" },
        "503": { "description": "Database not ready" }
    })
}

/// The OpenAPI 3.0 description of the car endpoints
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Cars API", "version": "1.0.0" },
        "tags": [{ "name": "Cars API", "description": "Cars API" }],
        "components": {
            "securitySchemes": {
                "basicAuth": { "type": "http", "scheme": "basic" }
            },
            "schemas": { "Car": car_schema() }
        },
        "paths": {
            "/cars": {
                "get": {
                    "security": [{ "basicAuth": [] }],
                    "summary": "A list of cars",
                    "tags": ["cars"],
                    "responses": {
                        "200": {
                            "description": "A list of cars",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "cars": {
                                                "type": "array",
                                                "items": { "$ref": "#/components/schemas/Car" }
                                            }
                                        }
                                    },
                                    "example": { "cars": [
                                        car_example(),
                                        { "id": 2, "name": "BMW", "price": 47000 },
                                        { "id": 3, "name": "Volvo", "price": 52100 },
                                        { "id": 4, "name": "Tesla", "price": 63900 }
                                    ] }
                                }
                            }
                        },
                        "401": { "description": "Unauthorized" },
                        "500": { "description": "Some server error" },
                        "503": { "description": "Database not ready" }
                    }
                }
            },
            "/car/{id}": {
                "get": {
                    "security": [{ "basicAuth": [] }],
                    "summary": "A single car by id",
                    "tags": ["car"],
                    "parameters": [{
                        "in": "path",
                        "name": "id",
                        "schema": { "type": "integer" },
                        "required": true,
                        "description": "Car id"
                    }],
                    "responses": single_car_responses("A single car by id")
                }
            },
            "/price/{name}": {
                "get": {
                    "security": [{ "basicAuth": [] }],
                    "summary": "Car's price by car name",
                    "tags": ["car"],
                    "parameters": [{
                        "in": "path",
                        "name": "name",
                        "schema": { "type": "string" },
                        "required": true,
                        "description": "Car name"
                    }],
                    "responses": single_car_responses("Car's price by car name")
                }
            }
        }
    })
}

/// GET /docs
async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// GET /docs/openapi.json
async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

/// Documentation routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/docs", get(swagger_ui))
        .route("/docs/openapi.json", get(openapi))
}
