use axum::extract::Path;
use axum::Json;
use routedoc_core::{
    AppBuilder, AppConfig, HttpError, OperationDetail, Route, SchemaNode, ValidationHooks,
};
use routedoc_openapi::SwaggerPlugin;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A pet in the store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct Pet {
    id: u64,
    name: String,
    tag: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NewPet {
    name: String,
    tag: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PetPath {
    id: u64,
}

async fn list_pets() -> Json<Vec<Pet>> {
    Json(vec![Pet {
        id: 1,
        name: "Rex".into(),
        tag: Some("dog".into()),
    }])
}

async fn create_pet(Json(new_pet): Json<NewPet>) -> Json<Pet> {
    Json(Pet {
        id: 2,
        name: new_pet.name,
        tag: new_pet.tag,
    })
}

async fn get_pet(Path(PetPath { id }): Path<PetPath>) -> Result<Json<Pet>, HttpError> {
    if id != 1 {
        return Err(HttpError::NotFound(format!("pet {id}")));
    }
    Ok(Json(Pet {
        id,
        name: "Rex".into(),
        tag: Some("dog".into()),
    }))
}

async fn health() -> &'static str {
    "OK"
}

async fn favicon() -> &'static str {
    ""
}

#[tokio::main]
async fn main() {
    routedoc_core::init_tracing();

    let config = AppConfig::load("dev").unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to empty configuration");
        AppConfig::empty()
    });
    let addr: String = config
        .get("server.addr")
        .unwrap_or_else(|_| "0.0.0.0:3001".to_string());

    let swagger = match SwaggerPlugin::from_app_config(&config) {
        Ok(plugin) => plugin,
        Err(err) => {
            tracing::error!(error = %err, "invalid swagger configuration");
            std::process::exit(1);
        }
    };

    let pets = OperationDetail::new().tag("pets");
    let app = AppBuilder::new()
        .define("Pet", SchemaNode::of::<Pet>())
        .route(
            Route::get("/pets").hooks(
                ValidationHooks::new()
                    .response(SchemaNode::array(SchemaNode::reference("Pet")))
                    .detail(pets.clone().summary("List pets")),
            ),
            list_pets,
        )
        .route(
            Route::post("/pets").hooks(
                ValidationHooks::new()
                    .body(SchemaNode::of::<NewPet>())
                    .response(SchemaNode::reference("Pet"))
                    .detail(pets.clone().summary("Create a pet")),
            ),
            create_pet,
        )
        .route(
            Route::get("/pets/{id}").hooks(
                ValidationHooks::new()
                    .params(SchemaNode::of::<PetPath>())
                    .response_status(200, SchemaNode::reference("Pet"))
                    .response_status(404, SchemaNode::any().describe("Pet not found"))
                    .detail(pets.summary("Fetch a pet")),
            ),
            get_pet,
        )
        .route(Route::get("/health"), health)
        .route(Route::get("/favicon.ico"), favicon)
        .route(Route::get("/internal/metrics"), health)
        .with(swagger)
        .build()
        .layer(routedoc_core::default_trace());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, addr = %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %addr, "listening");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server error");
    }
}
