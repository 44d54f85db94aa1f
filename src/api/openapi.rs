//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, class_handler};
use crate::domain::{ClassDetails, ClassResponse, UserResponse, UserRole};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Class Scheduler API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Class Scheduler API",
        version = "0.1.0",
        description = "Session credentials and class enrollment for a multi-role scheduling application",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        class_handler::create_class,
        class_handler::list_classes,
        class_handler::enroll,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            ClassResponse,
            ClassDetails,
            MessageResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            class_handler::CreateClassRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Classes", description = "Class creation, listing and enrollment")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer session tokens
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /auth/register or /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
