use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "contactdesk API",
        version = "0.1.0",
        description = "Contact-form intake: stores submissions and relays them to a spreadsheet and a chat destination.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::contact::submit_contact,
        crate::handlers::site::sitemap,
        crate::handlers::site::robots,
    ),
    components(
        schemas(
            crate::dto::ContactRequest,
            crate::dto::ContactResponse,
            crate::dto::RelayedDto,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "contact", description = "Contact form intake"),
        (name = "site", description = "Generated site files"),
    )
)]
pub struct ApiDoc;
