use crate::routes::{items, report, root, search};
use common_services::api::items::interfaces::CategoriesResponse;
use common_services::api::report::interfaces::{ReportFoundRequest, ReportFoundResponse};
use common_services::api::search::interfaces::{SearchLostRequest, SearchResponse};
use common_types::{ItemCategory, ItemRecord, ItemStatus, MatchResult, MatchScores};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        root::handlers::get_categories,
        // Item handlers
        items::handlers::list_found_items_handler,
        items::handlers::get_item_handler,
        report::handlers::report_found_handler,
        // Search handlers
        search::handlers::search_lost_handler,
    ),
    components(
        schemas(
            ItemCategory,
            ItemStatus,
            ItemRecord,
            MatchScores,
            MatchResult,
            CategoriesResponse,
            ReportFoundRequest,
            ReportFoundResponse,
            SearchLostRequest,
            SearchResponse,
        ),
    ),
    tags(
        (name = "Lost & Found", description = "Lost & Found matching API"),
        (name = "Items", description = "Reporting and browsing found items"),
        (name = "Search", description = "Matching a lost item against found items"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;
