use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    AssignmentStatus, AttendanceRecord, Exercise, ExerciseCategory, GymClass, InventoryItem,
    Invoice, InvoiceStatus, Routine, RoutineAssignment, RoutineLevel,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::login,
        handlers::auth::me,
        handlers::member::list_members,
        handlers::member::count_members,
        handlers::member::active_members,
        handlers::member::expiring_members,
        handlers::member::member_stats,
        handlers::member::get_member,
        handlers::member::create_member,
        handlers::member::update_member,
        handlers::member::delete_member,
        handlers::attendance::list_attendance,
        handlers::attendance::member_attendance,
        handlers::attendance::check_in,
        handlers::attendance::check_out,
        handlers::attendance::delete_attendance,
        handlers::invoice::list_invoices,
        handlers::invoice::get_invoice,
        handlers::invoice::create_invoice,
        handlers::invoice::update_invoice,
        handlers::invoice::delete_invoice,
        handlers::inventory::list_items,
        handlers::inventory::get_item,
        handlers::inventory::create_item,
        handlers::inventory::update_item,
        handlers::inventory::delete_item,
        handlers::class::list_classes,
        handlers::class::count_classes,
        handlers::class::get_class,
        handlers::class::create_class,
        handlers::class::update_class,
        handlers::class::delete_class,
        handlers::exercise::list_categories,
        handlers::exercise::list_exercises,
        handlers::exercise::exercises_by_category,
        handlers::exercise::create_exercise,
        handlers::routine::list_routines,
        handlers::routine::routine_stats,
        handlers::routine::get_routine,
        handlers::routine::create_routine,
        handlers::routine::update_routine,
        handlers::routine::delete_routine,
        handlers::routine::add_day,
        handlers::routine::duplicate_routine,
        handlers::routine::assign_routine,
        handlers::routine::client_assignments,
        handlers::routine::pause_assignment,
        handlers::routine::resume_assignment,
        handlers::report::dashboard,
        handlers::report::income,
        handlers::report::attendance,
    ),
    components(
        schemas(
            ApiError,
            CountResponse,
            Role,
            LoginRequest,
            LoginResponse,
            CurrentUserResponse,
            MemberResponse,
            CreateMemberRequest,
            UpdateMemberRequest,
            RoleCount,
            MemberStats,
            AttendanceRecord,
            AttendanceResponse,
            CheckInRequest,
            Invoice,
            InvoiceStatus,
            CreateInvoiceRequest,
            UpdateInvoiceRequest,
            InventoryItem,
            CreateInventoryItemRequest,
            UpdateInventoryItemRequest,
            GymClass,
            CreateClassRequest,
            UpdateClassRequest,
            ExerciseCategory,
            Exercise,
            CreateExerciseRequest,
            Routine,
            RoutineLevel,
            RoutineDetail,
            RoutineDayDetail,
            RoutineExerciseDetail,
            CreateRoutineRequest,
            UpdateRoutineRequest,
            RoutineDayInput,
            RoutineExerciseInput,
            AssignRoutineRequest,
            RoutineAssignment,
            AssignmentStatus,
            AssignmentResponse,
            StatusCount,
            RoutineStats,
            DashboardStats,
            IncomeReport,
            DailyAttendance,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Login and current account"),
        (name = "members", description = "Accounts of clients and staff"),
        (name = "attendance", description = "Gym entries and exits"),
        (name = "invoices", description = "Billing"),
        (name = "inventory", description = "Equipment and stock"),
        (name = "classes", description = "Group classes"),
        (name = "exercises", description = "Exercise catalog"),
        (name = "routines", description = "Training routines and assignments"),
        (name = "reports", description = "Dashboard and reports"),
    ),
    info(
        title = "Gym Backend API",
        version = "1.0.0",
        description = "Gym management REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_protected_and_public_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/auth/login"));
        assert!(doc.paths.paths.contains_key("/routines/{id}/assign"));
        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
