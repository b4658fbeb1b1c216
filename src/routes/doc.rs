use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ChangePasswordRequest, ForgotPasswordRequest, LoginKind, LoginRequest, LoginResponse,
            ResetPasswordRequest, SignupRequest, VerifyOtpRequest,
        },
        media::{CreateMediaRequest, MediaList},
        panier::{
            AddToPanierRequest, AddToPanierResponse, PanierItemDto, PanierList, PanierView,
            UpdatePanierItemRequest,
        },
        properties::{
            AverageSurfaces, PropertiesByType, PropertyList, UpdatePropertyRequest,
        },
        roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
        users::{AssignRoleRequest, CountResponse, UpdateUserRequest, UserList},
    },
    models::{
        BienPanier, Building, Characteristics, Description, Energy, EnergyDiagnostics, Heating,
        Location, Media, Orientation, Panier, Price, Property, PropertyDraft, Role, Room,
        SurfaceEntry, SurfaceKind, Surfaces, User,
    },
    response::{ApiResponse, Meta},
    routes::{auth, health, media, panier, params, properties, roles, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::verify_email_otp,
        auth::login,
        auth::change_password,
        auth::forgot_password,
        auth::reset_password,
        auth::logout,
        users::list_users,
        users::count_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::list_user_properties,
        users::list_user_roles,
        users::assign_role,
        users::revoke_role,
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        properties::list_properties,
        properties::count_properties,
        properties::get_property,
        properties::create_property,
        properties::update_property,
        properties::delete_property,
        properties::get_surfaces,
        properties::search_by_rooms,
        properties::search_by_surface,
        properties::search_by_characteristics,
        properties::properties_by_type,
        properties::average_surfaces,
        properties::list_media,
        properties::add_media,
        media::get_media,
        media::delete_media,
        panier::get_panier,
        panier::add_to_panier,
        panier::update_item_status,
        panier::remove_from_panier,
        panier::list_paniers
    ),
    components(
        schemas(
            User,
            Role,
            Media,
            Panier,
            BienPanier,
            Location,
            Surfaces,
            Price,
            Description,
            Room,
            Characteristics,
            Orientation,
            Heating,
            Energy,
            Building,
            EnergyDiagnostics,
            Property,
            PropertyDraft,
            SurfaceKind,
            SurfaceEntry,
            SignupRequest,
            LoginKind,
            LoginRequest,
            LoginResponse,
            VerifyOtpRequest,
            ChangePasswordRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            UpdateUserRequest,
            AssignRoleRequest,
            CountResponse,
            UserList,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleList,
            CreateMediaRequest,
            MediaList,
            AddToPanierRequest,
            UpdatePanierItemRequest,
            PanierItemDto,
            PanierView,
            AddToPanierResponse,
            PanierList,
            UpdatePropertyRequest,
            PropertyList,
            PropertiesByType,
            AverageSurfaces,
            params::Pagination,
            Meta,
            ApiResponse<Property>,
            ApiResponse<PropertyList>,
            ApiResponse<User>,
            ApiResponse<PanierView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup, OTP verification, login and password endpoints"),
        (name = "Users", description = "User endpoints"),
        (name = "Roles", description = "Role endpoints"),
        (name = "Properties", description = "Property listing, search and statistics endpoints"),
        (name = "Media", description = "Property media endpoints"),
        (name = "Panier", description = "Panier endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
