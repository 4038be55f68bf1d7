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
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        courses::{BulkCreateCoursesRequest, CourseList, CreateCourseRequest, UpdatePriceRequest},
        orders::{
            CheckoutRequest, CheckoutResponse, OwnershipResponse, PurchasedCourses,
            TransactionList,
        },
        reviews::{AddReviewRequest, ReviewList},
        wishlist::{ToggleWishlistRequest, WishlistCourseList, WishlistState},
    },
    models::{Course, Review, Transaction, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, courses, health, orders, params, reviews, wishlist},
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
        auth::login,
        auth::register,
        courses::list_courses,
        courses::get_course,
        reviews::list_reviews,
        reviews::add_review,
        wishlist::list_wishlist,
        wishlist::toggle_wishlist,
        orders::checkout,
        orders::list_my_orders,
        orders::purchased,
        orders::owned,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::confirm_order,
        admin::create_course,
        admin::bulk_create_courses,
        admin::update_course_price,
        admin::delete_course,
        admin::reset_catalog
    ),
    components(
        schemas(
            User,
            Course,
            Transaction,
            Review,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCourseRequest,
            BulkCreateCoursesRequest,
            UpdatePriceRequest,
            CourseList,
            CheckoutRequest,
            CheckoutResponse,
            TransactionList,
            PurchasedCourses,
            OwnershipResponse,
            AddReviewRequest,
            ReviewList,
            ToggleWishlistRequest,
            WishlistState,
            WishlistCourseList,
            params::Pagination,
            params::CourseQuery,
            Meta,
            ApiResponse<Course>,
            ApiResponse<CourseList>,
            ApiResponse<Transaction>,
            ApiResponse<TransactionList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<ReviewList>,
            ApiResponse<WishlistState>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Courses", description = "Public catalog endpoints"),
        (name = "Reviews", description = "Course review endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Orders", description = "Checkout and purchase endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
