//! Public account endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, PasswordResetRequest, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(register, login, verify_email, request_password_reset, reset_password),
    components(
        schemas(
            RegisterRequest, RegisterResponse, UserResponse, LoginRequest, LoginResponse,
            PasswordResetRequest, ResetPasswordRequest, MessageResponse
        ),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration, login and password recovery")
    )
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify/{token}", get(verify_email))
        .route("/password/reset", post(request_password_reset))
        .route("/password/reset/{token}", post(reset_password))
        .with_state(shared_service)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; verification email sent", body = RegisterResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Check your email to verify your account."
                .to_string(),
            user,
        }),
    ))
}

/// Log in and receive an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    Ok(Json(service.login(input).await?))
}

/// Confirm an email address
#[utoipa::path(
    get,
    path = "/verify/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "Verification token from the email")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Unknown token"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn verify_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(token): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    service.verify_email(&token).await?;
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Ask for a password reset link
#[utoipa::path(
    post,
    path = "/password/reset",
    tag = "Users",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn request_password_reset<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<PasswordResetRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.request_password_reset(&input.email).await?;
    Ok(Json(MessageResponse::new(
        "If the account exists, a password reset link has been sent",
    )))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/password/reset/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "Reset token from the email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Unknown or expired token, or invalid password"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reset_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(token): Path<String>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.reset_password(&token, input).await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}
