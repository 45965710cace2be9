use crate::errors::ApiError;
use crate::guard::{require_owner, Authenticated};
use crate::models::{CreateUserRequest, DetailResponse, Pagination, UpdateUserRequest, User, UserResponse};
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};

const NAME_MAX: usize = 255;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 255;
const PHONE_MAX_CREATE: usize = 32;
const PHONE_MAX_UPDATE: usize = 20;

pub(crate) fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min {
        return Err(ApiError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_opt(field: &str, value: Option<&str>, min: usize, max: usize) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| check_len(field, v, min, max))
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        check_len("username", &self.username, 1, NAME_MAX)?;
        check_len("password", &self.password, PASSWORD_MIN, PASSWORD_MAX)?;
        check_len("first_name", &self.first_name, 1, NAME_MAX)?;
        check_opt("last_name", self.last_name.as_deref(), 0, NAME_MAX)?;
        check_opt("phone", self.phone.as_deref(), 0, PHONE_MAX_CREATE)
    }
}

impl UpdateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        check_opt("username", self.username.as_deref(), 0, NAME_MAX)?;
        check_opt("password", self.password.as_deref(), PASSWORD_MIN, PASSWORD_MAX)?;
        check_opt("first_name", self.first_name.as_deref(), 0, NAME_MAX)?;
        check_opt("last_name", self.last_name.as_deref(), 0, NAME_MAX)?;
        check_opt("phone", self.phone.as_deref(), 0, PHONE_MAX_UPDATE)
    }
}

/// Empty strings count as "not supplied", as in a form left blank.
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Digests on the blocking pool; bcrypt is deliberately slow.
async fn digest(state: &web::Data<AppState>, plaintext: String) -> Result<String, ApiError> {
    let hasher = state.passwords;
    Ok(web::block(move || hasher.digest(&plaintext)).await??)
}

#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let session = state.store.session().await;
    let users: Vec<UserResponse> = session
        .users(page.skip, page.paginate)
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

#[post("")]
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    let password = digest(&state, req.password).await?;

    let mut session = state.store.session().await;
    if session.user_by_username(&req.username).is_some() {
        return Err(ApiError::UsernameExists);
    }

    let user = session.insert_user(User {
        id: 0,
        username: req.username,
        password,
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        gender: req.gender,
        role: req.role,
    });
    tracing::info!(user_id = user.id, role = %user.role, "user created");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[get("/{user_id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let session = state.store.session().await;
    let user = session.user(user_id).ok_or(ApiError::NotFound("User"))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/{user_id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    Authenticated(claim): Authenticated,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    require_owner(&claim, user_id, "user")?;

    let req = body.into_inner();
    req.validate()?;

    let password = match supplied(req.password) {
        Some(plaintext) => Some(digest(&state, plaintext).await?),
        None => None,
    };

    let mut session = state.store.session().await;
    if session.user(user_id).is_none() {
        return Err(ApiError::NotFound("User"));
    }

    let username = supplied(req.username);
    if let Some(name) = &username {
        if session.user_by_username(name).is_some_and(|u| u.id != user_id) {
            return Err(ApiError::UsernameNotAvailable);
        }
    }

    let user = session.user_mut(user_id).ok_or(ApiError::NotFound("User"))?;
    if let Some(v) = username {
        user.username = v;
    }
    if let Some(v) = password {
        user.password = v;
    }
    if let Some(v) = supplied(req.first_name) {
        user.first_name = v;
    }
    if let Some(v) = supplied(req.last_name) {
        user.last_name = Some(v);
    }
    if let Some(v) = supplied(req.phone) {
        user.phone = Some(v);
    }
    if let Some(v) = req.gender {
        user.gender = v;
    }
    tracing::info!(user_id, "user updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(&*user)))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    Authenticated(claim): Authenticated,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    require_owner(&claim, user_id, "user")?;

    let mut session = state.store.session().await;
    session.remove_user(user_id).ok_or(ApiError::NotFound("User"))?;
    tracing::info!(user_id, "user deleted");

    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: format!("User id: {user_id} deleted successfully!"),
        status: 200,
    }))
}
