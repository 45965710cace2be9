use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization tier attached to an account and copied into every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Recruiter,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Recruiter, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JobType {
    #[default]
    #[serde(rename = "full time")]
    FullTime,
    #[serde(rename = "part time")]
    PartTime,
    #[serde(rename = "internship")]
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Created,
    Applied,
    Selected,
    Rejected,
    Filled,
    Closed,
    Deleted,
}

/// Stored account. `password` holds the bcrypt digest, never the plaintext.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub role: Role,
}

/// Public view of a [`User`]; the digest is never serialized.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            gender: user.gender,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub role: Role,
}

/// Partial update; absent fields keep their stored value. Role is not editable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_page_size")]
    pub paginate: usize,
}

fn default_page_size() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Success envelope for login and refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub detail: String,
    pub token: String,
    pub role: Role,
    pub expiry: DateTime<Utc>,
    pub status: u16,
}

/// Plain `{detail, status}` envelope used for confirmations.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
    pub status: u16,
}

/// Identity facts asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: i64,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Wire form of an [`IdentityClaim`] inside the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: i64,
    pub created_by: i64,
    pub category: String,
    pub job_title: String,
    pub company_name: Option<String>,
    pub job_type: JobType,
    pub location: Option<String>,
    pub status: JobStatus,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JobResponse {
    pub id: i64,
    pub created_by: i64,
    pub category: String,
    pub job_title: String,
    pub company_name: Option<String>,
    pub job_type: JobType,
    pub location: Option<String>,
    pub status: JobStatus,
    pub description: Option<String>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            created_by: job.created_by,
            category: job.category.clone(),
            job_title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            job_type: job.job_type,
            location: job.location.clone(),
            status: job.status,
            description: job.description.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub category: String,
    pub job_title: String,
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobRequest {
    pub category: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub status: Option<JobStatus>,
    pub description: Option<String>,
}
