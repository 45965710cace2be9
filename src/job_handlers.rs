use crate::errors::ApiError;
use crate::guard::{require_owner, require_role, Authenticated};
use crate::models::{CreateJobRequest, DetailResponse, Job, JobResponse, JobStatus, Pagination, Role, UpdateJobRequest};
use crate::user_handlers::check_len;
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};

#[get("")]
pub async fn list_jobs(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let session = state.store.session().await;
    let jobs: Vec<JobResponse> = session
        .jobs(page.skip, page.paginate)
        .into_iter()
        .map(JobResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{job_id}")]
pub async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let session = state.store.session().await;
    let job = session.job(path.into_inner()).ok_or(ApiError::NotFound("Job"))?;
    Ok(HttpResponse::Ok().json(JobResponse::from(job)))
}

/// Only recruiters post jobs.
#[post("")]
pub async fn create_job(
    state: web::Data<AppState>,
    Authenticated(claim): Authenticated,
    body: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    require_role(&claim, Role::Recruiter)?;

    let req = body.into_inner();
    check_len("category", &req.category, 1, 255)?;
    check_len("job_title", &req.job_title, 1, 255)?;

    let mut session = state.store.session().await;
    let job = session.insert_job(Job {
        id: 0,
        created_by: claim.user_id,
        category: req.category,
        job_title: req.job_title,
        company_name: req.company_name,
        job_type: req.job_type,
        location: req.location,
        status: JobStatus::Created,
        description: req.description,
    });
    tracing::info!(job_id = job.id, created_by = job.created_by, "job created");

    Ok(HttpResponse::Created().json(JobResponse::from(job)))
}

#[put("/{job_id}")]
pub async fn update_job(
    state: web::Data<AppState>,
    Authenticated(claim): Authenticated,
    path: web::Path<i64>,
    body: web::Json<UpdateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();
    let req = body.into_inner();
    if let Some(v) = &req.category {
        check_len("category", v, 1, 255)?;
    }
    if let Some(v) = &req.job_title {
        check_len("job_title", v, 1, 255)?;
    }

    let mut session = state.store.session().await;
    let job = session.job_mut(job_id).ok_or(ApiError::NotFound("Job"))?;
    require_owner(&claim, job.created_by, "job")?;

    if let Some(v) = req.category {
        job.category = v;
    }
    if let Some(v) = req.job_title {
        job.job_title = v;
    }
    if let Some(v) = req.company_name {
        job.company_name = Some(v);
    }
    if let Some(v) = req.job_type {
        job.job_type = v;
    }
    if let Some(v) = req.location {
        job.location = Some(v);
    }
    if let Some(v) = req.status {
        job.status = v;
    }
    if let Some(v) = req.description {
        job.description = Some(v);
    }
    tracing::info!(job_id, "job updated");

    Ok(HttpResponse::Ok().json(JobResponse::from(&*job)))
}

#[delete("/{job_id}")]
pub async fn delete_job(
    state: web::Data<AppState>,
    Authenticated(claim): Authenticated,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();

    let mut session = state.store.session().await;
    let owner = session.job(job_id).map(|j| j.created_by).ok_or(ApiError::NotFound("Job"))?;
    require_owner(&claim, owner, "job")?;
    session.remove_job(job_id);
    tracing::info!(job_id, "job deleted");

    Ok(HttpResponse::Ok().json(DetailResponse {
        detail: format!("Job id: {job_id} deleted successfully!"),
        status: 200,
    }))
}
