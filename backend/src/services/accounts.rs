//! Registration and role management for user accounts.

use crate::{
    error::AppError,
    identity::VerifiedIdentity,
    models::{
        company::Company,
        user::{head_of_title, RegisterPayload, UpdateProfilePayload, User, UserRole},
    },
    repositories::{CompanyRepository, UserRepository},
    types::UserId,
    utils::{generate_company_code, normalize_company_code},
};

const MAX_CODE_ATTEMPTS: usize = 10;

#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub company: Company,
    pub created_company: bool,
}

impl Registration {
    pub fn message(&self) -> String {
        if self.created_company {
            format!(
                "Company created successfully. Your company code is {}",
                self.company.company_code
            )
        } else {
            format!("Registration successful. Welcome to {}", self.company.name)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn unique_company_code(companies: &dyn CompanyRepository) -> Result<String, AppError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_company_code();
        if companies.find_by_code(&code).await?.is_none() {
            return Ok(code);
        }
    }
    Err(anyhow::anyhow!("could not generate a unique company code").into())
}

/// Stores the profile for a verified identity, founding a new company or
/// joining an existing one by code.
pub async fn register(
    users: &dyn UserRepository,
    companies: &dyn CompanyRepository,
    identity: &VerifiedIdentity,
    payload: RegisterPayload,
) -> Result<Registration, AppError> {
    let uid = UserId::from(identity.uid.as_str());
    if users.find_by_id(&uid).await?.is_some() {
        return Err(AppError::Conflict("User already registered".into()));
    }

    let full_name = non_blank(payload.full_name).or_else(|| non_blank(identity.name.clone()));
    let email = non_blank(payload.email).or_else(|| non_blank(identity.email.clone()));
    let (Some(full_name), Some(email)) = (full_name, email) else {
        return Err(AppError::BadRequest("Full name and email are required".into()));
    };

    let (company, role, department, created_company) = if payload.is_creating_company {
        let name = non_blank(payload.company_name)
            .ok_or_else(|| AppError::BadRequest("Company name is required".into()))?;
        let company = Company::new(name, unique_company_code(companies).await?);
        let company = companies.create(&company).await?;
        tracing::info!(company_id = %company.id, "company created");
        let department = non_blank(payload.department);
        (company, UserRole::SuperAdmin, department, true)
    } else {
        let code = normalize_company_code(payload.company_code)?;
        let company = companies
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid company code".into()))?;
        let department = non_blank(payload.department)
            .ok_or_else(|| AppError::BadRequest("Department is required".into()))?;
        if !company.settings.has_department(&department) {
            return Err(AppError::BadRequest("Invalid department".into()));
        }
        (company, UserRole::User, Some(department), false)
    };

    let user = User::new(
        uid,
        company.id.clone(),
        email,
        full_name,
        role,
        department,
        non_blank(payload.job_title),
        company.settings.default_leave_balance(),
    );
    let user = users.create(&user).await?;
    tracing::info!(user_id = %user.id, company_id = %company.id, role = user.role.as_str(), "user registered");

    Ok(Registration {
        user,
        company,
        created_company,
    })
}

/// Applies a role change. Demotion to `user` clears department and title
/// unless new values are given; `admin` needs a department and defaults the
/// title to "Head of <Department>".
pub fn change_role(
    user: &mut User,
    role: UserRole,
    department: Option<String>,
    job_title: Option<String>,
) -> Result<(), AppError> {
    let department = non_blank(department);
    let job_title = non_blank(job_title);

    match role {
        UserRole::User => {
            user.department = department;
            user.job_title = job_title;
        }
        UserRole::Admin => {
            let department = department
                .or_else(|| user.department.clone())
                .ok_or_else(|| AppError::BadRequest("Department is required for admin role".into()))?;
            user.job_title = Some(job_title.unwrap_or_else(|| head_of_title(&department)));
            user.department = Some(department);
        }
        UserRole::SuperAdmin => {
            if department.is_some() {
                user.department = department;
            }
            if job_title.is_some() {
                user.job_title = job_title;
            }
        }
    }
    user.role = role;
    Ok(())
}

/// Promotes a plain user to department admin.
pub fn promote(user: &mut User, department: &str) -> Result<(), AppError> {
    if user.role != UserRole::User {
        return Err(AppError::BadRequest(
            "User is already an admin or super admin".into(),
        ));
    }
    change_role(user, UserRole::Admin, Some(department.to_string()), None)
}

pub fn update_profile(user: &mut User, payload: UpdateProfilePayload) {
    if let Some(department) = payload.department {
        user.department = non_blank(Some(department));
    }
    if let Some(job_title) = payload.job_title {
        user.job_title = non_blank(Some(job_title));
    }
}
