use std::{convert::Infallible, sync::Arc};

use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::json;
use warp::{hyper::StatusCode, path, Filter, Rejection, Reply};

use crate::{
    error::PassError,
    pass::{Pass, PassInternal},
    types::{Employee, EmployeeID, NewEmployee, WalletResult},
};

/// `POST /employees` and `GET /employees/<emp_id>/wallet-pass`.
pub fn build_api_route_filter(
    pass: &Pass,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let create = path!("employees")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_pass_state(pass.internal.clone()))
        .and_then(create_employee);

    let reissue = path!("employees" / String / "wallet-pass")
        .and(warp::get())
        .and(with_pass_state(pass.internal.clone()))
        .and_then(reissue_wallet_pass);

    create.or(reissue)
}

pub async fn handle_pass_errors(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(pass_error) = err.find::<PassError>() {
        let (status, body) = match pass_error {
            PassError::InvalidEmployee(errors) => (StatusCode::BAD_REQUEST, json!(errors)),
            PassError::EmployeeAlreadyExists => (
                StatusCode::CONFLICT,
                json!({ "error": "an employee with that id already exists" }),
            ),
            PassError::EmployeeNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "employee not found" }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "an unknown error has occurred" }),
            ),
        };
        return Ok(warp::reply::with_status(warp::reply::json(&body), status));
    }

    Err(err)
}

#[derive(Debug, Serialize)]
pub struct CreateEmployeeResponse {
    pub employee: Employee,
    pub wallet_result: WalletResult,
}

async fn create_employee(
    input: NewEmployee,
    pass: Arc<PassInternal>,
) -> Result<impl Reply, Rejection> {
    let employee = input.validate().map_err(PassError::InvalidEmployee)?;

    pass.create_employee(&employee).await?;
    let wallet_result = pass.issue_pass(&employee).await;

    Ok(warp::reply::with_status(
        warp::reply::json(&CreateEmployeeResponse {
            employee,
            wallet_result,
        }),
        StatusCode::CREATED,
    ))
}

async fn reissue_wallet_pass(
    emp_id: String,
    pass: Arc<PassInternal>,
) -> Result<impl Reply, Rejection> {
    let emp_id = percent_decode_str(&emp_id).decode_utf8_lossy().into_owned();
    let employee = pass.retrieve_employee(&EmployeeID(emp_id)).await?;

    let wallet_result = pass.issue_pass(&employee).await;

    Ok(warp::reply::json(&wallet_result))
}

// functor that adds a reference to the internal pass state into the filter chain
fn with_pass_state(
    pass: Arc<PassInternal>,
) -> impl Filter<Extract = (Arc<PassInternal>,), Error = Infallible> + Clone {
    warp::any().map(move || pass.clone())
}
