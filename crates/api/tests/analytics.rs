mod common;

use async_graphql::{Request, Variables};
use common::{has_error_code, setup_seeded};
use serde_json::json;

#[tokio::test]
async fn employee_pnl_reduces_the_ledger() {
    let ctx = setup_seeded().await;
    let analyst = ctx.seeded.employee_named("Kevin Park").unwrap().clone();

    let query = r#"
        query Pnl($employeeId: ID!) {
            directory {
                employeePnl(employeeId: $employeeId) {
                    records { year attributedRevenue totalCost }
                    summary { totalRevenue totalCost netProfit yearsCount }
                }
            }
        }
    "#;
    let vars = Variables::from_json(json!({ "employeeId": analyst.id.to_string() }));
    let resp = ctx.schema.execute(Request::new(query).variables(vars)).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let payload = resp.data.into_json().unwrap()["directory"]["employeePnl"].clone();

    let records = payload["records"].as_array().unwrap().clone();
    assert!(!records.is_empty());
    // Ascending by year, starting at the hire year.
    assert_eq!(records[0]["year"], 2022);
    let years: Vec<i64> = records
        .iter()
        .map(|r| r["year"].as_i64().unwrap())
        .collect();
    let mut sorted = years.clone();
    sorted.sort_unstable();
    assert_eq!(years, sorted);

    let summary = payload["summary"].clone();
    let revenue_sum: i64 = records
        .iter()
        .map(|r| r["attributedRevenue"].as_i64().unwrap())
        .sum();
    let cost_sum: i64 = records
        .iter()
        .map(|r| r["totalCost"].as_i64().unwrap())
        .sum();
    assert_eq!(summary["totalRevenue"].as_i64().unwrap(), revenue_sum);
    assert_eq!(summary["totalCost"].as_i64().unwrap(), cost_sum);
    assert_eq!(
        summary["netProfit"].as_i64().unwrap(),
        revenue_sum - cost_sum
    );
    assert_eq!(summary["yearsCount"].as_i64().unwrap(), records.len() as i64);
    ctx.cleanup().await;
}

#[tokio::test]
async fn upserted_records_carry_the_roi_formula() {
    let ctx = setup_seeded().await;
    let create = r#"
        mutation Create($input: NewEmployeeInput!) {
            directory {
                createEmployee(input: $input) {
                    id
                }
            }
        }
    "#;
    let vars = Variables::from_json(json!({
        "input": {
            "name": "Fresh Hire",
            "title": "Consultant",
            "department": "Advisory",
            "email": "fresh.hire@company.com",
            "hireDate": "2023-01-01",
            "salary": 70000,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(create).variables(vars))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let employee_id = resp.data.into_json().unwrap()["directory"]["createEmployee"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let upsert = r#"
        mutation Upsert($input: PnlRecordInput!) {
            directory {
                upsertPnlRecord(input: $input) {
                    year
                    attributedRevenue
                    totalCost
                    netProfit
                    roi
                }
            }
        }
    "#;
    let vars = Variables::from_json(json!({
        "input": {
            "employeeId": employee_id,
            "year": 2023,
            "attributedRevenue": 150,
            "totalCost": 100,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(upsert).variables(vars))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let record = resp.data.into_json().unwrap()["directory"]["upsertPnlRecord"].clone();
    assert_eq!(record["netProfit"], 50);
    assert_eq!(record["roi"], 50.0);

    // Same employee and year replaces the row instead of adding one.
    let vars = Variables::from_json(json!({
        "input": {
            "employeeId": employee_id,
            "year": 2023,
            "attributedRevenue": 0,
            "totalCost": 0,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(upsert).variables(vars))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let record = resp.data.into_json().unwrap()["directory"]["upsertPnlRecord"].clone();
    assert_eq!(record["roi"], 0.0);

    let query = r#"
        query Pnl($employeeId: ID!) {
            directory {
                employeePnl(employeeId: $employeeId) {
                    records { year }
                }
            }
        }
    "#;
    let vars = Variables::from_json(json!({ "employeeId": employee_id }));
    let resp = ctx.schema.execute(Request::new(query).variables(vars)).await;
    let records = resp.data.into_json().unwrap()["directory"]["employeePnl"]["records"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(records.len(), 1);
    ctx.cleanup().await;
}

#[tokio::test]
async fn upsert_rejects_bad_years_amounts_and_unknown_employees() {
    let ctx = setup_seeded().await;
    let analyst = ctx.seeded.employee_named("Kevin Park").unwrap().clone();
    let upsert = r#"
        mutation Upsert($input: PnlRecordInput!) {
            directory {
                upsertPnlRecord(input: $input) {
                    id
                }
            }
        }
    "#;

    let bad_year = Variables::from_json(json!({
        "input": {
            "employeeId": analyst.id.to_string(),
            "year": 1800,
            "attributedRevenue": 100,
            "totalCost": 100,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(upsert).variables(bad_year))
        .await;
    assert!(has_error_code(&resp, "VALIDATION"));

    let negative = Variables::from_json(json!({
        "input": {
            "employeeId": analyst.id.to_string(),
            "year": 2023,
            "attributedRevenue": -5,
            "totalCost": 100,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(upsert).variables(negative))
        .await;
    assert!(has_error_code(&resp, "VALIDATION"));

    let unknown = Variables::from_json(json!({
        "input": {
            "employeeId": uuid::Uuid::new_v4().to_string(),
            "year": 2023,
            "attributedRevenue": 100,
            "totalCost": 100,
        }
    }));
    let resp = ctx
        .schema
        .execute(Request::new(upsert).variables(unknown))
        .await;
    assert!(has_error_code(&resp, "NOT_FOUND"));
    ctx.cleanup().await;
}

#[tokio::test]
async fn analytics_totals_sum_across_departments() {
    let ctx = setup_seeded().await;
    let query = r#"
        query Analytics {
            directory {
                pnlAnalytics {
                    overall { totalRevenue totalCost netProfit totalRecords }
                    departments { department totalRevenue totalCost employeeCount }
                    topPerformers { employee { name } roi }
                }
            }
        }
    "#;
    let resp = ctx.schema.execute(Request::new(query)).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let analytics = resp.data.into_json().unwrap()["directory"]["pnlAnalytics"].clone();

    let departments = analytics["departments"].as_array().unwrap().clone();
    let names: Vec<&str> = departments
        .iter()
        .map(|d| d["department"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Engineering", "Executive", "Finance", "Human Resources"]
    );

    let dept_revenue: i64 = departments
        .iter()
        .map(|d| d["totalRevenue"].as_i64().unwrap())
        .sum();
    let dept_cost: i64 = departments
        .iter()
        .map(|d| d["totalCost"].as_i64().unwrap())
        .sum();
    let overall = analytics["overall"].clone();
    assert_eq!(overall["totalRevenue"].as_i64().unwrap(), dept_revenue);
    assert_eq!(overall["totalCost"].as_i64().unwrap(), dept_cost);
    assert_eq!(
        overall["netProfit"].as_i64().unwrap(),
        dept_revenue - dept_cost
    );

    let human_resources = departments
        .iter()
        .find(|d| d["department"] == "Human Resources")
        .unwrap();
    assert_eq!(human_resources["employeeCount"], 2);

    let performers = analytics["topPerformers"].as_array().unwrap();
    assert!(performers.len() <= 10);
    let rois: Vec<f64> = performers
        .iter()
        .map(|p| p["roi"].as_f64().unwrap())
        .collect();
    assert!(rois.windows(2).all(|pair| pair[0] >= pair[1]));
    ctx.cleanup().await;
}

#[tokio::test]
async fn analytics_filters_compose() {
    let ctx = setup_seeded().await;
    let query = r#"
        query Analytics($department: String, $yearFrom: Int, $yearTo: Int) {
            directory {
                pnlAnalytics(department: $department, yearFrom: $yearFrom, yearTo: $yearTo) {
                    overall { totalRevenue totalRecords }
                    departments { department totalRevenue }
                }
            }
        }
    "#;

    let vars = Variables::from_json(json!({
        "department": "Finance",
        "yearFrom": 2022,
        "yearTo": 2023,
    }));
    let resp = ctx.schema.execute(Request::new(query).variables(vars)).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let analytics = resp.data.into_json().unwrap()["directory"]["pnlAnalytics"].clone();
    let departments = analytics["departments"].as_array().unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0]["department"], "Finance");
    assert_eq!(
        analytics["overall"]["totalRevenue"],
        departments[0]["totalRevenue"]
    );

    let inverted = Variables::from_json(json!({
        "yearFrom": 2024,
        "yearTo": 2020,
    }));
    let resp = ctx
        .schema
        .execute(Request::new(query).variables(inverted))
        .await;
    assert!(has_error_code(&resp, "VALIDATION"));
    ctx.cleanup().await;
}

#[tokio::test]
async fn every_employee_appears_in_the_pnl_listing() {
    let ctx = setup_seeded().await;
    let query = r#"
        query Listing {
            directory {
                employeesWithPnl {
                    employee { name }
                    pnlSummary { totalCost yearsCount }
                }
            }
        }
    "#;
    let resp = ctx.schema.execute(Request::new(query)).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let listing = resp.data.into_json().unwrap()["directory"]["employeesWithPnl"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(listing.len(), 13);
    assert!(listing
        .iter()
        .all(|row| row["pnlSummary"]["totalCost"].as_i64().unwrap() > 0));
    assert!(listing
        .iter()
        .all(|row| row["pnlSummary"]["yearsCount"].as_i64().unwrap() >= 1));
    ctx.cleanup().await;
}

#[tokio::test]
async fn deleting_a_ledger_row_is_idempotent() {
    let ctx = setup_seeded().await;
    let record = ctx.seeded.pnl_records.first().unwrap().clone();
    let mutation = r#"
        mutation Delete($id: ID!) {
            directory {
                deletePnlRecord(id: $id)
            }
        }
    "#;
    let vars = Variables::from_json(json!({ "id": record.id.to_string() }));
    let resp = ctx
        .schema
        .execute(Request::new(mutation).variables(vars))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    assert_eq!(
        resp.data.into_json().unwrap()["directory"]["deletePnlRecord"],
        true
    );

    let vars = Variables::from_json(json!({ "id": record.id.to_string() }));
    let resp = ctx
        .schema
        .execute(Request::new(mutation).variables(vars))
        .await;
    assert_eq!(
        resp.data.into_json().unwrap()["directory"]["deletePnlRecord"],
        false
    );
    ctx.cleanup().await;
}
