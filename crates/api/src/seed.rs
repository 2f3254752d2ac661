//! Deterministic demo dataset: a 13-person org with yearly P&L rows.

use chrono::{Datelike, NaiveDate, Utc};
use entity::{employee, pnl_record};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SeededHrRecords {
    pub employees: Vec<employee::Model>,
    pub pnl_records: Vec<pnl_record::Model>,
}

impl SeededHrRecords {
    pub fn employee_named(&self, name: &str) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.name == name)
    }

    pub fn employee_titled(&self, title: &str) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.title == title)
    }
}

pub async fn seed_hr_demo(db: &DatabaseConnection) -> Result<SeededHrRecords, DbErr> {
    let ceo = insert_employee(
        db,
        "Sarah Johnson",
        "Chief Executive Officer",
        "Executive",
        "sarah.johnson@company.com",
        "+1-555-0101",
        naive_date(2020, 1, 15),
        250_000,
        None,
    )
    .await?;

    let cto = insert_employee(
        db,
        "Michael Chen",
        "Chief Technology Officer",
        "Engineering",
        "michael.chen@company.com",
        "+1-555-0102",
        naive_date(2020, 3, 1),
        200_000,
        Some(ceo.id),
    )
    .await?;

    let cfo = insert_employee(
        db,
        "Emily Rodriguez",
        "Chief Financial Officer",
        "Finance",
        "emily.rodriguez@company.com",
        "+1-555-0103",
        naive_date(2020, 2, 15),
        180_000,
        Some(ceo.id),
    )
    .await?;

    let hr_director = insert_employee(
        db,
        "David Kim",
        "Director of Human Resources",
        "Human Resources",
        "david.kim@company.com",
        "+1-555-0104",
        naive_date(2020, 4, 1),
        120_000,
        Some(ceo.id),
    )
    .await?;

    let eng_manager_one = insert_employee(
        db,
        "Lisa Wang",
        "Engineering Manager",
        "Engineering",
        "lisa.wang@company.com",
        "+1-555-0105",
        naive_date(2021, 1, 15),
        140_000,
        Some(cto.id),
    )
    .await?;

    let eng_manager_two = insert_employee(
        db,
        "James Wilson",
        "Engineering Manager",
        "Engineering",
        "james.wilson@company.com",
        "+1-555-0106",
        naive_date(2021, 2, 1),
        135_000,
        Some(cto.id),
    )
    .await?;

    let finance_manager = insert_employee(
        db,
        "Maria Garcia",
        "Finance Manager",
        "Finance",
        "maria.garcia@company.com",
        "+1-555-0107",
        naive_date(2021, 3, 1),
        95_000,
        Some(cfo.id),
    )
    .await?;

    let developer_rows: [(&str, &str, &str, &str, NaiveDate, i64, Uuid); 4] = [
        (
            "Alex Thompson",
            "Senior Software Engineer",
            "Engineering",
            "alex.thompson@company.com",
            naive_date(2021, 6, 1),
            110_000,
            eng_manager_one.id,
        ),
        (
            "Jessica Lee",
            "Software Engineer",
            "Engineering",
            "jessica.lee@company.com",
            naive_date(2022, 1, 15),
            85_000,
            eng_manager_one.id,
        ),
        (
            "Robert Brown",
            "Senior Software Engineer",
            "Engineering",
            "robert.brown@company.com",
            naive_date(2021, 8, 1),
            105_000,
            eng_manager_two.id,
        ),
        (
            "Amanda Davis",
            "Software Engineer",
            "Engineering",
            "amanda.davis@company.com",
            naive_date(2022, 3, 1),
            80_000,
            eng_manager_two.id,
        ),
    ];
    let mut developers = Vec::with_capacity(developer_rows.len());
    for (name, title, department, email, hire_date, salary, manager_id) in developer_rows {
        let phone = format!("+1-555-0{}", 108 + developers.len());
        let model = insert_employee(
            db,
            name,
            title,
            department,
            email,
            &phone,
            hire_date,
            salary,
            Some(manager_id),
        )
        .await?;
        developers.push(model);
    }

    let finance_analyst = insert_employee(
        db,
        "Kevin Park",
        "Financial Analyst",
        "Finance",
        "kevin.park@company.com",
        "+1-555-0112",
        naive_date(2022, 5, 1),
        65_000,
        Some(finance_manager.id),
    )
    .await?;

    let hr_specialist = insert_employee(
        db,
        "Rachel Green",
        "HR Specialist",
        "Human Resources",
        "rachel.green@company.com",
        "+1-555-0113",
        naive_date(2022, 7, 1),
        60_000,
        Some(hr_director.id),
    )
    .await?;

    let mut employees = vec![
        ceo,
        cto,
        cfo,
        hr_director,
        eng_manager_one,
        eng_manager_two,
        finance_manager,
    ];
    employees.extend(developers);
    employees.push(finance_analyst);
    employees.push(hr_specialist);

    let mut pnl_records = Vec::new();
    let current_year = Utc::now().year();
    for e in &employees {
        let hire_year = e.hire_date.year();
        let (base_revenue, growth_rate) = revenue_band(&e.title);
        // Salary plus a 40% overhead for benefits and equipment.
        let total_cost = e.salary * 14 / 10;
        for (offset, year) in (hire_year..=current_year).enumerate() {
            let growth = (1.0 + growth_rate).powi(offset as i32);
            let attributed_revenue = (base_revenue as f64 * growth).round() as i64;
            let notes = if offset == 0 {
                format!("First year - {}", e.title)
            } else {
                format!("Year {} - Performance impact", offset + 1)
            };
            let now: DateTimeWithTimeZone = Utc::now().into();
            let record = pnl_record::ActiveModel {
                id: Set(Uuid::new_v4()),
                employee_id: Set(e.id),
                year: Set(year),
                attributed_revenue: Set(attributed_revenue),
                total_cost: Set(total_cost),
                notes: Set(Some(notes)),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await?;
            pnl_records.push(record);
        }
    }

    Ok(SeededHrRecords {
        employees,
        pnl_records,
    })
}

/// Yearly revenue attribution band by role seniority: base amount and
/// compounding growth rate.
fn revenue_band(title: &str) -> (i64, f64) {
    if title.contains("Chief") {
        (3_000_000, 0.12)
    } else if title.contains("Director") || title.contains("Manager") {
        (1_000_000, 0.10)
    } else if title.contains("Senior") {
        (600_000, 0.08)
    } else {
        (300_000, 0.15)
    }
}

#[allow(clippy::too_many_arguments)]
async fn insert_employee(
    db: &DatabaseConnection,
    name: &str,
    title: &str,
    department: &str,
    email: &str,
    phone: &str,
    hire_date: NaiveDate,
    salary: i64,
    manager_id: Option<Uuid>,
) -> Result<employee::Model, DbErr> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        title: Set(title.to_string()),
        department: Set(department.to_string()),
        email: Set(email.to_string()),
        phone: Set(Some(phone.to_string())),
        hire_date: Set(hire_date),
        salary: Set(salary),
        status: Set(employee::Status::Active),
        manager_id: Set(manager_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

fn naive_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}
