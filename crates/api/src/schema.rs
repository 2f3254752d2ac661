use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_graphql::{
    Context, EmptySubscription, Enum, Error, ErrorExtensions, InputObject, Object, Schema,
    SimpleObject, ID,
};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{employee, pnl_record};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, Value,
};
use tracing::info_span;
use uuid::Uuid;

use crate::{hierarchy, pnl, search, search::AcronymDictionary};

pub struct AppSchema(pub Schema<QueryRoot, MutationRoot, EmptySubscription>);

pub fn build_schema(db: Arc<DatabaseConnection>, acronyms: Arc<AcronymDictionary>) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(acronyms)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

const MAX_TEXT_FIELD: usize = 256;
const MIN_PNL_YEAR: i32 = 1900;
const MAX_PNL_YEAR: i32 = 2100;

#[Object]
impl QueryRoot {
    async fn directory(&self) -> DirectoryQuery {
        DirectoryQuery
    }
}

#[Object]
impl MutationRoot {
    async fn directory(&self) -> DirectoryMutation {
        DirectoryMutation
    }
}

#[derive(Default)]
pub struct DirectoryQuery;

#[derive(Default)]
pub struct DirectoryMutation;

#[Object]
impl DirectoryQuery {
    /// List the directory, optionally scoped to a department and
    /// ranked against a free-text query.
    async fn employees(
        &self,
        ctx: &Context<'_>,
        q: Option<String>,
        department: Option<String>,
        exact: Option<bool>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let db = database(ctx)?;
        let dictionary = acronyms(ctx)?;
        let query_text = q.unwrap_or_default();
        let exact = exact.unwrap_or(false);
        let department = sanitize_optional_filter(department);
        let span = info_span!(
            "directory.employees",
            has_q = !query_text.trim().is_empty(),
            exact,
            has_department = department.is_some()
        );
        let _guard = span.enter();

        let everyone = load_directory(db.as_ref()).await?;
        let scoped: Vec<employee::Model> = match &department {
            Some(dept) => employee::Entity::find()
                .filter(employee::Column::Department.eq(dept.clone()))
                .order_by_asc(employee::Column::Name)
                .all(db.as_ref())
                .await
                .map_err(db_error)?,
            None => everyone.clone(),
        };

        let ranked = search::rank(&scoped, &query_text, exact, dictionary.as_ref());
        let index = DirectoryIndex::new(&everyone);
        Ok(ranked
            .into_iter()
            .map(|model| EmployeeNode::from_model(model, &index))
            .collect())
    }

    async fn employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&id)?;
        let model = ensure_employee_exists(db.as_ref(), employee_id).await?;
        let everyone = load_directory(db.as_ref()).await?;
        let index = DirectoryIndex::new(&everyone);
        Ok(EmployeeNode::from_model(model, &index))
    }

    async fn departments(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<String>> {
        let db = database(ctx)?;
        employee::Entity::find()
            .select_only()
            .column(employee::Column::Department)
            .distinct()
            .order_by_asc(employee::Column::Department)
            .into_tuple()
            .all(db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Positioned org-chart nodes and manager->report edges.
    #[graphql(name = "orgChart")]
    async fn org_chart(&self, ctx: &Context<'_>) -> async_graphql::Result<OrgChartNode> {
        let db = database(ctx)?;
        let everyone = load_directory(db.as_ref()).await?;
        let laid_out = hierarchy::layout(&everyone);
        let by_id: HashMap<Uuid, &employee::Model> = everyone.iter().map(|e| (e.id, e)).collect();

        let nodes = laid_out
            .nodes
            .iter()
            .filter_map(|node| {
                let model = by_id.get(&node.id)?;
                Some(OrgChartEntryNode {
                    id: ID::from(node.id.to_string()),
                    name: model.name.clone(),
                    title: model.title.clone(),
                    department: model.department.clone(),
                    status: model.status.into(),
                    level: node.level as i32,
                    x: node.x,
                    y: node.y,
                })
            })
            .collect();
        let edges = laid_out
            .edges
            .iter()
            .map(|edge| OrgChartEdgeNode {
                manager_id: ID::from(edge.manager_id.to_string()),
                employee_id: ID::from(edge.employee_id.to_string()),
            })
            .collect();
        Ok(OrgChartNode { nodes, edges })
    }

    /// Pre-submit probe for the org-chart UI: would assigning
    /// `managerId` as the manager of `employeeId` close a loop?
    #[graphql(name = "wouldCreateCycle")]
    async fn would_create_cycle(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "employeeId")] employee_id: ID,
        #[graphql(name = "managerId")] manager_id: ID,
    ) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&employee_id)?;
        let manager_id = parse_uuid(&manager_id)?;
        ensure_employee_exists(db.as_ref(), employee_id).await?;
        ensure_employee_exists(db.as_ref(), manager_id).await?;
        let everyone = load_directory(db.as_ref()).await?;
        Ok(hierarchy::would_create_cycle(
            &everyone,
            employee_id,
            manager_id,
        ))
    }

    /// One employee's yearly ledger plus its summary.
    #[graphql(name = "employeePnl")]
    async fn employee_pnl(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "employeeId")] employee_id: ID,
    ) -> async_graphql::Result<EmployeePnlPayload> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&employee_id)?;
        ensure_employee_exists(db.as_ref(), employee_id).await?;
        let records = pnl_record::Entity::find()
            .filter(pnl_record::Column::EmployeeId.eq(employee_id))
            .order_by_asc(pnl_record::Column::Year)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        let summary = pnl::summarize(&records);
        Ok(EmployeePnlPayload {
            records: records.into_iter().map(PnlRecordNode::from).collect(),
            summary: summary.into(),
        })
    }

    /// The whole directory with a P&L summary per employee (zero
    /// summary when an employee has no ledger rows).
    #[graphql(name = "employeesWithPnl")]
    async fn employees_with_pnl(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<EmployeeWithPnlNode>> {
        let db = database(ctx)?;
        let everyone = load_directory(db.as_ref()).await?;
        let records = pnl_record::Entity::find()
            .order_by_asc(pnl_record::Column::Year)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;

        let mut by_employee: HashMap<Uuid, Vec<pnl_record::Model>> = HashMap::new();
        for record in records {
            by_employee
                .entry(record.employee_id)
                .or_default()
                .push(record);
        }

        let index = DirectoryIndex::new(&everyone);
        Ok(everyone
            .iter()
            .map(|model| {
                let summary = by_employee
                    .get(&model.id)
                    .map(|rows| pnl::summarize(rows))
                    .unwrap_or_default();
                EmployeeWithPnlNode {
                    employee: EmployeeNode::from_model(model.clone(), &index),
                    pnl_summary: summary.into(),
                }
            })
            .collect())
    }

    /// Company, department, and top-performer aggregates, optionally
    /// filtered by department and year range.
    #[graphql(name = "pnlAnalytics")]
    async fn pnl_analytics(
        &self,
        ctx: &Context<'_>,
        department: Option<String>,
        #[graphql(name = "yearFrom")] year_from: Option<i32>,
        #[graphql(name = "yearTo")] year_to: Option<i32>,
    ) -> async_graphql::Result<PnlAnalyticsNode> {
        let db = database(ctx)?;
        let department = sanitize_optional_filter(department);
        if let (Some(from), Some(to)) = (year_from, year_to) {
            if from > to {
                return Err(validation_error("yearFrom must be on or before yearTo"));
            }
        }
        let span = info_span!(
            "directory.pnlAnalytics",
            has_department = department.is_some(),
            has_year_range = year_from.is_some() || year_to.is_some()
        );
        let _guard = span.enter();

        let mut find = pnl_record::Entity::find();
        if let Some(from) = year_from {
            find = find.filter(pnl_record::Column::Year.gte(from));
        }
        if let Some(to) = year_to {
            find = find.filter(pnl_record::Column::Year.lte(to));
        }
        let records = find
            .order_by_desc(pnl_record::Column::Year)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        let everyone = load_directory(db.as_ref()).await?;

        let scoped: Vec<pnl_record::Model> = match &department {
            Some(dept) => {
                let members: HashSet<Uuid> = everyone
                    .iter()
                    .filter(|e| e.department == *dept)
                    .map(|e| e.id)
                    .collect();
                records
                    .into_iter()
                    .filter(|r| members.contains(&r.employee_id))
                    .collect()
            }
            None => records,
        };

        let overall = pnl::company_summary(&scoped);
        let departments = pnl::department_breakdown(&scoped, &everyone);
        let by_id: HashMap<Uuid, &employee::Model> = everyone.iter().map(|e| (e.id, e)).collect();
        let top_performers = pnl::top_performers(&scoped, pnl::TOP_PERFORMERS_LIMIT)
            .into_iter()
            .filter_map(|performance| {
                let model = by_id.get(&performance.employee_id)?;
                Some(TopPerformerNode {
                    employee: EmployeeRefNode::from(*model),
                    department: model.department.clone(),
                    total_revenue: performance.total_revenue,
                    total_cost: performance.total_cost,
                    net_profit: performance.net_profit,
                    roi: performance.roi,
                    years_count: performance.years_count as i32,
                })
            })
            .collect();

        Ok(PnlAnalyticsNode {
            overall: overall.into(),
            departments: departments.into_iter().map(Into::into).collect(),
            top_performers,
        })
    }
}

#[Object]
impl DirectoryMutation {
    #[graphql(name = "createEmployee")]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: NewEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let name = validate_person_field("name", &input.name)?;
        let title = validate_person_field("title", &input.title)?;
        let department = validate_person_field("department", &input.department)?;
        let email = normalize_email(&input.email)?;
        let salary = validate_salary(input.salary)?;
        ensure_unique_email(db.as_ref(), &email, None).await?;
        let manager_id = match &input.manager_id {
            Some(id) => {
                let manager_id = parse_uuid(id)?;
                ensure_employee_exists(db.as_ref(), manager_id).await?;
                Some(manager_id)
            }
            None => None,
        };

        let employee_id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = employee::ActiveModel {
            id: Set(employee_id),
            name: Set(name),
            title: Set(title),
            department: Set(department),
            email: Set(email),
            phone: Set(sanitize_optional_filter(input.phone)),
            hire_date: Set(input.hire_date),
            salary: Set(salary),
            status: Set(input.status.unwrap_or_default().into()),
            manager_id: Set(manager_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        employee::Entity::insert(active)
            .exec_without_returning(db.as_ref())
            .await
            .map_err(db_error)?;

        load_employee_node(db.as_ref(), employee_id).await
    }

    #[graphql(name = "updateEmployee")]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        input: UpdateEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&input.id)?;
        let existing = ensure_employee_exists(db.as_ref(), employee_id).await?;
        let mut active: employee::ActiveModel = existing.clone().into();

        if let Some(name) = &input.name {
            active.name = Set(validate_person_field("name", name)?);
        }
        if let Some(title) = &input.title {
            active.title = Set(validate_person_field("title", title)?);
        }
        if let Some(department) = &input.department {
            active.department = Set(validate_person_field("department", department)?);
        }
        if let Some(email) = &input.email {
            let email = normalize_email(email)?;
            if email != existing.email {
                ensure_unique_email(db.as_ref(), &email, Some(employee_id)).await?;
            }
            active.email = Set(email);
        }
        if input.phone.is_some() {
            active.phone = Set(sanitize_optional_filter(input.phone.clone()));
        }
        if let Some(hire_date) = input.hire_date {
            active.hire_date = Set(hire_date);
        }
        if let Some(salary) = input.salary {
            active.salary = Set(validate_salary(salary)?);
        }
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        if let Some(manager_id) = &input.manager_id {
            let manager_id = parse_uuid(manager_id)?;
            ensure_employee_exists(db.as_ref(), manager_id).await?;
            let everyone = load_directory(db.as_ref()).await?;
            if hierarchy::would_create_cycle(&everyone, employee_id, manager_id) {
                return Err(validation_error(
                    "manager reassignment would create a reporting cycle",
                ));
            }
            active.manager_id = Set(Some(manager_id));
        }
        active.updated_at = Set(Utc::now().into());
        active.update(db.as_ref()).await.map_err(db_error)?;

        load_employee_node(db.as_ref(), employee_id).await
    }

    /// Reassign (or clear) an employee's manager; the org-chart
    /// drag-and-drop lands here. Cycle-creating assignments are
    /// rejected before anything is written.
    #[graphql(name = "assignManager")]
    async fn assign_manager(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "managerId")] manager_id: Option<ID>,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&id)?;
        let existing = ensure_employee_exists(db.as_ref(), employee_id).await?;
        let target = match manager_id {
            Some(manager_id) => {
                let manager_id = parse_uuid(&manager_id)?;
                ensure_employee_exists(db.as_ref(), manager_id).await?;
                let everyone = load_directory(db.as_ref()).await?;
                if hierarchy::would_create_cycle(&everyone, employee_id, manager_id) {
                    return Err(validation_error(
                        "manager reassignment would create a reporting cycle",
                    ));
                }
                Some(manager_id)
            }
            None => None,
        };

        let mut active: employee::ActiveModel = existing.into();
        active.manager_id = Set(target);
        active.updated_at = Set(Utc::now().into());
        active.update(db.as_ref()).await.map_err(db_error)?;

        load_employee_node(db.as_ref(), employee_id).await
    }

    /// Remove an employee. Their reports are left without a manager
    /// and their ledger rows go with them.
    #[graphql(name = "deleteEmployee")]
    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&id)?;
        if employee::Entity::find_by_id(employee_id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .is_none()
        {
            return Ok(false);
        }

        let txn = db.begin().await.map_err(db_error)?;
        employee::Entity::update_many()
            .col_expr(employee::Column::ManagerId, Expr::value(Value::Uuid(None)))
            .filter(employee::Column::ManagerId.eq(employee_id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        pnl_record::Entity::delete_many()
            .filter(pnl_record::Column::EmployeeId.eq(employee_id))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        let res = employee::Entity::delete_by_id(employee_id)
            .exec(&txn)
            .await
            .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;
        Ok(res.rows_affected > 0)
    }

    /// Insert or replace the ledger row for one employee and year.
    #[graphql(name = "upsertPnlRecord")]
    async fn upsert_pnl_record(
        &self,
        ctx: &Context<'_>,
        input: PnlRecordInput,
    ) -> async_graphql::Result<PnlRecordNode> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&input.employee_id)?;
        ensure_employee_exists(db.as_ref(), employee_id).await?;
        let year = validate_year(input.year)?;
        let attributed_revenue = validate_money("attributedRevenue", input.attributed_revenue)?;
        let total_cost = validate_money("totalCost", input.total_cost)?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = pnl_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            year: Set(year),
            attributed_revenue: Set(attributed_revenue),
            total_cost: Set(total_cost),
            notes: Set(sanitize_optional_filter(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        pnl_record::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([pnl_record::Column::EmployeeId, pnl_record::Column::Year])
                    .update_columns([
                        pnl_record::Column::AttributedRevenue,
                        pnl_record::Column::TotalCost,
                        pnl_record::Column::Notes,
                        pnl_record::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db.as_ref())
            .await
            .map_err(db_error)?;

        let record = pnl_record::Entity::find()
            .filter(pnl_record::Column::EmployeeId.eq(employee_id))
            .filter(pnl_record::Column::Year.eq(year))
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("INTERNAL", "Failed to load upserted P&L record"))?;
        Ok(record.into())
    }

    #[graphql(name = "deletePnlRecord")]
    async fn delete_pnl_record(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let record_id = parse_uuid(&id)?;
        let res = pnl_record::Entity::delete_by_id(record_id)
            .exec(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(res.rows_affected > 0)
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Terminated,
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

impl From<employee::Status> for EmployeeStatus {
    fn from(value: employee::Status) -> Self {
        match value {
            employee::Status::Active => EmployeeStatus::Active,
            employee::Status::Inactive => EmployeeStatus::Inactive,
            employee::Status::Terminated => EmployeeStatus::Terminated,
        }
    }
}

impl From<EmployeeStatus> for employee::Status {
    fn from(value: EmployeeStatus) -> Self {
        match value {
            EmployeeStatus::Active => employee::Status::Active,
            EmployeeStatus::Inactive => employee::Status::Inactive,
            EmployeeStatus::Terminated => employee::Status::Terminated,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeRef")]
pub struct EmployeeRefNode {
    pub id: ID,
    pub name: String,
    pub title: String,
}

impl From<&employee::Model> for EmployeeRefNode {
    fn from(model: &employee::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name.clone(),
            title: model.title.clone(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub name: String,
    pub title: String,
    pub department: String,
    pub email: String,
    pub phone: Option<String>,
    #[graphql(name = "hireDate")]
    pub hire_date: NaiveDate,
    pub salary: i64,
    pub status: EmployeeStatus,
    #[graphql(name = "managerId")]
    pub manager_id: Option<ID>,
    pub manager: Option<EmployeeRefNode>,
    pub reports: Vec<EmployeeRefNode>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl EmployeeNode {
    fn from_model(model: employee::Model, index: &DirectoryIndex) -> Self {
        let manager = model.manager_id.and_then(|id| index.refs.get(&id).cloned());
        let reports = index.reports.get(&model.id).cloned().unwrap_or_default();
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            title: model.title,
            department: model.department,
            email: model.email,
            phone: model.phone,
            hire_date: model.hire_date,
            salary: model.salary,
            status: model.status.into(),
            manager_id: model.manager_id.map(|id| ID::from(id.to_string())),
            manager,
            reports,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Manager and reports references for a loaded directory snapshot.
/// Reports are recomputed from `manager_id` on every load.
struct DirectoryIndex {
    refs: HashMap<Uuid, EmployeeRefNode>,
    reports: HashMap<Uuid, Vec<EmployeeRefNode>>,
}

impl DirectoryIndex {
    fn new(everyone: &[employee::Model]) -> Self {
        let refs: HashMap<Uuid, EmployeeRefNode> = everyone
            .iter()
            .map(|e| (e.id, EmployeeRefNode::from(e)))
            .collect();
        let mut reports: HashMap<Uuid, Vec<EmployeeRefNode>> = HashMap::new();
        for e in everyone {
            if let Some(manager_id) = e.manager_id {
                reports
                    .entry(manager_id)
                    .or_default()
                    .push(EmployeeRefNode::from(e));
            }
        }
        Self { refs, reports }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PnlRecord")]
pub struct PnlRecordNode {
    pub id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    pub year: i32,
    #[graphql(name = "attributedRevenue")]
    pub attributed_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    #[graphql(name = "netProfit")]
    pub net_profit: i64,
    pub roi: f64,
    pub notes: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<pnl_record::Model> for PnlRecordNode {
    fn from(model: pnl_record::Model) -> Self {
        let net_profit = model.attributed_revenue - model.total_cost;
        Self {
            id: ID::from(model.id.to_string()),
            employee_id: ID::from(model.employee_id.to_string()),
            year: model.year,
            attributed_revenue: model.attributed_revenue,
            total_cost: model.total_cost,
            net_profit,
            roi: pnl::roi(net_profit, model.total_cost),
            notes: model.notes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PnlSummary")]
pub struct PnlSummaryNode {
    #[graphql(name = "totalRevenue")]
    pub total_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    #[graphql(name = "netProfit")]
    pub net_profit: i64,
    pub roi: f64,
    #[graphql(name = "yearsCount")]
    pub years_count: i32,
}

impl From<pnl::PnlSummary> for PnlSummaryNode {
    fn from(summary: pnl::PnlSummary) -> Self {
        Self {
            total_revenue: summary.total_revenue,
            total_cost: summary.total_cost,
            net_profit: summary.net_profit,
            roi: summary.roi,
            years_count: summary.years_count as i32,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeePnl")]
pub struct EmployeePnlPayload {
    pub records: Vec<PnlRecordNode>,
    pub summary: PnlSummaryNode,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeWithPnl")]
pub struct EmployeeWithPnlNode {
    pub employee: EmployeeNode,
    #[graphql(name = "pnlSummary")]
    pub pnl_summary: PnlSummaryNode,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "CompanyPnl")]
pub struct CompanyPnlNode {
    #[graphql(name = "totalRevenue")]
    pub total_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    #[graphql(name = "netProfit")]
    pub net_profit: i64,
    pub roi: f64,
    #[graphql(name = "totalRecords")]
    pub total_records: i32,
}

impl From<pnl::CompanySummary> for CompanyPnlNode {
    fn from(summary: pnl::CompanySummary) -> Self {
        Self {
            total_revenue: summary.total_revenue,
            total_cost: summary.total_cost,
            net_profit: summary.net_profit,
            roi: summary.roi,
            total_records: summary.record_count as i32,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "DepartmentPnl")]
pub struct DepartmentPnlNode {
    pub department: String,
    #[graphql(name = "totalRevenue")]
    pub total_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    #[graphql(name = "netProfit")]
    pub net_profit: i64,
    pub roi: f64,
    #[graphql(name = "employeeCount")]
    pub employee_count: i32,
}

impl From<pnl::DepartmentSummary> for DepartmentPnlNode {
    fn from(summary: pnl::DepartmentSummary) -> Self {
        Self {
            department: summary.department,
            total_revenue: summary.total_revenue,
            total_cost: summary.total_cost,
            net_profit: summary.net_profit,
            roi: summary.roi,
            employee_count: summary.employee_count as i32,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "TopPerformer")]
pub struct TopPerformerNode {
    pub employee: EmployeeRefNode,
    pub department: String,
    #[graphql(name = "totalRevenue")]
    pub total_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    #[graphql(name = "netProfit")]
    pub net_profit: i64,
    pub roi: f64,
    #[graphql(name = "yearsCount")]
    pub years_count: i32,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PnlAnalytics")]
pub struct PnlAnalyticsNode {
    pub overall: CompanyPnlNode,
    pub departments: Vec<DepartmentPnlNode>,
    #[graphql(name = "topPerformers")]
    pub top_performers: Vec<TopPerformerNode>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "OrgChart")]
pub struct OrgChartNode {
    pub nodes: Vec<OrgChartEntryNode>,
    pub edges: Vec<OrgChartEdgeNode>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "OrgChartEntry")]
pub struct OrgChartEntryNode {
    pub id: ID,
    pub name: String,
    pub title: String,
    pub department: String,
    pub status: EmployeeStatus,
    pub level: i32,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "OrgChartEdge")]
pub struct OrgChartEdgeNode {
    #[graphql(name = "managerId")]
    pub manager_id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
}

#[derive(Clone, Debug, InputObject)]
pub struct NewEmployeeInput {
    pub name: String,
    pub title: String,
    pub department: String,
    pub email: String,
    pub phone: Option<String>,
    #[graphql(name = "hireDate")]
    pub hire_date: NaiveDate,
    pub salary: i64,
    pub status: Option<EmployeeStatus>,
    #[graphql(name = "managerId")]
    pub manager_id: Option<ID>,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateEmployeeInput {
    pub id: ID,
    pub name: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[graphql(name = "hireDate")]
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<i64>,
    pub status: Option<EmployeeStatus>,
    #[graphql(name = "managerId")]
    pub manager_id: Option<ID>,
}

#[derive(Clone, Debug, InputObject)]
pub struct PnlRecordInput {
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    pub year: i32,
    #[graphql(name = "attributedRevenue")]
    pub attributed_revenue: i64,
    #[graphql(name = "totalCost")]
    pub total_cost: i64,
    pub notes: Option<String>,
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing database connection"))
}

fn acronyms(ctx: &Context<'_>) -> async_graphql::Result<Arc<AcronymDictionary>> {
    ctx.data::<Arc<AcronymDictionary>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing acronym dictionary"))
}

async fn load_directory(db: &DatabaseConnection) -> async_graphql::Result<Vec<employee::Model>> {
    employee::Entity::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(db_error)
}

async fn load_employee_node(
    db: &DatabaseConnection,
    employee_id: Uuid,
) -> async_graphql::Result<EmployeeNode> {
    let everyone = load_directory(db).await?;
    let index = DirectoryIndex::new(&everyone);
    let model = everyone
        .iter()
        .find(|e| e.id == employee_id)
        .cloned()
        .ok_or_else(|| error_with_code("INTERNAL", "Failed to load written employee"))?;
    Ok(EmployeeNode::from_model(model, &index))
}

async fn ensure_employee_exists(
    db: &DatabaseConnection,
    employee_id: Uuid,
) -> async_graphql::Result<employee::Model> {
    employee::Entity::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_with_code("NOT_FOUND", "Employee not found"))
}

async fn ensure_unique_email(
    db: &DatabaseConnection,
    email: &str,
    exclude: Option<Uuid>,
) -> async_graphql::Result<()> {
    let mut find = employee::Entity::find().filter(employee::Column::Email.eq(email));
    if let Some(id) = exclude {
        find = find.filter(employee::Column::Id.ne(id));
    }
    if find.one(db).await.map_err(db_error)?.is_some() {
        return Err(validation_error("email is already in use"));
    }
    Ok(())
}

fn sanitize_optional_filter(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn validate_person_field(label: &str, value: &str) -> async_graphql::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(format!("{} must not be blank", label)));
    }
    if trimmed.len() > MAX_TEXT_FIELD {
        return Err(validation_error(format!(
            "{} cannot exceed {} characters",
            label, MAX_TEXT_FIELD
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(email: &str) -> async_graphql::Result<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty()
        || normalized.len() > 320
        || !normalized.contains('@')
        || normalized.contains(char::is_whitespace)
    {
        return Err(validation_error("email is not a valid address"));
    }
    Ok(normalized)
}

fn validate_salary(salary: i64) -> async_graphql::Result<i64> {
    if salary < 0 {
        return Err(validation_error("salary must not be negative"));
    }
    Ok(salary)
}

fn validate_year(year: i32) -> async_graphql::Result<i32> {
    if !(MIN_PNL_YEAR..=MAX_PNL_YEAR).contains(&year) {
        return Err(validation_error(format!(
            "year must fall between {} and {}",
            MIN_PNL_YEAR, MAX_PNL_YEAR
        )));
    }
    Ok(year)
}

fn validate_money(label: &str, amount: i64) -> async_graphql::Result<i64> {
    if amount < 0 {
        return Err(validation_error(format!("{} must not be negative", label)));
    }
    Ok(amount)
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| error_with_code("BAD_REQUEST", "Invalid ID"))
}

fn db_error(err: DbErr) -> Error {
    error_with_code("INTERNAL", format!("Database error: {}", err))
}

fn validation_error(message: impl Into<String>) -> Error {
    error_with_code("VALIDATION", message)
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}
