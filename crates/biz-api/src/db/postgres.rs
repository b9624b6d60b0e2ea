//! Postgres store

use super::schema::{score_columns, AnalysisRow, IdeaRow, ReportRow, UserRow};
use super::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use biz_core::{Analysis, Idea, Page, Report, User};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, name, is_active, is_verified, \
     created_at, updated_at, deleted_at";

const IDEA_COLUMNS: &str = "id, user_id, title, description, problem, target_customer, \
     value_proposition, differentiation, constraints, industry, revenue_model, status, \
     collected_data, version, created_at, updated_at, deleted_at";

const ANALYSIS_COLUMNS: &str = "id, idea_id, status, market_score, competition_score, \
     customer_demand_score, financial_score, execution_score, risk_score, overall_score, \
     swot_analysis, market_analysis, competition_analysis, customer_analysis, \
     financial_analysis, risk_analysis, created_at, updated_at, completed_at";

const REPORT_COLUMNS: &str = "id, idea_id, status, report_type, executive_summary, \
     recommendation, swot, market_analysis, competition_analysis, financial_analysis, \
     risk_assessment, action_items, key_insights, created_at, updated_at, completed_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!("Connected to database");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Compare-and-set write of an idea inside `tx`
    async fn write_idea(tx: &mut Transaction<'_, Postgres>, idea: &Idea) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ideas SET
                title = $3, description = $4, problem = $5, target_customer = $6,
                value_proposition = $7, differentiation = $8, constraints = $9,
                industry = $10, revenue_model = $11, status = $12, collected_data = $13,
                updated_at = $14, deleted_at = $15, version = version + 1
            WHERE id = $1 AND version = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(idea.id)
        .bind(idea.version)
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(&idea.problem)
        .bind(&idea.target_customer)
        .bind(&idea.value_proposition)
        .bind(&idea.differentiation)
        .bind(&idea.constraints)
        .bind(idea.industry.map(|v| v.as_str()))
        .bind(idea.revenue_model.map(|v| v.as_str()))
        .bind(idea.status.as_str())
        .bind(idea.collected_data.as_ref().map(Json))
        .bind(idea.updated_at)
        .bind(idea.deleted_at)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, is_active, is_verified,
                               created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate("email")),
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn create_idea(&self, idea: &Idea) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ideas (id, user_id, title, description, problem, target_customer,
                               value_proposition, differentiation, constraints, industry,
                               revenue_model, status, collected_data, version,
                               created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(idea.id)
        .bind(idea.owner_id)
        .bind(&idea.title)
        .bind(&idea.description)
        .bind(&idea.problem)
        .bind(&idea.target_customer)
        .bind(&idea.value_proposition)
        .bind(&idea.differentiation)
        .bind(&idea.constraints)
        .bind(idea.industry.map(|v| v.as_str()))
        .bind(idea.revenue_model.map(|v| v.as_str()))
        .bind(idea.status.as_str())
        .bind(idea.collected_data.as_ref().map(Json))
        .bind(idea.version)
        .bind(idea.created_at)
        .bind(idea.updated_at)
        .bind(idea.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn idea_by_id(&self, id: Uuid) -> StoreResult<Option<Idea>> {
        let sql = format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, IdeaRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Idea::try_from).transpose()
    }

    async fn ideas_by_owner(&self, owner_id: Uuid, page: Page) -> StoreResult<(Vec<Idea>, i64)> {
        let sql = format!(
            "SELECT {IDEA_COLUMNS} FROM ideas WHERE user_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, IdeaRow>(&sql)
            .bind(owner_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ideas WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let ideas = rows
            .into_iter()
            .map(Idea::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((ideas, total))
    }

    async fn save_idea(&self, idea: &Idea) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        if !Self::write_idea(&mut tx, idea).await? {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn analysis_for_idea(&self, idea_id: Uuid) -> StoreResult<Option<Analysis>> {
        let sql = format!("SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE idea_id = $1");
        let row = sqlx::query_as::<_, AnalysisRow>(&sql)
            .bind(idea_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Analysis::try_from).transpose()
    }

    async fn save_analysis_stage(&self, idea: &Idea, analysis: &Analysis) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        if !Self::write_idea(&mut tx, idea).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        let [market, competition, customer_demand, financial, execution, risk, overall] =
            score_columns(analysis);
        let sections = &analysis.sections;

        sqlx::query(
            r#"
            INSERT INTO analyses (id, idea_id, status, market_score, competition_score,
                                  customer_demand_score, financial_score, execution_score,
                                  risk_score, overall_score, swot_analysis, market_analysis,
                                  competition_analysis, customer_analysis, financial_analysis,
                                  risk_analysis, created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19)
            ON CONFLICT (idea_id) DO UPDATE SET
                status = EXCLUDED.status,
                market_score = EXCLUDED.market_score,
                competition_score = EXCLUDED.competition_score,
                customer_demand_score = EXCLUDED.customer_demand_score,
                financial_score = EXCLUDED.financial_score,
                execution_score = EXCLUDED.execution_score,
                risk_score = EXCLUDED.risk_score,
                overall_score = EXCLUDED.overall_score,
                swot_analysis = EXCLUDED.swot_analysis,
                market_analysis = EXCLUDED.market_analysis,
                competition_analysis = EXCLUDED.competition_analysis,
                customer_analysis = EXCLUDED.customer_analysis,
                financial_analysis = EXCLUDED.financial_analysis,
                risk_analysis = EXCLUDED.risk_analysis,
                updated_at = EXCLUDED.updated_at,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(analysis.id)
        .bind(analysis.idea_id)
        .bind(analysis.status.as_str())
        .bind(market)
        .bind(competition)
        .bind(customer_demand)
        .bind(financial)
        .bind(execution)
        .bind(risk)
        .bind(overall)
        .bind(sections.swot.as_ref().map(Json))
        .bind(sections.market.as_ref().map(Json))
        .bind(sections.competition.as_ref().map(Json))
        .bind(sections.customer.as_ref().map(Json))
        .bind(sections.financial.as_ref().map(Json))
        .bind(sections.risk.as_ref().map(Json))
        .bind(analysis.created_at)
        .bind(analysis.updated_at)
        .bind(analysis.completed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn report_by_id(&self, id: Uuid) -> StoreResult<Option<Report>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");
        let row = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Report::try_from).transpose()
    }

    async fn reports_for_idea(&self, idea_id: Uuid) -> StoreResult<Vec<Report>> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE idea_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(idea_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Report::try_from).collect()
    }

    async fn save_report_stage(&self, idea: &Idea, report: &Report) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        if !Self::write_idea(&mut tx, idea).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        let content = report.content.as_ref();
        sqlx::query(
            r#"
            INSERT INTO reports (id, idea_id, status, report_type, executive_summary,
                                 recommendation, swot, market_analysis, competition_analysis,
                                 financial_analysis, risk_assessment, action_items,
                                 key_insights, created_at, updated_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                executive_summary = EXCLUDED.executive_summary,
                recommendation = EXCLUDED.recommendation,
                swot = EXCLUDED.swot,
                market_analysis = EXCLUDED.market_analysis,
                competition_analysis = EXCLUDED.competition_analysis,
                financial_analysis = EXCLUDED.financial_analysis,
                risk_assessment = EXCLUDED.risk_assessment,
                action_items = EXCLUDED.action_items,
                key_insights = EXCLUDED.key_insights,
                updated_at = EXCLUDED.updated_at,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(report.id)
        .bind(report.idea_id)
        .bind(report.status.as_str())
        .bind(report.report_type.as_str())
        .bind(&report.executive_summary)
        .bind(report.recommendation.map(|r| r.as_str()))
        .bind(content.map(|c| Json(&c.swot)))
        .bind(content.map(|c| Json(&c.market_analysis)))
        .bind(content.map(|c| Json(&c.competition_analysis)))
        .bind(content.map(|c| Json(&c.financial_analysis)))
        .bind(content.map(|c| Json(&c.risk_assessment)))
        .bind(content.map(|c| Json(&c.action_items)))
        .bind(content.map(|c| Json(&c.key_insights)))
        .bind(report.created_at)
        .bind(report.updated_at)
        .bind(report.completed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
