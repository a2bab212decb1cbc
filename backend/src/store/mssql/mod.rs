//! SQL Server store
//!
//! One bb8 pool of tiberius clients, owned by the store and created once at
//! startup. The pool is built unchecked: no connection is opened until the
//! first request needs one, and broken connections are replaced on demand.

use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use chrono::NaiveDate;
use std::time::Duration;
use tiberius::{AuthMethod, EncryptionLevel, Query, Row};

use shared::{
    BatchDetailLine, BatchStatus, CancelTarget, Category, ClientSummary, FinishedProduct,
    FinishedProductDetail, FinishedProductDraft, IngredientDraft, IngredientFilter,
    IngredientListing, PendingBatch, ProductFilter, ScheduleCommand, StatusFilter, StoreMode,
    Supplier, UnitOfMeasure, UserCredentials, UserProfile, WeighIn, WeighOutcome,
};

use super::DataStore;
use crate::config::{DatabaseConfig, DatabaseCredentials};
use crate::error::{AppError, AppResult};
use rows::{get, require, require_text, text};

mod batches;
mod products;
mod rows;
pub(crate) mod unit_of_work;

/// Pool of SQL Server connections
pub type DbPool = Pool<ConnectionManager>;

/// SQL Server error numbers for unique constraint and unique index violations
const UNIQUE_VIOLATIONS: [u32; 2] = [2627, 2601];

/// Live store backed by SQL Server
#[derive(Clone)]
pub struct MssqlStore {
    pool: DbPool,
}

/// Build the tiberius client configuration
fn client_config(config: &DatabaseConfig, credentials: &DatabaseCredentials) -> tiberius::Config {
    let mut sql_config = tiberius::Config::new();
    sql_config.host(&credentials.host);
    sql_config.port(config.port);
    sql_config.database(&credentials.database);
    sql_config.authentication(AuthMethod::sql_server(
        &credentials.user,
        &credentials.password,
    ));

    if config.encrypt {
        sql_config.encryption(EncryptionLevel::Required);
    } else {
        sql_config.encryption(EncryptionLevel::NotSupported);
    }

    if config.trust_server_certificate {
        sql_config.trust_cert();
    }

    sql_config
}

/// Whether a database error is a unique key violation
fn is_unique_violation(err: &tiberius::error::Error) -> bool {
    match err {
        tiberius::error::Error::Server(token) => UNIQUE_VIOLATIONS.contains(&token.code()),
        _ => false,
    }
}

/// Report a unique key violation as a duplicate of `field`
fn duplicate_as(field: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| match err {
        AppError::DatabaseError(ref db) if is_unique_violation(db) => {
            AppError::DuplicateEntry(field.to_string())
        }
        other => other,
    }
}

fn user_from_row(row: &Row) -> AppResult<UserCredentials> {
    Ok(UserCredentials {
        username: require_text(row, "Username")?,
        password_hash: require_text(row, "PasswordHash")?,
        activo: get(row, "Activo")?.unwrap_or(false),
        profile: UserProfile {
            nombre: require_text(row, "Nombre")?,
            correo: text(row, "Correo")?,
            plan_activo: get(row, "PlanActivo")?.unwrap_or(false),
        },
    })
}

fn client_from_row(row: &Row) -> AppResult<ClientSummary> {
    Ok(ClientSummary {
        identificador: require(row, "Id")?,
        cliente: require_text(row, "Nombre")?,
    })
}

fn category_from_row(row: &Row) -> AppResult<Category> {
    Ok(Category {
        id: require(row, "Id")?,
        nombre: require_text(row, "Nombre")?,
    })
}

fn supplier_from_row(row: &Row) -> AppResult<Supplier> {
    Ok(Supplier {
        id: require(row, "Id")?,
        nombre: require_text(row, "Nombre")?,
        contacto: text(row, "Contacto")?,
        telefono: text(row, "Telefono")?,
        activo: get(row, "Activo")?.unwrap_or(false),
    })
}

fn unit_from_row(row: &Row) -> AppResult<UnitOfMeasure> {
    Ok(UnitOfMeasure {
        id: require(row, "Id")?,
        nombre: require_text(row, "Nombre")?,
        abreviatura: require_text(row, "Abreviatura")?,
        activo: get(row, "Activo")?.unwrap_or(false),
    })
}

fn ingredient_from_row(row: &Row) -> AppResult<IngredientListing> {
    Ok(IngredientListing {
        id: require(row, "Id")?,
        nombre: require_text(row, "Nombre")?,
        activo: get(row, "Activo")?.unwrap_or(false),
        categoria: text(row, "Categoria")?,
        descripcion: text(row, "Descripcion")?,
    })
}

impl MssqlStore {
    /// Create the store with a lazily connecting pool
    pub fn connect(config: &DatabaseConfig, credentials: &DatabaseCredentials) -> anyhow::Result<Self> {
        let manager = ConnectionManager::new(client_config(config, credentials));

        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build_unchecked(manager);

        Ok(Self { pool })
    }

    async fn count(&self, query: Query<'_>) -> AppResult<i32> {
        let mut conn = self.pool.get().await?;
        let row = query.query(&mut *conn).await?.into_row().await?;
        let total = match row {
            Some(row) => require(&row, "Total")?,
            None => 0,
        };
        Ok(total)
    }
}

#[async_trait]
impl DataStore for MssqlStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Live
    }

    async fn is_connected(&self) -> bool {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Database health check could not get a connection: {}", e);
                return false;
            }
        };

        let ping = match Query::new("SELECT 1 AS Ok").query(&mut *conn).await {
            Ok(stream) => stream.into_row().await,
            Err(e) => Err(e),
        };

        match ping {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                false
            }
        }
    }

    async fn find_user(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let mut query = Query::new(
            r#"
            SELECT Username, PasswordHash, Nombre, Correo, PlanActivo, Activo
            FROM dbo.Usuarios
            WHERE Username = @P1
            "#,
        );
        query.bind(username.trim());

        let mut conn = self.pool.get().await?;
        let row = query.query(&mut *conn).await?.into_row().await?;
        let user = match row {
            Some(row) => Some(user_from_row(&row)?),
            None => None,
        };
        Ok(user)
    }

    async fn active_clients(&self) -> AppResult<Vec<ClientSummary>> {
        let mut conn = self.pool.get().await?;
        let rows = Query::new("SELECT Id, Nombre FROM dbo.Clientes WHERE Activo = 1 ORDER BY Nombre")
            .query(&mut *conn)
            .await?
            .into_first_result()
            .await?;

        rows.iter().map(client_from_row).collect()
    }

    async fn categories(&self) -> AppResult<Vec<Category>> {
        let mut conn = self.pool.get().await?;
        let rows = Query::new("SELECT Id, Nombre FROM dbo.Categorias ORDER BY Nombre")
            .query(&mut *conn)
            .await?
            .into_first_result()
            .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn suppliers(&self, estado: StatusFilter) -> AppResult<Vec<Supplier>> {
        let mut sql = String::from("SELECT Id, Nombre, Contacto, Telefono, Activo FROM dbo.Proveedores");
        if estado.as_bit().is_some() {
            sql.push_str(" WHERE Activo = @P1");
        }
        sql.push_str(" ORDER BY Nombre");

        let mut query = Query::new(sql);
        if let Some(activo) = estado.as_bit() {
            query.bind(activo);
        }

        let mut conn = self.pool.get().await?;
        let rows = query.query(&mut *conn).await?.into_first_result().await?;
        rows.iter().map(supplier_from_row).collect()
    }

    async fn active_units(&self) -> AppResult<Vec<UnitOfMeasure>> {
        let mut conn = self.pool.get().await?;
        let rows = Query::new(
            "SELECT Id, Nombre, Abreviatura, Activo FROM dbo.UnidadesMedida WHERE Activo = 1 ORDER BY Nombre",
        )
        .query(&mut *conn)
        .await?
        .into_first_result()
        .await?;

        rows.iter().map(unit_from_row).collect()
    }

    async fn unit_is_active(&self, id: i32) -> AppResult<bool> {
        let mut query = Query::new(
            "SELECT COUNT(*) AS Total FROM dbo.UnidadesMedida WHERE Id = @P1 AND Activo = 1",
        );
        query.bind(id);
        Ok(self.count(query).await? > 0)
    }

    async fn list_ingredients(&self, filter: &IngredientFilter) -> AppResult<Vec<IngredientListing>> {
        let mut sql = String::from(
            r#"
            SELECT i.Id, i.Nombre, i.Activo, c.Nombre AS Categoria, i.Descripcion
            FROM dbo.Ingredientes i
            LEFT JOIN dbo.Categorias c ON c.Id = i.CategoriaId
            WHERE 1 = 1
            "#,
        );
        let mut next_param = 1;
        if filter.nombre.is_some() {
            sql.push_str(&format!(" AND i.Nombre LIKE '%' + @P{} + '%'", next_param));
            next_param += 1;
        }
        if filter.categoria_id.is_some() {
            sql.push_str(&format!(" AND i.CategoriaId = @P{}", next_param));
            next_param += 1;
        }
        if filter.estado.as_bit().is_some() {
            sql.push_str(&format!(" AND i.Activo = @P{}", next_param));
        }
        sql.push_str(" ORDER BY i.Nombre");

        let mut query = Query::new(sql);
        if let Some(nombre) = filter.nombre.as_deref() {
            query.bind(nombre);
        }
        if let Some(categoria_id) = filter.categoria_id {
            query.bind(categoria_id);
        }
        if let Some(activo) = filter.estado.as_bit() {
            query.bind(activo);
        }

        let mut conn = self.pool.get().await?;
        let rows = query.query(&mut *conn).await?.into_first_result().await?;
        rows.iter().map(ingredient_from_row).collect()
    }

    async fn ingredient_name_taken(&self, nombre: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let mut sql = String::from(
            "SELECT COUNT(*) AS Total FROM dbo.Ingredientes WHERE LTRIM(RTRIM(Nombre)) = @P1",
        );
        if exclude_id.is_some() {
            sql.push_str(" AND Id <> @P2");
        }

        let mut query = Query::new(sql);
        query.bind(nombre.trim());
        if let Some(id) = exclude_id {
            query.bind(id);
        }
        Ok(self.count(query).await? > 0)
    }

    async fn ingredient_exists(&self, id: i32) -> AppResult<bool> {
        let mut query = Query::new("SELECT COUNT(*) AS Total FROM dbo.Ingredientes WHERE Id = @P1");
        query.bind(id);
        Ok(self.count(query).await? > 0)
    }

    async fn create_ingredient(&self, draft: &IngredientDraft) -> AppResult<i32> {
        let mut insert = Query::new(
            r#"
            INSERT INTO dbo.Ingredientes (Nombre, Descripcion, CategoriaId, Activo)
            OUTPUT inserted.Id
            VALUES (@P1, @P2, @P3, @P4)
            "#,
        );
        insert.bind(draft.nombre.as_str());
        insert.bind(draft.descripcion.as_deref());
        insert.bind(draft.categoria_id);
        insert.bind(draft.activo);

        let mut conn = self.pool.get().await?;
        let inserted = match insert.query(&mut *conn).await {
            Ok(stream) => stream.into_row().await,
            Err(e) => Err(e),
        }
        .map_err(AppError::from)
        .map_err(duplicate_as("Nombre"))?;

        match inserted {
            Some(row) => require(&row, "Id"),
            None => Err(AppError::Internal("No Id returned from ingredient insert".to_string())),
        }
    }

    async fn update_ingredient(&self, id: i32, draft: &IngredientDraft) -> AppResult<bool> {
        let mut update = Query::new(
            r#"
            UPDATE dbo.Ingredientes
            SET Nombre = @P2, Descripcion = @P3, CategoriaId = @P4, Activo = @P5
            WHERE Id = @P1
            "#,
        );
        update.bind(id);
        update.bind(draft.nombre.as_str());
        update.bind(draft.descripcion.as_deref());
        update.bind(draft.categoria_id);
        update.bind(draft.activo);

        let mut conn = self.pool.get().await?;
        let result = update
            .execute(&mut *conn)
            .await
            .map_err(AppError::from)
            .map_err(duplicate_as("Nombre"))?;
        Ok(result.total() > 0)
    }

    async fn list_finished_products(&self, filter: &ProductFilter) -> AppResult<Vec<FinishedProduct>> {
        self.query_finished_products(filter).await
    }

    async fn finished_product(&self, codigo: &str) -> AppResult<Option<FinishedProductDetail>> {
        self.query_finished_product(codigo).await
    }

    async fn register_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<()> {
        self.insert_finished_product(draft).await
    }

    async fn edit_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<bool> {
        self.replace_finished_product(draft).await
    }

    async fn schedule_batches(&self, command: &ScheduleCommand) -> AppResult<()> {
        self.run_schedule(command).await
    }

    async fn pending_batches(&self, fecha: Option<NaiveDate>) -> AppResult<Vec<PendingBatch>> {
        self.query_pending_batches(fecha).await
    }

    async fn batch_detail(&self, consecutivo: i32) -> AppResult<Vec<BatchDetailLine>> {
        self.query_batch_detail(consecutivo).await
    }

    async fn batch_status(&self, consecutivo: i32) -> AppResult<Option<BatchStatus>> {
        self.query_batch_status(consecutivo).await
    }

    async fn cancel_batches(&self, target: CancelTarget) -> AppResult<u64> {
        self.soft_cancel(target).await
    }

    async fn record_weigh(&self, weigh: &WeighIn) -> AppResult<WeighOutcome> {
        self.run_weigh(weigh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_config() -> DatabaseConfig {
        DatabaseConfig {
            host: Some("sql.planta.local".to_string()),
            port: 1433,
            name: Some("Produccion".to_string()),
            user: Some("app".to_string()),
            password: Some("secret".to_string()),
            encrypt: true,
            trust_server_certificate: true,
            max_connections: 4,
            connection_timeout_secs: 5,
        }
    }

    #[test]
    fn test_duplicate_as_passes_through_other_errors() {
        let mapped = duplicate_as("Nombre")(AppError::NotFound("Ingredient".to_string()));
        assert!(matches!(mapped, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_connect_does_not_open_a_connection() {
        let config = database_config();
        let credentials = config.credentials().unwrap();
        let store = MssqlStore::connect(&config, &credentials).unwrap();
        assert_eq!(store.mode(), StoreMode::Live);
        assert_eq!(store.pool.state().connections, 0);
    }
}
