//! Finished products and their recipes

use async_trait::async_trait;
use tiberius::{Query, Row};

use shared::{
    FinishedProduct, FinishedProductDetail, FinishedProductDraft, ProductFilter, RecipeLine,
};

use super::rows::{get, numeric, require, require_text, text};
use super::unit_of_work::{execute, DbClient, UnitOfWork};
use super::{duplicate_as, MssqlStore};
use crate::error::AppResult;

const PRODUCT_COLUMNS: &str = r#"
    SELECT p.CodigoProducto, p.Nombre, p.ClienteId, c.Nombre AS Cliente,
           p.Descripcion, p.Activo
    FROM dbo.ProductosTerminados p
    LEFT JOIN dbo.Clientes c ON c.Id = p.ClienteId
"#;

fn product_from_row(row: &Row) -> AppResult<FinishedProduct> {
    Ok(FinishedProduct {
        codigo_producto: require_text(row, "CodigoProducto")?,
        nombre: require_text(row, "Nombre")?,
        cliente_id: get(row, "ClienteId")?,
        cliente: text(row, "Cliente")?,
        descripcion: text(row, "Descripcion")?,
        activo: get(row, "Activo")?.unwrap_or(false),
    })
}

fn recipe_line_from_row(row: &Row) -> AppResult<RecipeLine> {
    Ok(RecipeLine {
        secuencia: require(row, "Secuencia")?,
        ingrediente_id: require(row, "IngredienteId")?,
        ingrediente: text(row, "Ingrediente")?,
        porcentaje: require(row, "Porcentaje")?,
    })
}

/// Header plus recipe lines
struct RegisterProduct<'a> {
    draft: &'a FinishedProductDraft,
}

#[async_trait]
impl UnitOfWork for RegisterProduct<'_> {
    type Output = ();

    async fn run(&self, client: &mut DbClient) -> AppResult<()> {
        let draft = self.draft;
        let mut insert = Query::new(
            r#"
            INSERT INTO dbo.ProductosTerminados (CodigoProducto, Nombre, ClienteId, Descripcion, Activo)
            VALUES (@P1, @P2, @P3, @P4, @P5)
            "#,
        );
        insert.bind(draft.codigo_producto.as_str());
        insert.bind(draft.nombre.as_str());
        insert.bind(draft.cliente_id);
        insert.bind(draft.descripcion.as_deref());
        insert.bind(draft.activo);
        insert.execute(&mut *client).await?;

        insert_recipe(client, draft).await
    }
}

/// Header update plus full recipe replacement
struct EditProduct<'a> {
    draft: &'a FinishedProductDraft,
}

#[async_trait]
impl UnitOfWork for EditProduct<'_> {
    type Output = bool;

    async fn run(&self, client: &mut DbClient) -> AppResult<bool> {
        let draft = self.draft;
        let mut update = Query::new(
            r#"
            UPDATE dbo.ProductosTerminados
            SET Nombre = @P2, ClienteId = @P3, Descripcion = @P4, Activo = @P5
            WHERE CodigoProducto = @P1
            "#,
        );
        update.bind(draft.codigo_producto.as_str());
        update.bind(draft.nombre.as_str());
        update.bind(draft.cliente_id);
        update.bind(draft.descripcion.as_deref());
        update.bind(draft.activo);
        if update.execute(&mut *client).await?.total() == 0 {
            return Ok(false);
        }

        let mut delete =
            Query::new("DELETE FROM dbo.ProductosTerminados_Detalle WHERE CodigoProducto = @P1");
        delete.bind(draft.codigo_producto.as_str());
        delete.execute(&mut *client).await?;

        insert_recipe(client, draft).await?;
        Ok(true)
    }
}

async fn insert_recipe(client: &mut DbClient, draft: &FinishedProductDraft) -> AppResult<()> {
    for (index, line) in draft.ingredientes.iter().enumerate() {
        let mut insert = Query::new(
            r#"
            INSERT INTO dbo.ProductosTerminados_Detalle (CodigoProducto, Secuencia, IngredienteId, Porcentaje)
            VALUES (@P1, @P2, @P3, @P4)
            "#,
        );
        insert.bind(draft.codigo_producto.as_str());
        insert.bind(index as i32 + 1);
        insert.bind(line.ingrediente_id);
        insert.bind(numeric(line.porcentaje));
        insert.execute(&mut *client).await?;
    }
    Ok(())
}

impl MssqlStore {
    pub(super) async fn query_finished_products(
        &self,
        filter: &ProductFilter,
    ) -> AppResult<Vec<FinishedProduct>> {
        let mut sql = format!("{} WHERE 1 = 1", PRODUCT_COLUMNS);
        let mut next_param = 1;
        if filter.nombre.is_some() {
            sql.push_str(&format!(" AND p.Nombre LIKE '%' + @P{} + '%'", next_param));
            next_param += 1;
        }
        if filter.cliente_id.is_some() {
            sql.push_str(&format!(" AND p.ClienteId = @P{}", next_param));
            next_param += 1;
        }
        if filter.estado.as_bit().is_some() {
            sql.push_str(&format!(" AND p.Activo = @P{}", next_param));
        }
        sql.push_str(" ORDER BY p.Nombre");

        let mut query = Query::new(sql);
        if let Some(nombre) = filter.nombre.as_deref() {
            query.bind(nombre);
        }
        if let Some(cliente_id) = filter.cliente_id {
            query.bind(cliente_id);
        }
        if let Some(activo) = filter.estado.as_bit() {
            query.bind(activo);
        }

        let mut conn = self.pool.get().await?;
        let rows = query.query(&mut *conn).await?.into_first_result().await?;
        rows.iter().map(product_from_row).collect()
    }

    pub(super) async fn query_finished_product(
        &self,
        codigo: &str,
    ) -> AppResult<Option<FinishedProductDetail>> {
        let mut conn = self.pool.get().await?;

        let mut header = Query::new(format!("{} WHERE p.CodigoProducto = @P1", PRODUCT_COLUMNS));
        header.bind(codigo);
        let producto = match header.query(&mut *conn).await?.into_row().await? {
            Some(row) => product_from_row(&row)?,
            None => return Ok(None),
        };

        let mut recipe = Query::new(
            r#"
            SELECT d.Secuencia, d.IngredienteId, i.Nombre AS Ingrediente, d.Porcentaje
            FROM dbo.ProductosTerminados_Detalle d
            LEFT JOIN dbo.Ingredientes i ON i.Id = d.IngredienteId
            WHERE d.CodigoProducto = @P1
            ORDER BY d.Secuencia
            "#,
        );
        recipe.bind(producto.codigo_producto.as_str());
        let rows = recipe.query(&mut *conn).await?.into_first_result().await?;

        let ingredientes = rows
            .iter()
            .map(recipe_line_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(FinishedProductDetail {
            producto,
            ingredientes,
        }))
    }

    pub(super) async fn insert_finished_product(
        &self,
        draft: &FinishedProductDraft,
    ) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        execute(&mut *conn, &RegisterProduct { draft })
            .await
            .map_err(duplicate_as("CodigoProducto"))
    }

    pub(super) async fn replace_finished_product(
        &self,
        draft: &FinishedProductDraft,
    ) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;
        execute(&mut *conn, &EditProduct { draft }).await
    }
}
