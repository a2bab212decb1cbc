//! In-memory fixture store (mock mode)
//!
//! Serves one representative record per entity type so clients can be
//! developed without a SQL Server, and doubles as the store of the test
//! suite. Writes follow the same rules as the SQL implementation.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use shared::{
    name_contains, names_match, target_weight, BatchDetailLine, BatchStatus, CancelTarget,
    Category, ClientSummary, FinishedProduct, FinishedProductDetail, FinishedProductDraft,
    IngredientDraft, IngredientFilter, IngredientListing, PendingBatch, PendingLine,
    ProductFilter, RecipeLine, RecipeLineDraft, ScheduleCommand, StatusFilter, StoreMode,
    Supplier, UnitOfMeasure, UserCredentials, UserProfile, WeighIn, WeighOutcome,
};

use super::weighing::{record_weigh, WeighingSteps};
use super::DataStore;
use crate::error::{AppError, AppResult};

/// bcrypt cost of fixture users; low so tests stay fast
const FIXTURE_BCRYPT_COST: u32 = 4;

/// In-memory store
#[derive(Clone, Default)]
pub struct FixtureStore {
    data: Arc<Mutex<FixtureData>>,
}

#[derive(Debug, Clone)]
struct FixtureData {
    clients: Vec<ClientRow>,
    categories: Vec<Category>,
    suppliers: Vec<Supplier>,
    units: Vec<UnitOfMeasure>,
    ingredients: Vec<IngredientRow>,
    products: Vec<ProductRow>,
    batches: Vec<BatchRow>,
    lines: Vec<LineRow>,
    users: Vec<UserCredentials>,
    next_ingredient_id: i32,
    next_consecutivo: i32,
}

#[derive(Debug, Clone)]
struct ClientRow {
    id: i32,
    nombre: String,
    activo: bool,
}

#[derive(Debug, Clone)]
struct IngredientRow {
    id: i32,
    nombre: String,
    descripcion: Option<String>,
    categoria_id: i32,
    activo: bool,
}

#[derive(Debug, Clone)]
struct ProductRow {
    codigo_producto: String,
    nombre: String,
    cliente_id: Option<i32>,
    descripcion: Option<String>,
    activo: bool,
    recipe: Vec<RecipeLineDraft>,
}

#[derive(Debug, Clone)]
struct BatchRow {
    consecutivo: i32,
    codigo_producto: String,
    lote: String,
    cancelado: bool,
    fecha_programada: NaiveDate,
    linea_mezclado: Option<String>,
    produccion_inicio: Option<NaiveDateTime>,
    produccion_final: Option<NaiveDateTime>,
    lote_completado: bool,
}

#[derive(Debug, Clone)]
struct LineRow {
    consecutivo: i32,
    producto_terminado: String,
    secuencia: i32,
    ingrediente_id: i32,
    peso_objetivo: Decimal,
    porcentaje: Decimal,
    tara: Option<Decimal>,
    peso: Option<Decimal>,
    tiempo_de_pesado: Option<NaiveDateTime>,
    etiqueta: Option<String>,
    foto: Option<Vec<u8>>,
}

impl Default for FixtureData {
    fn default() -> Self {
        Self {
            clients: Vec::new(),
            categories: Vec::new(),
            suppliers: Vec::new(),
            units: Vec::new(),
            ingredients: Vec::new(),
            products: Vec::new(),
            batches: Vec::new(),
            lines: Vec::new(),
            users: Vec::new(),
            next_ingredient_id: 1,
            next_consecutivo: 1,
        }
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl FixtureStore {
    /// Store without any data
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store with one representative record per entity type
    pub fn seeded() -> Self {
        let mut data = FixtureData::default();

        data.clients.push(ClientRow {
            id: 1,
            nombre: "Panificadora del Norte".to_string(),
            activo: true,
        });
        data.categories.push(Category {
            id: 1,
            nombre: "Harinas".to_string(),
        });
        data.suppliers.push(Supplier {
            id: 1,
            nombre: "Molinos Unidos".to_string(),
            contacto: Some("Laura Méndez".to_string()),
            telefono: Some("555-0100".to_string()),
            activo: true,
        });
        data.units.push(UnitOfMeasure {
            id: 1,
            nombre: "Kilogramo".to_string(),
            abreviatura: "kg".to_string(),
            activo: true,
        });
        data.ingredients.push(IngredientRow {
            id: 1,
            nombre: "Harina de trigo".to_string(),
            descripcion: Some("Harina refinada para panificación".to_string()),
            categoria_id: 1,
            activo: true,
        });
        data.next_ingredient_id = 2;

        data.products.push(ProductRow {
            codigo_producto: "PT-001".to_string(),
            nombre: "Mezcla para pan blanco".to_string(),
            cliente_id: Some(1),
            descripcion: None,
            activo: true,
            recipe: vec![RecipeLineDraft {
                ingrediente_id: 1,
                porcentaje: Decimal::from(100),
            }],
        });

        let fecha = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
        data.batches.push(BatchRow {
            consecutivo: 1,
            codigo_producto: "PT-001".to_string(),
            lote: "PT-001-240115-01".to_string(),
            cancelado: false,
            fecha_programada: fecha,
            linea_mezclado: Some("Línea 1".to_string()),
            produccion_inicio: None,
            produccion_final: None,
            lote_completado: false,
        });
        data.lines.push(LineRow {
            consecutivo: 1,
            producto_terminado: "PT-001".to_string(),
            secuencia: 1,
            ingrediente_id: 1,
            peso_objetivo: Decimal::from(25),
            porcentaje: Decimal::from(100),
            tara: None,
            peso: None,
            tiempo_de_pesado: None,
            etiqueta: None,
            foto: None,
        });
        data.next_consecutivo = 2;

        if let Ok(hash) = bcrypt::hash("demo", FIXTURE_BCRYPT_COST) {
            data.users.push(UserCredentials {
                username: "demo".to_string(),
                password_hash: hash,
                activo: true,
                profile: UserProfile {
                    nombre: "Usuario Demo".to_string(),
                    correo: Some("demo@planta.local".to_string()),
                    plan_activo: true,
                },
            });
        }

        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Add a user whose password is hashed with bcrypt
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        activo: bool,
        profile: UserProfile,
    ) -> AppResult<()> {
        let password_hash = bcrypt::hash(password, FIXTURE_BCRYPT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        self.data.lock().await.users.push(UserCredentials {
            username: username.to_string(),
            password_hash,
            activo,
            profile,
        });
        Ok(())
    }

    /// Add a client
    pub async fn add_client(&self, id: i32, nombre: &str, activo: bool) {
        self.data.lock().await.clients.push(ClientRow {
            id,
            nombre: nombre.to_string(),
            activo,
        });
    }

    /// Add an ingredient category
    pub async fn add_category(&self, id: i32, nombre: &str) {
        self.data.lock().await.categories.push(Category {
            id,
            nombre: nombre.to_string(),
        });
    }

    /// Add a unit of measure
    pub async fn add_unit(&self, id: i32, nombre: &str, abreviatura: &str, activo: bool) {
        self.data.lock().await.units.push(UnitOfMeasure {
            id,
            nombre: nombre.to_string(),
            abreviatura: abreviatura.to_string(),
            activo,
        });
    }
}

impl FixtureData {
    fn ingredient_name(&self, id: i32) -> Option<String> {
        self.ingredients
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.nombre.clone())
    }

    fn pending_count(&self, consecutivo: i32) -> i32 {
        self.lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo && l.tiempo_de_pesado.is_none())
            .count() as i32
    }

    fn total_count(&self, consecutivo: i32) -> i32 {
        self.lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo)
            .count() as i32
    }

    fn product_detail(&self, product: &ProductRow) -> FinishedProductDetail {
        let cliente = product.cliente_id.and_then(|id| {
            self.clients
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.nombre.clone())
        });

        FinishedProductDetail {
            producto: FinishedProduct {
                codigo_producto: product.codigo_producto.clone(),
                nombre: product.nombre.clone(),
                cliente_id: product.cliente_id,
                cliente,
                descripcion: product.descripcion.clone(),
                activo: product.activo,
            },
            ingredientes: product
                .recipe
                .iter()
                .enumerate()
                .map(|(index, line)| RecipeLine {
                    secuencia: index as i32 + 1,
                    ingrediente_id: line.ingrediente_id,
                    ingrediente: self.ingredient_name(line.ingrediente_id),
                    porcentaje: line.porcentaje,
                })
                .collect(),
        }
    }
}

/// Rows of one batch copied out of the fixture data. The weighing steps work
/// on the copy and [`FixtureData::apply`] writes it back.
struct DraftWeighing {
    consecutivo: i32,
    batch: Option<BatchRow>,
    lines: Vec<LineRow>,
    ingredient_names: HashMap<i32, String>,
}

impl FixtureData {
    fn weighing_draft(&self, consecutivo: i32) -> DraftWeighing {
        let lines: Vec<LineRow> = self
            .lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo)
            .cloned()
            .collect();
        let ingredient_names = lines
            .iter()
            .filter_map(|l| {
                self.ingredient_name(l.ingrediente_id)
                    .map(|name| (l.ingrediente_id, name))
            })
            .collect();

        DraftWeighing {
            consecutivo,
            batch: self
                .batches
                .iter()
                .find(|b| b.consecutivo == consecutivo)
                .cloned(),
            lines,
            ingredient_names,
        }
    }

    fn apply(&mut self, draft: DraftWeighing) {
        if let Some(batch) = draft.batch {
            if let Some(row) = self
                .batches
                .iter_mut()
                .find(|b| b.consecutivo == batch.consecutivo)
            {
                *row = batch;
            }
        }

        // Same filter as `weighing_draft`, so rows line up in order
        let mut weighed = draft.lines.into_iter();
        for line in self
            .lines
            .iter_mut()
            .filter(|l| l.consecutivo == draft.consecutivo)
        {
            if let Some(updated) = weighed.next() {
                *line = updated;
            }
        }
    }
}

/// Run one weigh-in on `steps` and write the draft back only when every step
/// succeeded
async fn weigh_on_draft<S>(
    data: &mut FixtureData,
    mut steps: S,
    weigh: &WeighIn,
) -> AppResult<WeighOutcome>
where
    S: WeighingSteps + Into<DraftWeighing>,
{
    let outcome = record_weigh(&mut steps, weigh).await?;
    data.apply(steps.into());
    Ok(outcome)
}

#[async_trait]
impl WeighingSteps for DraftWeighing {
    async fn update_line(&mut self, weigh: &WeighIn) -> AppResult<u64> {
        let open = self
            .batch
            .as_ref()
            .is_some_and(|b| b.consecutivo == weigh.consecutivo && !b.cancelado);
        if !open {
            return Ok(0);
        }

        let stamp = now();
        let mut updated = 0;
        for line in self.lines.iter_mut().filter(|l| {
            l.consecutivo == weigh.consecutivo
                && l.producto_terminado.eq_ignore_ascii_case(&weigh.producto_terminado)
                && l.secuencia == weigh.secuencia
                && l.ingrediente_id == weigh.ingrediente_id
        }) {
            line.tara = Some(weigh.tara);
            line.peso = Some(weigh.peso);
            line.tiempo_de_pesado = Some(stamp);
            line.etiqueta = weigh.etiqueta.clone();
            line.foto = weigh.foto.clone();
            updated += 1;
        }
        Ok(updated)
    }

    async fn stamp_production_start(&mut self, consecutivo: i32) -> AppResult<()> {
        if let Some(batch) = self
            .batch
            .as_mut()
            .filter(|b| b.consecutivo == consecutivo && b.produccion_inicio.is_none())
        {
            batch.produccion_inicio = Some(now());
        }
        Ok(())
    }

    async fn count_pending(&mut self, consecutivo: i32) -> AppResult<i32> {
        Ok(self
            .lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo && l.tiempo_de_pesado.is_none())
            .count() as i32)
    }

    async fn mark_completed(&mut self, consecutivo: i32) -> AppResult<()> {
        if let Some(batch) = self.batch.as_mut().filter(|b| b.consecutivo == consecutivo) {
            batch.produccion_final = Some(now());
            batch.lote_completado = true;
        }
        Ok(())
    }

    async fn next_pending(&mut self, consecutivo: i32) -> AppResult<Option<PendingLine>> {
        let next = self
            .lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo && l.tiempo_de_pesado.is_none())
            .min_by_key(|l| l.secuencia)
            .map(|l| PendingLine {
                secuencia: l.secuencia,
                ingrediente_id: l.ingrediente_id,
                ingrediente: self.ingredient_names.get(&l.ingrediente_id).cloned(),
                peso_objetivo: l.peso_objetivo,
                porcentaje: l.porcentaje,
            });
        Ok(next)
    }
}

#[async_trait]
impl DataStore for FixtureStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Fixture
    }

    async fn is_connected(&self) -> bool {
        false
    }

    async fn find_user(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let data = self.data.lock().await;
        Ok(data
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username.trim()))
            .cloned())
    }

    async fn active_clients(&self) -> AppResult<Vec<ClientSummary>> {
        let data = self.data.lock().await;
        let mut clients: Vec<ClientSummary> = data
            .clients
            .iter()
            .filter(|c| c.activo)
            .map(|c| ClientSummary {
                identificador: c.id,
                cliente: c.nombre.clone(),
            })
            .collect();
        clients.sort_by(|a, b| a.cliente.cmp(&b.cliente));
        Ok(clients)
    }

    async fn categories(&self) -> AppResult<Vec<Category>> {
        let data = self.data.lock().await;
        let mut categories = data.categories.clone();
        categories.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(categories)
    }

    async fn suppliers(&self, estado: StatusFilter) -> AppResult<Vec<Supplier>> {
        let data = self.data.lock().await;
        let mut suppliers: Vec<Supplier> = data
            .suppliers
            .iter()
            .filter(|s| estado.matches(s.activo))
            .cloned()
            .collect();
        suppliers.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(suppliers)
    }

    async fn active_units(&self) -> AppResult<Vec<UnitOfMeasure>> {
        let data = self.data.lock().await;
        Ok(data.units.iter().filter(|u| u.activo).cloned().collect())
    }

    async fn unit_is_active(&self, id: i32) -> AppResult<bool> {
        let data = self.data.lock().await;
        Ok(data.units.iter().any(|u| u.id == id && u.activo))
    }

    async fn list_ingredients(&self, filter: &IngredientFilter) -> AppResult<Vec<IngredientListing>> {
        let data = self.data.lock().await;
        let mut rows: Vec<IngredientListing> = data
            .ingredients
            .iter()
            .filter(|i| filter.estado.matches(i.activo))
            .filter(|i| filter.categoria_id.map_or(true, |c| i.categoria_id == c))
            .filter(|i| {
                filter
                    .nombre
                    .as_deref()
                    .map_or(true, |n| name_contains(&i.nombre, n))
            })
            .map(|i| IngredientListing {
                id: i.id,
                nombre: i.nombre.clone(),
                activo: i.activo,
                categoria: data
                    .categories
                    .iter()
                    .find(|c| c.id == i.categoria_id)
                    .map(|c| c.nombre.clone()),
                descripcion: i.descripcion.clone(),
            })
            .collect();
        rows.sort_by_key(|r| r.nombre.to_lowercase());
        Ok(rows)
    }

    async fn ingredient_name_taken(&self, nombre: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let data = self.data.lock().await;
        Ok(data
            .ingredients
            .iter()
            .any(|i| Some(i.id) != exclude_id && names_match(&i.nombre, nombre)))
    }

    async fn ingredient_exists(&self, id: i32) -> AppResult<bool> {
        let data = self.data.lock().await;
        Ok(data.ingredients.iter().any(|i| i.id == id))
    }

    async fn create_ingredient(&self, draft: &IngredientDraft) -> AppResult<i32> {
        let mut data = self.data.lock().await;
        if data.ingredients.iter().any(|i| names_match(&i.nombre, &draft.nombre)) {
            return Err(AppError::DuplicateEntry("Nombre".to_string()));
        }

        let id = data.next_ingredient_id;
        data.next_ingredient_id += 1;
        data.ingredients.push(IngredientRow {
            id,
            nombre: draft.nombre.clone(),
            descripcion: draft.descripcion.clone(),
            categoria_id: draft.categoria_id,
            activo: draft.activo,
        });
        Ok(id)
    }

    async fn update_ingredient(&self, id: i32, draft: &IngredientDraft) -> AppResult<bool> {
        let mut data = self.data.lock().await;
        if data
            .ingredients
            .iter()
            .any(|i| i.id != id && names_match(&i.nombre, &draft.nombre))
        {
            return Err(AppError::DuplicateEntry("Nombre".to_string()));
        }

        match data.ingredients.iter_mut().find(|i| i.id == id) {
            Some(row) => {
                row.nombre = draft.nombre.clone();
                row.descripcion = draft.descripcion.clone();
                row.categoria_id = draft.categoria_id;
                row.activo = draft.activo;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_finished_products(&self, filter: &ProductFilter) -> AppResult<Vec<FinishedProduct>> {
        let data = self.data.lock().await;
        let mut rows: Vec<FinishedProduct> = data
            .products
            .iter()
            .filter(|p| filter.estado.matches(p.activo))
            .filter(|p| filter.cliente_id.map_or(true, |c| p.cliente_id == Some(c)))
            .filter(|p| {
                filter
                    .nombre
                    .as_deref()
                    .map_or(true, |n| name_contains(&p.nombre, n))
            })
            .map(|p| data.product_detail(p).producto)
            .collect();
        rows.sort_by_key(|r| r.nombre.to_lowercase());
        Ok(rows)
    }

    async fn finished_product(&self, codigo: &str) -> AppResult<Option<FinishedProductDetail>> {
        let data = self.data.lock().await;
        Ok(data
            .products
            .iter()
            .find(|p| p.codigo_producto.eq_ignore_ascii_case(codigo))
            .map(|p| data.product_detail(p)))
    }

    async fn register_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<()> {
        let mut data = self.data.lock().await;
        if data
            .products
            .iter()
            .any(|p| p.codigo_producto.eq_ignore_ascii_case(&draft.codigo_producto))
        {
            return Err(AppError::DuplicateEntry("CodigoProducto".to_string()));
        }

        data.products.push(ProductRow {
            codigo_producto: draft.codigo_producto.clone(),
            nombre: draft.nombre.clone(),
            cliente_id: draft.cliente_id,
            descripcion: draft.descripcion.clone(),
            activo: draft.activo,
            recipe: draft.ingredientes.clone(),
        });
        Ok(())
    }

    async fn edit_finished_product(&self, draft: &FinishedProductDraft) -> AppResult<bool> {
        let mut data = self.data.lock().await;
        match data
            .products
            .iter_mut()
            .find(|p| p.codigo_producto.eq_ignore_ascii_case(&draft.codigo_producto))
        {
            Some(product) => {
                product.nombre = draft.nombre.clone();
                product.cliente_id = draft.cliente_id;
                product.descripcion = draft.descripcion.clone();
                product.activo = draft.activo;
                product.recipe = draft.ingredientes.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn schedule_batches(&self, command: &ScheduleCommand) -> AppResult<()> {
        let mut data = self.data.lock().await;
        let product = data
            .products
            .iter()
            .find(|p| p.codigo_producto.eq_ignore_ascii_case(&command.codigo_producto))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Finished product".to_string()))?;

        for lot in 1..=command.cantidad_lotes {
            let consecutivo = data.next_consecutivo;
            data.next_consecutivo += 1;

            data.batches.push(BatchRow {
                consecutivo,
                codigo_producto: product.codigo_producto.clone(),
                lote: format!(
                    "{}-{}-{:02}",
                    product.codigo_producto,
                    command.fecha_programada.format("%y%m%d"),
                    lot
                ),
                cancelado: false,
                fecha_programada: command.fecha_programada,
                linea_mezclado: None,
                produccion_inicio: None,
                produccion_final: None,
                lote_completado: false,
            });

            for (index, line) in product.recipe.iter().enumerate() {
                data.lines.push(LineRow {
                    consecutivo,
                    producto_terminado: product.codigo_producto.clone(),
                    secuencia: index as i32 + 1,
                    ingrediente_id: line.ingrediente_id,
                    peso_objetivo: target_weight(command.peso_por_lote, line.porcentaje),
                    porcentaje: line.porcentaje,
                    tara: None,
                    peso: None,
                    tiempo_de_pesado: None,
                    etiqueta: None,
                    foto: None,
                });
            }
        }
        Ok(())
    }

    async fn pending_batches(&self, fecha: Option<NaiveDate>) -> AppResult<Vec<PendingBatch>> {
        let data = self.data.lock().await;
        let mut batches: Vec<PendingBatch> = data
            .batches
            .iter()
            .filter(|b| !b.cancelado && !b.lote_completado)
            .filter(|b| fecha.map_or(true, |f| b.fecha_programada == f))
            .map(|b| PendingBatch {
                consecutivo: b.consecutivo,
                producto_terminado: b.codigo_producto.clone(),
                producto: data
                    .products
                    .iter()
                    .find(|p| p.codigo_producto == b.codigo_producto)
                    .map(|p| p.nombre.clone()),
                lote: b.lote.clone(),
                fecha_programada: Some(b.fecha_programada),
                linea_mezclado: b.linea_mezclado.clone(),
                lineas_pendientes: data.pending_count(b.consecutivo),
                total_lineas: data.total_count(b.consecutivo),
            })
            .collect();
        batches.sort_by_key(|b| (b.fecha_programada, b.consecutivo));
        Ok(batches)
    }

    async fn batch_detail(&self, consecutivo: i32) -> AppResult<Vec<BatchDetailLine>> {
        let data = self.data.lock().await;
        let mut lines: Vec<BatchDetailLine> = data
            .lines
            .iter()
            .filter(|l| l.consecutivo == consecutivo)
            .map(|l| BatchDetailLine {
                consecutivo: l.consecutivo,
                producto_terminado: l.producto_terminado.clone(),
                secuencia: l.secuencia,
                ingrediente_id: l.ingrediente_id,
                ingrediente: data.ingredient_name(l.ingrediente_id),
                peso_objetivo: l.peso_objetivo,
                porcentaje: l.porcentaje,
                tara: l.tara,
                peso: l.peso,
                tiempo_de_pesado: l.tiempo_de_pesado,
                etiqueta: l.etiqueta.clone(),
                tiene_foto: l.foto.is_some(),
            })
            .collect();
        lines.sort_by_key(|l| l.secuencia);
        Ok(lines)
    }

    async fn batch_status(&self, consecutivo: i32) -> AppResult<Option<BatchStatus>> {
        let data = self.data.lock().await;
        Ok(data
            .batches
            .iter()
            .find(|b| b.consecutivo == consecutivo)
            .map(|b| BatchStatus {
                consecutivo: b.consecutivo,
                producto_terminado: b.codigo_producto.clone(),
                lote: b.lote.clone(),
                cancelado: b.cancelado,
                fecha_programada: Some(b.fecha_programada),
                linea_mezclado: b.linea_mezclado.clone(),
                produccion_inicio: b.produccion_inicio,
                produccion_final: b.produccion_final,
                lote_completado: b.lote_completado,
                lineas_pendientes: data.pending_count(b.consecutivo),
            }))
    }

    async fn cancel_batches(&self, target: CancelTarget) -> AppResult<u64> {
        let mut data = self.data.lock().await;
        let mut canceled = 0;
        for batch in data
            .batches
            .iter_mut()
            .filter(|b| target.contains(b.consecutivo) && !b.cancelado && !b.lote_completado)
        {
            batch.cancelado = true;
            canceled += 1;
        }
        Ok(canceled)
    }

    async fn record_weigh(&self, weigh: &WeighIn) -> AppResult<WeighOutcome> {
        let mut data = self.data.lock().await;
        let draft = data.weighing_draft(weigh.consecutivo);
        weigh_on_draft(&mut data, draft, weigh).await
    }
}
