//! Generic specification-driven repository with a staged change set.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, QueryTrait, TransactionTrait,
};

use common::{AppError, AppResult};
use domain::{BaseEntity, ProjectedSpecification, Specification, SpecificationEvaluator};

use super::context::StoreContext;
use super::query::{EntitySelect, ProjectedSelect};
use super::stored::StoredEntity;

/// Repository over any entity type.
///
/// Reads go straight to the store. Writes are staged in memory by
/// `create`/`update`/`delete` and only reach the store on `commit`.
#[async_trait]
pub trait GenericRepository<T: BaseEntity>: Send + Sync {
    /// Identity lookup
    async fn get_by_id(&self, id: i32) -> AppResult<Option<T>>;

    /// Every row, unfiltered
    async fn get_all(&self) -> AppResult<Vec<T>>;

    /// First entity produced by the evaluated specification
    async fn get_with_specification(&self, spec: &Specification<T>) -> AppResult<Option<T>>;

    /// All entities produced by the evaluated specification
    async fn get_all_with_specification(&self, spec: &Specification<T>) -> AppResult<Vec<T>>;

    /// First projected value produced by the evaluated specification
    async fn get_projected<R>(&self, spec: &ProjectedSpecification<T, R>) -> AppResult<Option<R>>
    where
        R: Send + 'static;

    /// All projected values produced by the evaluated specification
    async fn get_all_projected<R>(&self, spec: &ProjectedSpecification<T, R>) -> AppResult<Vec<R>>
    where
        R: Send + 'static;

    /// Stage an insert
    fn create(&mut self, entity: T);

    /// Stage a full replacement of the row with the entity's id
    fn update(&mut self, entity: T);

    /// Stage removal of the row with the entity's id
    fn delete(&mut self, entity: T);

    /// Whether a row with this id currently exists
    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Rows matching the specification's criteria, ignoring ordering,
    /// distinct and paging
    async fn count(&self, spec: &Specification<T>) -> AppResult<u64>;

    /// Persist staged changes in one transaction.
    ///
    /// Returns `false` when no row was affected; the staged changes are then
    /// kept, as they are when the store reports an error.
    async fn commit(&mut self) -> AppResult<bool>;

    /// Changes waiting for the next commit
    fn pending_changes(&self) -> &[Change<T>];

    /// Entities inserted by the last successful commit, with assigned ids
    fn inserted(&self) -> &[T];
}

/// A staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Create(T),
    Update(T),
    Delete(T),
}

impl<T: BaseEntity> Change<T> {
    pub fn entity(&self) -> &T {
        match self {
            Change::Create(e) | Change::Update(e) | Change::Delete(e) => e,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Change::Create(_) => "create",
            Change::Update(_) => "update",
            Change::Delete(_) => "delete",
        }
    }
}

/// Merge a new change into what is already staged for the same id.
/// `None` means the entity goes back to untracked.
fn coalesce<T>(staged: Change<T>, next: Change<T>) -> Option<Change<T>> {
    match (staged, next) {
        (Change::Create(_), Change::Update(e)) => Some(Change::Create(e)),
        (Change::Create(_), Change::Delete(_)) => None,
        (Change::Delete(_), Change::Create(e)) => Some(Change::Update(e)),
        (_, next) => Some(next),
    }
}

/// SeaORM-backed repository bound to one [`StoreContext`].
pub struct Repository<T: StoredEntity> {
    context: StoreContext,
    changes: Vec<Change<T>>,
    inserted: Vec<T>,
}

impl<T: StoredEntity> Repository<T> {
    pub fn new(context: StoreContext) -> Self {
        Self {
            context,
            changes: Vec::new(),
            inserted: Vec::new(),
        }
    }

    fn stage(&mut self, change: Change<T>) {
        let id = change.entity().id();
        let existing = (id > 0)
            .then(|| self.changes.iter().position(|c| c.entity().id() == id))
            .flatten();

        match existing {
            Some(index) => {
                let staged = self.changes.remove(index);
                if let Some(merged) = coalesce(staged, change) {
                    self.changes.insert(index, merged);
                }
            }
            None => self.changes.push(change),
        }
    }

    async fn fetch_projected<R>(
        &self,
        op: &'static str,
        query: ProjectedSelect<T, R>,
        first_only: bool,
    ) -> AppResult<Vec<R>> {
        let (select, projection) = query.into_parts();
        let select = if first_only { select.limit(1) } else { select };

        match projection.target_field() {
            Some(field) => {
                let statement = select.build(self.context.backend());
                let rows = self
                    .context
                    .run(op, async {
                        self.context
                            .db()
                            .query_all(statement)
                            .await
                            .map_err(AppError::from)
                    })
                    .await?;

                rows.iter()
                    .map(|row| -> AppResult<R> {
                        let value = T::read_field(row, field)?;
                        Ok(projection.decode(value)?)
                    })
                    .collect::<AppResult<Vec<R>>>()
            }
            // Whole entities: rows are already the projected shape.
            None => {
                let models = self
                    .context
                    .run(op, async {
                        select.all(self.context.db()).await.map_err(AppError::from)
                    })
                    .await?;

                models
                    .into_iter()
                    .map(|model| -> AppResult<R> { Ok(projection.apply(T::from_model(model))?) })
                    .collect()
            }
        }
    }
}

async fn write_changes<T: StoredEntity>(
    txn: &DatabaseTransaction,
    changes: &[Change<T>],
) -> AppResult<(u64, Vec<T>)> {
    let mut affected = 0;
    let mut inserted = Vec::new();

    for change in changes {
        let entity = change.entity();
        let rows = match change {
            Change::Create(_) => {
                let model = entity.to_active_model().insert(txn).await?;
                inserted.push(T::from_model(model));
                1
            }
            Change::Update(_) => {
                T::Entity::update_many()
                    .set(entity.to_active_model())
                    .filter(T::id_column().eq(entity.id()))
                    .exec(txn)
                    .await?
                    .rows_affected
            }
            Change::Delete(_) => {
                T::Entity::delete_many()
                    .filter(T::id_column().eq(entity.id()))
                    .exec(txn)
                    .await?
                    .rows_affected
            }
        };

        tracing::debug!(
            entity = T::NAME,
            id = entity.id(),
            change = change.kind(),
            rows,
            "change applied"
        );
        affected += rows;
    }

    Ok((affected, inserted))
}

/// Apply all changes in one transaction. `None` when nothing was affected.
async fn apply_changes<T: StoredEntity>(
    db: &DatabaseConnection,
    changes: &[Change<T>],
) -> AppResult<Option<(u64, Vec<T>)>> {
    let txn = db.begin().await?;

    match write_changes::<T>(&txn, changes).await {
        Ok((affected, inserted)) if affected > 0 => {
            txn.commit().await?;
            Ok(Some((affected, inserted)))
        }
        Ok(_) => {
            txn.rollback().await?;
            Ok(None)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

#[async_trait]
impl<T: StoredEntity> GenericRepository<T> for Repository<T> {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<T>> {
        let model = self
            .context
            .run("get_by_id", async {
                T::Entity::find()
                    .filter(T::id_column().eq(id))
                    .one(self.context.db())
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        Ok(model.map(T::from_model))
    }

    async fn get_all(&self) -> AppResult<Vec<T>> {
        let models = self
            .context
            .run("get_all", async {
                T::Entity::find()
                    .all(self.context.db())
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn get_with_specification(&self, spec: &Specification<T>) -> AppResult<Option<T>> {
        let select = SpecificationEvaluator::get_query(EntitySelect::<T>::new(), spec).into_select();
        let model = self
            .context
            .run("get_with_specification", async {
                select.one(self.context.db()).await.map_err(AppError::from)
            })
            .await?;

        Ok(model.map(T::from_model))
    }

    async fn get_all_with_specification(&self, spec: &Specification<T>) -> AppResult<Vec<T>> {
        let select = SpecificationEvaluator::get_query(EntitySelect::<T>::new(), spec).into_select();
        tracing::debug!(entity = T::NAME, ?spec, "query composed");

        let models = self
            .context
            .run("get_all_with_specification", async {
                select.all(self.context.db()).await.map_err(AppError::from)
            })
            .await?;

        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn get_projected<R>(&self, spec: &ProjectedSpecification<T, R>) -> AppResult<Option<R>>
    where
        R: Send + 'static,
    {
        let query = SpecificationEvaluator::get_projected_query(EntitySelect::<T>::new(), spec);
        let values = self.fetch_projected("get_projected", query, true).await?;
        Ok(values.into_iter().next())
    }

    async fn get_all_projected<R>(&self, spec: &ProjectedSpecification<T, R>) -> AppResult<Vec<R>>
    where
        R: Send + 'static,
    {
        let query = SpecificationEvaluator::get_projected_query(EntitySelect::<T>::new(), spec);
        self.fetch_projected("get_all_projected", query, false).await
    }

    fn create(&mut self, entity: T) {
        self.stage(Change::Create(entity));
    }

    fn update(&mut self, entity: T) {
        self.stage(Change::Update(entity));
    }

    fn delete(&mut self, entity: T) {
        self.stage(Change::Delete(entity));
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let matches = self
            .context
            .run("exists", async {
                T::Entity::find()
                    .filter(T::id_column().eq(id))
                    .count(self.context.db())
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        Ok(matches > 0)
    }

    async fn count(&self, spec: &Specification<T>) -> AppResult<u64> {
        let select = spec.apply_criteria(EntitySelect::<T>::new()).into_select();
        self.context
            .run("count", async {
                select.count(self.context.db()).await.map_err(AppError::from)
            })
            .await
    }

    async fn commit(&mut self) -> AppResult<bool> {
        if self.changes.is_empty() {
            tracing::debug!(entity = T::NAME, "commit with no staged changes");
            return Ok(false);
        }

        let outcome = self
            .context
            .run("commit", apply_changes::<T>(self.context.db(), &self.changes))
            .await?;

        match outcome {
            Some((affected, inserted)) => {
                tracing::debug!(
                    entity = T::NAME,
                    changes = self.changes.len(),
                    affected,
                    "changes committed"
                );
                self.changes.clear();
                self.inserted = inserted;
                Ok(true)
            }
            None => {
                tracing::warn!(
                    entity = T::NAME,
                    changes = self.changes.len(),
                    "commit affected no rows"
                );
                Ok(false)
            }
        }
    }

    fn pending_changes(&self) -> &[Change<T>] {
        &self.changes
    }

    fn inserted(&self) -> &[T] {
        &self.inserted
    }
}
