//! Platform 1.3.1 -> 1.3.2: record whether a time-series can be displayed on a
//! surface or in a volume, and link region time-series to their region mapping.
//!
//! The derived values are a snapshot taken while the step runs. Rows written
//! afterwards get their flags from the application.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseTransaction, TransactionTrait};

/// Type tags whose time-series are always displayable on a cortical surface.
pub const SURFACE_TYPE_TAGS: [&str; 4] = [
    "TimeSeriesSurface",
    "TimeSeriesEEG",
    "TimeSeriesSEEG",
    "TimeSeriesMEG",
];

/// Type tags whose time-series are always displayable in a volume.
pub const VOLUME_TYPE_TAGS: [&str; 1] = ["TimeSeriesVolume"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        ensure_supported_backend(manager)?;
        ensure_tables_present(manager).await?;
        for (table, column) in added_columns() {
            if manager.has_column(&table, &column).await? {
                return Err(DbErr::Migration(format!(
                    "column {table}.{column} already exists, store is not at the predecessor version"
                )));
            }
        }

        // SQLite runs steps outside a transaction, so the step opens its own.
        // On PostgreSQL this nests as a savepoint inside the migrator's transaction.
        let txn = manager.get_connection().begin().await?;
        match apply_upgrade(&txn).await {
            Ok(()) => txn.commit().await,
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        ensure_tables_present(manager).await?;
        for (table, column) in added_columns() {
            if !manager.has_column(&table, &column).await? {
                return Err(DbErr::Migration(format!(
                    "column {table}.{column} does not exist, store is not at the target version"
                )));
            }
        }

        let txn = manager.get_connection().begin().await?;
        match apply_downgrade(&txn).await {
            Ok(()) => txn.commit().await,
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }
}

/// Adds the five columns and backfills them; the caller owns commit or rollback.
async fn apply_upgrade(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let manager = SchemaManager::new(txn);

    // SQLite only accepts one alteration per ALTER TABLE statement
    manager
        .alter_table(
            Table::alter()
                .table(TimeSeries::Table)
                .add_column(ColumnDef::new(TimeSeries::HasSurfaceMapping).boolean().null())
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeries::Table)
                .add_column(ColumnDef::new(TimeSeries::HasVolumeMapping).boolean().null())
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeriesRegion::Table)
                .add_column(ColumnDef::new(TimeSeriesRegion::RegionMapping).string().null())
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeriesRegion::Table)
                .add_column(
                    ColumnDef::new(TimeSeriesRegion::RegionMappingVolume)
                        .string()
                        .null(),
                )
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Sensors::Table)
                .add_column(ColumnDef::new(Sensors::Usable).string().null())
                .to_owned(),
        )
        .await?;

    let linked = txn
        .execute_unprepared(&region_mapping_backfill_sql())
        .await?;
    tracing::info!(
        rows = linked.rows_affected(),
        "Resolved region mappings for region time-series"
    );

    // _region_mapping_volume is not backfilled at this version
    let surface = txn
        .execute_unprepared(&flag_backfill_sql(
            "_has_surface_mapping",
            &SURFACE_TYPE_TAGS,
            "_region_mapping",
        ))
        .await?;
    tracing::info!(
        rows = surface.rows_affected(),
        "Backfilled surface mapping flags"
    );

    let volume = txn
        .execute_unprepared(&flag_backfill_sql(
            "_has_volume_mapping",
            &VOLUME_TYPE_TAGS,
            "_region_mapping_volume",
        ))
        .await?;
    tracing::info!(
        rows = volume.rows_affected(),
        "Backfilled volume mapping flags"
    );

    Ok(())
}

async fn apply_downgrade(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let manager = SchemaManager::new(txn);

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeries::Table)
                .drop_column(TimeSeries::HasSurfaceMapping)
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeries::Table)
                .drop_column(TimeSeries::HasVolumeMapping)
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeriesRegion::Table)
                .drop_column(TimeSeriesRegion::RegionMapping)
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(TimeSeriesRegion::Table)
                .drop_column(TimeSeriesRegion::RegionMappingVolume)
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Sensors::Table)
                .drop_column(Sensors::Usable)
                .to_owned(),
        )
        .await?;

    Ok(())
}

/// Every (table, column) pair this step owns.
pub fn added_columns() -> Vec<(String, String)> {
    vec![
        (TimeSeries::Table.to_string(), TimeSeries::HasSurfaceMapping.to_string()),
        (TimeSeries::Table.to_string(), TimeSeries::HasVolumeMapping.to_string()),
        (
            TimeSeriesRegion::Table.to_string(),
            TimeSeriesRegion::RegionMapping.to_string(),
        ),
        (
            TimeSeriesRegion::Table.to_string(),
            TimeSeriesRegion::RegionMappingVolume.to_string(),
        ),
        (Sensors::Table.to_string(), Sensors::Usable.to_string()),
    ]
}

#[allow(clippy::match_wildcard_for_single_variants)]
fn ensure_supported_backend(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    match manager.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres | sea_orm::DatabaseBackend::Sqlite => Ok(()),
        _ => Err(DbErr::Custom(
            "Unsupported database backend for this migration".to_owned(),
        )),
    }
}

async fn ensure_tables_present(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let required = [
        TimeSeries::Table.to_string(),
        TimeSeriesRegion::Table.to_string(),
        Sensors::Table.to_string(),
        RegionMapping::Table.to_string(),
        DataTypes::Table.to_string(),
    ];
    for table in required {
        if !manager.has_table(&table).await? {
            return Err(DbErr::Migration(format!("required table {table} is missing")));
        }
    }
    Ok(())
}

/// Lowest `DATA_TYPES.id` wins when several region mappings share a connectivity.
fn region_mapping_backfill_sql() -> String {
    r#"UPDATE "MAPPED_TIME_SERIES_REGION_DATA" SET "_region_mapping" =
        (SELECT dt."gid"
         FROM "MAPPED_REGION_MAPPING_DATA" rm
         INNER JOIN "DATA_TYPES" dt ON dt."id" = rm."id"
         WHERE rm."_connectivity" = "MAPPED_TIME_SERIES_REGION_DATA"."_connectivity"
         ORDER BY dt."id" ASC
         LIMIT 1)"#
        .to_owned()
}

/// Writes the flag on every row, so rows matching neither disjunct end up false.
fn flag_backfill_sql(flag_column: &str, type_tags: &[&str], linked_column: &str) -> String {
    let tags = type_tags
        .iter()
        .map(|tag| format!("'{tag}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"UPDATE "MAPPED_TIME_SERIES_DATA" SET "{flag_column}" =
        (EXISTS (SELECT 1 FROM "DATA_TYPES" dt
                 WHERE dt."id" = "MAPPED_TIME_SERIES_DATA"."id" AND dt."type" IN ({tags}))
         OR EXISTS (SELECT 1 FROM "MAPPED_TIME_SERIES_REGION_DATA" tr
                    WHERE tr."id" = "MAPPED_TIME_SERIES_DATA"."id" AND tr."{linked_column}" IS NOT NULL))"#
    )
}

#[derive(DeriveIden)]
enum DataTypes {
    #[sea_orm(iden = "DATA_TYPES")]
    Table,
}

#[derive(DeriveIden)]
enum TimeSeries {
    #[sea_orm(iden = "MAPPED_TIME_SERIES_DATA")]
    Table,
    #[sea_orm(iden = "_has_surface_mapping")]
    HasSurfaceMapping,
    #[sea_orm(iden = "_has_volume_mapping")]
    HasVolumeMapping,
}

#[derive(DeriveIden)]
enum TimeSeriesRegion {
    #[sea_orm(iden = "MAPPED_TIME_SERIES_REGION_DATA")]
    Table,
    #[sea_orm(iden = "_region_mapping")]
    RegionMapping,
    #[sea_orm(iden = "_region_mapping_volume")]
    RegionMappingVolume,
}

#[derive(DeriveIden)]
enum RegionMapping {
    #[sea_orm(iden = "MAPPED_REGION_MAPPING_DATA")]
    Table,
}

#[derive(DeriveIden)]
enum Sensors {
    #[sea_orm(iden = "MAPPED_SENSORS_DATA")]
    Table,
    #[sea_orm(iden = "_usable")]
    Usable,
}
