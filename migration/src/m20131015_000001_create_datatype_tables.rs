use sea_orm_migration::prelude::*;

/// Datatype tables as they stand at platform version 1.3.1.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataTypes::Gid).string().not_null().unique_key())
                    .col(ColumnDef::new(DataTypes::Type).string().not_null())
                    .col(ColumnDef::new(DataTypes::Module).string())
                    .col(ColumnDef::new(DataTypes::Subject).string())
                    .col(ColumnDef::new(DataTypes::CreateDate).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Connectivity::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Connectivity::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Connectivity::NumberOfRegions).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connectivity_data_type")
                            .from(Connectivity::Table, Connectivity::Id)
                            .to(DataTypes::Table, DataTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TimeSeries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TimeSeries::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(TimeSeries::Title).string())
                    .col(ColumnDef::new(TimeSeries::SamplePeriod).double())
                    .col(ColumnDef::new(TimeSeries::SampleRate).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_series_data_type")
                            .from(TimeSeries::Table, TimeSeries::Id)
                            .to(DataTypes::Table, DataTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Region time-series extend the generic time-series row under the same id
        manager
            .create_table(
                Table::create()
                    .table(TimeSeriesRegion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeSeriesRegion::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeSeriesRegion::Connectivity).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_series_region_time_series")
                            .from(TimeSeriesRegion::Table, TimeSeriesRegion::Id)
                            .to(TimeSeries::Table, TimeSeries::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RegionMapping::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RegionMapping::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(RegionMapping::Connectivity).string())
                    .col(ColumnDef::new(RegionMapping::Surface).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_region_mapping_data_type")
                            .from(RegionMapping::Table, RegionMapping::Id)
                            .to(DataTypes::Table, DataTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RegionVolumeMapping::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegionVolumeMapping::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RegionVolumeMapping::Connectivity).string())
                    .col(ColumnDef::new(RegionVolumeMapping::Volume).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_region_volume_mapping_data_type")
                            .from(RegionVolumeMapping::Table, RegionVolumeMapping::Id)
                            .to(DataTypes::Table, DataTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sensors::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Sensors::SensorsType).string())
                    .col(ColumnDef::new(Sensors::NumberOfSensors).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensors_data_type")
                            .from(Sensors::Table, Sensors::Id)
                            .to(DataTypes::Table, DataTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_data_types_type")
                    .table(DataTypes::Table)
                    .col(DataTypes::Type)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_region_mapping_connectivity")
                    .table(RegionMapping::Table)
                    .col(RegionMapping::Connectivity)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first, DATA_TYPES last
        manager
            .drop_table(Table::drop().table(Sensors::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RegionVolumeMapping::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(RegionMapping::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TimeSeriesRegion::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(TimeSeries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Connectivity::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataTypes::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DataTypes {
    #[sea_orm(iden = "DATA_TYPES")]
    Table,
    Id,
    Gid,
    #[sea_orm(iden = "type")]
    Type,
    Module,
    Subject,
    CreateDate,
}

#[derive(DeriveIden)]
enum Connectivity {
    #[sea_orm(iden = "MAPPED_CONNECTIVITY_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_number_of_regions")]
    NumberOfRegions,
}

#[derive(DeriveIden)]
enum TimeSeries {
    #[sea_orm(iden = "MAPPED_TIME_SERIES_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_title")]
    Title,
    #[sea_orm(iden = "_sample_period")]
    SamplePeriod,
    #[sea_orm(iden = "_sample_rate")]
    SampleRate,
}

#[derive(DeriveIden)]
enum TimeSeriesRegion {
    #[sea_orm(iden = "MAPPED_TIME_SERIES_REGION_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_connectivity")]
    Connectivity,
}

#[derive(DeriveIden)]
enum RegionMapping {
    #[sea_orm(iden = "MAPPED_REGION_MAPPING_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_connectivity")]
    Connectivity,
    #[sea_orm(iden = "_surface")]
    Surface,
}

#[derive(DeriveIden)]
enum RegionVolumeMapping {
    #[sea_orm(iden = "MAPPED_REGION_VOLUME_MAPPING_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_connectivity")]
    Connectivity,
    #[sea_orm(iden = "_volume")]
    Volume,
}

#[derive(DeriveIden)]
enum Sensors {
    #[sea_orm(iden = "MAPPED_SENSORS_DATA")]
    Table,
    Id,
    #[sea_orm(iden = "_sensors_type")]
    SensorsType,
    #[sea_orm(iden = "_number_of_sensors")]
    NumberOfSensors,
}
