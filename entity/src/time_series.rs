use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "MAPPED_TIME_SERIES_DATA")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(column_name = "_title")]
    pub title: Option<String>,
    #[sea_orm(column_name = "_sample_period")]
    pub sample_period: Option<f64>,
    #[sea_orm(column_name = "_sample_rate")]
    pub sample_rate: Option<f64>,
    #[sea_orm(column_name = "_has_surface_mapping")]
    pub has_surface_mapping: Option<bool>,
    #[sea_orm(column_name = "_has_volume_mapping")]
    pub has_volume_mapping: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_types::Entity",
        from = "Column::Id",
        to = "super::data_types::Column::Id",
        on_delete = "Cascade"
    )]
    DataTypes,
    #[sea_orm(has_one = "super::time_series_region::Entity")]
    TimeSeriesRegion,
}

impl Related<super::data_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataTypes.def()
    }
}

impl Related<super::time_series_region::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSeriesRegion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
