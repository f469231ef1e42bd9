use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "MAPPED_TIME_SERIES_REGION_DATA")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Gid of the connectivity the series was computed on.
    #[sea_orm(column_name = "_connectivity")]
    pub connectivity: Option<String>,
    #[sea_orm(column_name = "_region_mapping")]
    pub region_mapping: Option<String>,
    #[sea_orm(column_name = "_region_mapping_volume")]
    pub region_mapping_volume: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::time_series::Entity",
        from = "Column::Id",
        to = "super::time_series::Column::Id",
        on_delete = "Cascade"
    )]
    TimeSeries,
}

impl Related<super::time_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSeries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
