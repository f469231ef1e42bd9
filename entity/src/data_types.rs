use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Type registry: one row per stored datatype, shared id with its `MAPPED_*` row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "DATA_TYPES")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub gid: String,
    #[sea_orm(column_name = "type")]
    pub type_tag: String,
    pub module: Option<String>,
    pub subject: Option<String>,
    pub create_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::time_series::Entity")]
    TimeSeries,
    #[sea_orm(has_one = "super::region_mapping::Entity")]
    RegionMapping,
    #[sea_orm(has_one = "super::connectivity::Entity")]
    Connectivity,
}

impl Related<super::time_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSeries.def()
    }
}

impl Related<super::region_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegionMapping.def()
    }
}

impl Related<super::connectivity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Connectivity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
